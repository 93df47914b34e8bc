//! Tests for legacy line-oriented definitions

mod common;

use common::{AxisRecord, MapRecord};
use mappack_core::export::legacy;
use mappack_core::prelude::*;
use pretty_assertions::assert_eq;

fn decode(record: &MapRecord) -> Map {
    Map::decode(&record.encode()).expect("record should decode")
}

fn line(number: u32, tag: &str, value: &str) -> String {
    format!("\t{:06} {:<17}={}\n", number, tag, value)
}

#[test]
fn test_scaled_constant_block() {
    let record = MapRecord {
        factor: 2.0,
        ..MapRecord::constant("Idle", "KFIDLE", 0x10)
    };
    let map = decode(&record);
    assert_eq!(map.value.equation(), "2.000000 * X");

    let expected = [
        "%%CONSTANT%%\n".to_string(),
        line(100, "Cat0ID", "0x1"),
        line(20005, "Title", "\"KFIDLE\""),
        line(20010, "Desc", "\"Idle\""),
        line(20011, "DescSize", "0x5"),
        line(20100, "Address", "0x10"),
        line(20200, "Equation", "2.000000 * X,TH|0|0|0|0|"),
        line(20150, "Flags", "0x0"),
        line(20360, "YLabels", ""),
        line(20362, "YLabelType", "0x4"),
        "%%END%%\n".to_string(),
    ]
    .concat();
    assert_eq!(legacy::to_string(&map), expected);
}

#[test]
fn test_identity_constant_omits_equation() {
    let mut record = MapRecord::constant("Switch", "", 0x20);
    record.units = "-".to_string();
    record.encoding = 2;
    let map = decode(&record);

    let text = legacy::to_string(&map);
    assert!(text.starts_with("%%CONSTANT%%\n"));
    assert!(text.ends_with("%%END%%\n"));
    assert!(text.contains(&line(20005, "Title", "\"Switch\"")));
    assert!(!text.contains("Desc"));
    assert!(!text.contains("Equation"));
    assert!(text.contains(&line(20020, "Units", "\"-\"")));
    assert!(text.contains(&line(20050, "SizeInBits", "0x10")));
}

#[test]
fn test_wide_table_is_transposed() {
    let map = decode(&MapRecord::table("Wide", "KFWIDE", 300, 10));
    let text = legacy::to_string(&map);

    assert!(text.starts_with("%%TABLE%%\n"));
    assert!(text.contains("\t040305 Cols             =0xA\n"));
    assert!(text.contains("\t040300 Rows             =0x12C\n"));
    assert!(text.contains(&line(40320, "XUnits", "\"kPa\"")));
    assert!(text.contains(&line(40325, "YUnits", "\"rpm\"")));
    assert!(text.contains(&line(40600, "XAddress", "0x300")));
    assert!(text.contains(&line(40700, "YAddress", "0x200")));
    assert!(text.contains(&line(40610, "XDataSize", "1")));
    assert!(text.contains(&line(40710, "YDataSize", "2")));

    // the decoded map keeps its own orientation
    assert_eq!(map.size, Dimension { x: 300, y: 10 });
    assert_eq!(map.x_axis.value.units, "rpm");
    let again = legacy::to_string(&map);
    assert_eq!(again, text);
}

#[test]
fn test_ordinary_table_keeps_orientation() {
    for (cols, rows) in [(16, 12), (256, 10), (300, 300)] {
        let map = decode(&MapRecord::table("Fuel", "KFMIRL", cols, rows));
        let text = legacy::to_string(&map);
        assert!(text.contains(&line(40305, "Cols", &format!("0x{:X}", cols))));
        assert!(text.contains(&line(40300, "Rows", &format!("0x{:X}", rows))));
        assert!(text.contains(&line(40600, "XAddress", "0x200")));
    }
}

#[test]
fn test_ordinal_axis_labels() {
    let mut record = MapRecord::table("Steps", "KLSTEP", 4, 3);
    record.x_axis = AxisRecord::ordinal("step");
    let text = legacy::to_string(&decode(&record));

    assert!(text.contains(&line(40350, "XLabels", "1,2,3,4")));
    assert!(text.contains(&line(40352, "XLabelType", "0x2")));
    assert!(!text.contains("XAddress"));
    assert!(text.contains(&line(40700, "YAddress", "0x300")));
}

#[test]
fn test_flags_combine_value_and_axes() {
    let mut record = MapRecord::table("Signed", "KFSIG", 8, 8);
    record.encoding = 3;
    record.signed = true;
    record.y_axis.encoding = 5;
    record.y_axis.signed = true;
    let text = legacy::to_string(&decode(&record));

    let flags = legacy::FLAG_Z_SIGNED
        | legacy::FLAG_Z_LITTLE_ENDIAN
        | legacy::FLAG_Y_SIGNED
        | legacy::FLAG_Y_LITTLE_ENDIAN;
    assert_eq!(flags, 0x283);
    assert!(text.contains(&line(40150, "Flags", "0x283")));
    assert!(text.contains(&line(40050, "SizeInBits", "0x10")));
}

#[test]
fn test_one_row_table_labels_y_with_units() {
    let map = decode(&MapRecord::table("Curve", "KLCURVE", 8, 1));
    let text = legacy::to_string(&map);
    assert!(text.ends_with(&[
        line(40150, "Flags", "0x0"),
        line(40360, "YLabels", "kPa"),
        line(40362, "YLabelType", "0x4"),
        "%%END%%\n".to_string(),
    ]
    .concat()));
}

#[test]
fn test_wide_curve_labels_y_with_swapped_axis() {
    let record = MapRecord {
        organization: 3,
        ..MapRecord::table("Wide curve", "KLWIDE", 300, 1)
    };
    let text = legacy::to_string(&decode(&record));

    assert!(text.contains(&line(40320, "XUnits", "\"kPa\"")));
    assert!(text.contains(&line(40325, "YUnits", "\"rpm\"")));
    assert!(text.ends_with(&[
        line(40150, "Flags", "0x0"),
        line(40360, "YLabels", "rpm"),
        line(40362, "YLabelType", "0x4"),
        "%%END%%\n".to_string(),
    ]
    .concat()));
}

#[test]
fn test_negative_folder_prints_as_32_bits() {
    let record = MapRecord {
        folder_id: -2,
        ..MapRecord::constant("Unfiled", "KUNF", 0)
    };
    let text = legacy::to_string(&decode(&record));
    assert!(text.contains(&line(100, "Cat0ID", "0xFFFFFFFF")));
}

#[test]
fn test_write_dump_old_xdf() {
    let bytes: Vec<u8> = [
        MapRecord::constant("One", "A", 0),
        MapRecord::table("Two", "B", 4, 4),
    ]
    .iter()
    .flat_map(|r| r.encode())
    .collect();
    let maps = Container::decode_stream(&bytes).unwrap();
    let config = ExportConfig::new(OutputFormat::OldXdf)
        .with_image(MemoryImage::new(vec![0; 64]));

    let mut out = Vec::new();
    write_dump(&mut out, &maps, &config).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("XDF\n1.110000\n\n%%CONSTANT%%\n"));
    assert_eq!(text.matches("%%END%%\n").count(), 2);
    assert!(text.contains("%%TABLE%%\n"));
}
