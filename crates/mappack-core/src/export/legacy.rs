//! Legacy line-oriented XDF definitions
//!
//! Each map becomes a `%%TABLE%%` or `%%CONSTANT%%` block of numbered
//! `tag=value` lines. Line numbers are offsets from a per-kind base, and the
//! consumer parses them by exact shape.

use std::fmt::Display;
use std::io::{self, Write};

use super::TableView;
use crate::mappack::{Axis, Map, Value, DEFAULT_PRECISION};

/// First lines of every legacy definition
pub const PREAMBLE: &str = "XDF\n1.110000\n\n";

const TABLE_BASE: u32 = 40000;
const CONSTANT_BASE: u32 = 20000;

/// Z value signed
pub const FLAG_Z_SIGNED: u32 = 0x001;
/// Z value stored low byte first
pub const FLAG_Z_LITTLE_ENDIAN: u32 = 0x002;
/// X axis signed
pub const FLAG_X_SIGNED: u32 = 0x040;
/// Y axis signed
pub const FLAG_Y_SIGNED: u32 = 0x080;
/// X axis stored low byte first
pub const FLAG_X_LITTLE_ENDIAN: u32 = 0x100;
/// Y axis stored low byte first
pub const FLAG_Y_LITTLE_ENDIAN: u32 = 0x200;

/// Label types understood by the consumer
const LABEL_FLOAT: u32 = 0x1;
const LABEL_INTEGER: u32 = 0x2;
const LABEL_STRING: u32 = 0x4;

/// Write the lines that open a legacy definition
pub fn write_preamble<W: Write>(writer: &mut W) -> io::Result<()> {
    writer.write_all(PREAMBLE.as_bytes())
}

fn line<W: Write>(writer: &mut W, number: u32, tag: &str, value: impl Display) -> io::Result<()> {
    writeln!(writer, "\t{:06} {:<17}={}", number, tag, value)
}

/// Hex value line. Values are 32 bits wide, so negatives print in two's complement.
fn hex_line<W: Write>(writer: &mut W, number: u32, tag: &str, value: u32) -> io::Result<()> {
    line(writer, number, tag, format_args!("0x{:X}", value))
}

fn quoted_line<W: Write>(writer: &mut W, number: u32, tag: &str, value: &str) -> io::Result<()> {
    line(writer, number, tag, format_args!("\"{}\"", value))
}

/// Conversion line, omitted for the identity conversion
fn equation_line<W: Write>(writer: &mut W, number: u32, tag: &str, value: &Value) -> io::Result<()> {
    if value.is_identity() {
        return Ok(());
    }
    line(writer, number, tag, format_args!("{},TH|0|0|0|0|", value.equation()))
}

fn label_type(value: &Value) -> u32 {
    if value.precision == 0 {
        LABEL_INTEGER
    } else {
        LABEL_FLOAT
    }
}

/// `1,2,...,count`
fn ordinal_labels(count: i32) -> String {
    (1..=count)
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Line numbers and tags of one table axis
struct AxisLines {
    count: (u32, &'static str),
    units: (u32, &'static str),
    label_type: (u32, &'static str),
    labels: (u32, &'static str),
    equation: (u32, &'static str),
    label_source: (u32, &'static str),
    address: (u32, &'static str),
    data_size: (u32, &'static str),
    addr_step: (u32, &'static str),
    output_digits: (u32, &'static str),
    signed_flag: u32,
    little_endian_flag: u32,
}

const X_LINES: AxisLines = AxisLines {
    count: (305, "Cols"),
    units: (320, "XUnits"),
    label_type: (352, "XLabelType"),
    labels: (350, "XLabels"),
    equation: (354, "XEq"),
    label_source: (505, "XLabelSource"),
    address: (600, "XAddress"),
    data_size: (610, "XDataSize"),
    addr_step: (620, "XAddrStep"),
    output_digits: (650, "XOutputDig"),
    signed_flag: FLAG_X_SIGNED,
    little_endian_flag: FLAG_X_LITTLE_ENDIAN,
};

const Y_LINES: AxisLines = AxisLines {
    count: (300, "Rows"),
    units: (325, "YUnits"),
    label_type: (362, "YLabelType"),
    labels: (360, "YLabels"),
    equation: (364, "YEq"),
    label_source: (515, "YLabelSource"),
    address: (700, "YAddress"),
    data_size: (710, "YDataSize"),
    addr_step: (720, "YAddrStep"),
    output_digits: (750, "YOutputDig"),
    signed_flag: FLAG_Y_SIGNED,
    little_endian_flag: FLAG_Y_LITTLE_ENDIAN,
};

/// Emit one table axis and return its flag bits
fn write_axis<W: Write>(
    writer: &mut W,
    base: u32,
    axis: &Axis,
    count: i32,
    lines: &AxisLines,
) -> io::Result<u32> {
    let value = &axis.value;
    let mut flags = 0;
    if value.signed {
        flags |= lines.signed_flag;
    }
    if value.encoding.is_little_endian() {
        flags |= lines.little_endian_flag;
    }

    hex_line(writer, base + lines.count.0, lines.count.1, count as u32)?;
    quoted_line(writer, base + lines.units.0, lines.units.1, &value.units)?;
    hex_line(writer, base + lines.label_type.0, lines.label_type.1, label_type(value))?;

    if axis.data_source.is_ordinal() && count > 1 {
        line(writer, base + lines.labels.0, lines.labels.1, ordinal_labels(count))?;
        hex_line(writer, base + lines.label_type.0, lines.label_type.1, LABEL_INTEGER)?;
    } else if let Some(address) = axis.address {
        let width = value.encoding.width();
        equation_line(writer, base + lines.equation.0, lines.equation.1, value)?;
        hex_line(writer, base + lines.label_source.0, lines.label_source.1, 1)?;
        hex_line(writer, base + lines.address.0, lines.address.1, address.0)?;
        line(writer, base + lines.data_size.0, lines.data_size.1, width)?;
        line(writer, base + lines.addr_step.0, lines.addr_step.1, width)?;
        if value.precision != DEFAULT_PRECISION {
            hex_line(
                writer,
                base + lines.output_digits.0,
                lines.output_digits.1,
                value.precision,
            )?;
        }
    }
    Ok(flags)
}

/// Write one map as a legacy definition block
pub fn write_map<W: Write>(writer: &mut W, map: &Map) -> io::Result<()> {
    let table = map.organization.is_table();
    // decided on the stored size; the axis labels below follow the swapped view
    let one_dimensional = map.organization.is_one_dimensional() || map.size.y <= 1;
    let base = if table { TABLE_BASE } else { CONSTANT_BASE };
    let value = &map.value;
    let view = TableView::new(map);

    writeln!(writer, "{}", if table { "%%TABLE%%" } else { "%%CONSTANT%%" })?;
    hex_line(writer, 100, "Cat0ID", map.folder_id.wrapping_add(1) as u32)?;
    quoted_line(writer, base + 5, "Title", map.title())?;

    let description = map.description();
    if !description.is_empty() {
        quoted_line(writer, base + 10, "Desc", description)?;
        hex_line(
            writer,
            base + 11,
            "DescSize",
            description.chars().count() as u32 + 1,
        )?;
    }

    if !value.units.is_empty() {
        if table {
            quoted_line(writer, base + 330, "ZUnits", &value.units)?;
        } else {
            quoted_line(writer, base + 20, "Units", &value.units)?;
        }
    }

    let width = value.encoding.width();
    if width > 1 {
        hex_line(writer, base + 50, "SizeInBits", width * 8)?;
    }
    if value.precision != DEFAULT_PRECISION {
        hex_line(writer, base + 210, "DecimalPl", value.precision)?;
    }

    let mut flags = 0;
    if value.signed {
        flags |= FLAG_Z_SIGNED;
    }
    if value.encoding.is_little_endian() {
        flags |= FLAG_Z_LITTLE_ENDIAN;
    }

    hex_line(writer, base + 100, "Address", map.address().0)?;
    equation_line(writer, base + 200, if table { "ZEq" } else { "Equation" }, value)?;

    if table {
        flags |= write_axis(writer, base, view.x_axis, view.size.x, &X_LINES)?;
        flags |= write_axis(writer, base, view.y_axis, view.size.y, &Y_LINES)?;
    }

    hex_line(writer, base + 150, "Flags", flags)?;

    if one_dimensional {
        line(writer, base + 360, "YLabels", &view.y_axis.value.units)?;
        hex_line(writer, base + 362, "YLabelType", LABEL_STRING)?;
    }

    writeln!(writer, "%%END%%")
}

/// Render one map as a legacy definition block
pub fn to_string(map: &Map) -> String {
    let mut out = Vec::new();
    write_map(&mut out, map).expect("writing to a Vec cannot fail");
    String::from_utf8_lossy(&out).into_owned()
}
