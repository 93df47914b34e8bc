//! Raw field dump
//!
//! Every decoded field, including the ones whose meaning is unknown, for
//! comparing records while working out the format.

use std::io::{self, Write};

use crate::mappack::{Axis, Map, Value};

fn flags(pairs: &[(bool, char)]) -> String {
    pairs
        .iter()
        .filter(|(set, _)| *set)
        .map(|(_, c)| *c)
        .collect()
}

fn describe_value(value: &Value) -> String {
    format!(
        "({})/{} -  f/o: {}/{}",
        value.description, value.units, value.factor, value.offset
    )
}

fn write_axis<W: Write>(writer: &mut W, axis: &Axis) -> io::Result<()> {
    let value = &axis.value;
    let reserved = &axis.reserved;
    writeln!(writer, "{} {}", axis.name, describe_value(value))?;
    writeln!(writer, "\t   ds: {}", axis.data_source)?;
    match axis.address {
        Some(address) => writeln!(writer, "\t addr: {} {}", address, value.encoding)?,
        None => writeln!(writer, "\t addr: none {}", value.encoding)?,
    }
    writeln!(writer, "\t   h1: {:?}", reserved.header1)?;
    writeln!(writer, "\t  h1a: {} (byte)", reserved.header1a)?;
    writeln!(
        writer,
        "\tflags: {}",
        flags(&[(axis.reciprocal, 'R'), (value.signed, 'S')])
    )?;
    writeln!(writer, "\t prec: {} (byte)", value.precision)?;
    writeln!(writer, "\t   h2: {:?}", reserved.header2)?;
    writeln!(writer, "\th3_sz: {}", reserved.block_len)?;
    writeln!(writer, "\t   h3: {:?}", reserved.block)?;
    writeln!(writer, "\t   h4: {}", reserved.header4)?;
    if !axis.signature.is_none() {
        writeln!(writer, "\t  sig: {}", axis.signature)?;
    }
    Ok(())
}

/// Write every field of one map
pub fn write_map<W: Write>(writer: &mut W, map: &Map) -> io::Result<()> {
    let reserved = &map.reserved;
    let value = &map.value;

    writeln!(writer, "   h0: {}", reserved.header0)?;
    writeln!(writer, "  map: {} [{}] {}", map.name, map.id, value.encoding)?;
    writeln!(writer, "  org: {}", map.organization)?;
    writeln!(writer, "    h: {}", reserved.header)?;
    writeln!(writer, "   ha: {:?}", reserved.headera)?;
    writeln!(writer, "fdrId: {}", map.folder_id)?;
    writeln!(writer, "   h1: {}", reserved.header1)?;
    writeln!(writer, "  h1a: {} (byte)", reserved.header1a)?;
    writeln!(writer, "range: {}-{}", map.range[0], map.range[2])?;
    writeln!(writer, "   h2: {:x?}", reserved.header2)?;
    writeln!(
        writer,
        "flags: {}",
        flags(&[
            (map.reciprocal, 'R'),
            (value.signed, 'S'),
            (map.difference, 'D'),
            (map.percent, 'P'),
        ])
    )?;
    writeln!(writer, " size: {}", map.size)?;
    writeln!(writer, "   h3: {:?}", reserved.header3)?;
    writeln!(writer, " prec: {}", value.precision)?;
    writeln!(writer, "value: {}", describe_value(value))?;
    writeln!(writer, " addr: [{}, {}]", map.extent[0], map.extent[1])?;
    writeln!(writer, "   h4: {:x?}", reserved.header4)?;
    writeln!(writer, "   h5: {:?}", reserved.header5)?;
    writeln!(writer, "   h6: {}", map.signature)?;
    writeln!(writer, "   h7: {}", map.format_version)?;
    write!(writer, "xaxis: ")?;
    write_axis(writer, &map.x_axis)?;
    write!(writer, "yaxis: ")?;
    write_axis(writer, &map.y_axis)?;
    writeln!(writer, "   h8: {}", reserved.header8)?;
    writeln!(writer, "  h8a: {} (short)", reserved.header8a)?;
    writeln!(writer, "   h9: {:?}", reserved.header9)?;
    writeln!(writer, "  h9a: {} (short)", reserved.header9a)?;
    writeln!(writer, "  h9b: {}", reserved.header9b)?;
    writeln!(writer, "  h9c: {} (byte)", reserved.header9c)?;
    writeln!(writer, "  h10: {:x?}", reserved.header10)?;
    writeln!(writer, "  h11: {:x?}", reserved.header11)?;
    writeln!(writer, "term2: {:?}", reserved.trailer)?;
    writeln!(writer)
}
