//! XML XDF definitions
//!
//! Writes `XDFTABLE` and `XDFCONSTANT` elements inside an `XDFFORMAT` root,
//! carrying the same addresses, flags and conversions as the legacy format.

use chrono::{DateTime, Utc};
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Write;

use super::{ExportError, TableView};
use crate::mappack::{Axis, AxisName, Dimension, Map, Value, DEFAULT_PRECISION};

/// Version attribute of the root element
pub const XDF_VERSION: &str = "1.50";

/// `outputtype` codes: 0x1 float, 0x2 integer, 0x4 string
const OUTPUT_FLOAT: u32 = 0x1;
const OUTPUT_INTEGER: u32 = 0x2;

/// Streams an XDF document to `W`
pub struct XdfWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XdfWriter<W> {
    /// Write to `inner` with two-space indentation
    pub fn new(inner: W) -> Self {
        Self {
            writer: Writer::new_with_indent(inner, b' ', 2),
        }
    }

    /// Timestamp comment and root open tag
    pub fn begin(&mut self, written_at: DateTime<Utc>) -> Result<(), ExportError> {
        let comment = format!(" Written {} ", written_at.format("%a %b %d %H:%M:%S UTC %Y"));
        self.writer
            .write_event(Event::Comment(BytesText::from_escaped(comment)))?;

        let mut root = BytesStart::new("XDFFORMAT");
        root.push_attribute(("version", XDF_VERSION));
        self.writer.write_event(Event::Start(root))?;
        Ok(())
    }

    /// One `XDFTABLE` or `XDFCONSTANT` element
    pub fn write_map(&mut self, map: &Map) -> Result<(), ExportError> {
        write_map(&mut self.writer, map)
    }

    /// Root close tag
    pub fn finish(mut self) -> Result<W, ExportError> {
        self.writer
            .write_event(Event::End(BytesEnd::new("XDFFORMAT")))?;
        let mut inner = self.writer.into_inner();
        inner.write_all(b"\n")?;
        Ok(inner)
    }
}

/// Render one map element on its own
pub fn to_string(map: &Map) -> Result<String, ExportError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    write_map(&mut writer, map)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}

/// Write one map as an `XDFTABLE` or `XDFCONSTANT` element
pub fn write_map<W: Write>(writer: &mut Writer<W>, map: &Map) -> Result<(), ExportError> {
    let table = map.organization.is_table();
    let tag = if table { "XDFTABLE" } else { "XDFCONSTANT" };

    let mut elem = BytesStart::new(tag);
    elem.push_attribute(("uniqueid", "0x0"));
    if table {
        elem.push_attribute(("flags", "0x0"));
    }
    writer.write_event(Event::Start(elem))?;

    write_text(writer, "title", map.title())?;
    write_text(writer, "description", map.description())?;

    let category = (i64::from(map.folder_id) + 1).to_string();
    let mut category_mem = BytesStart::new("CATEGORYMEM");
    category_mem.push_attribute(("index", "0"));
    category_mem.push_attribute(("category", category.as_str()));
    writer.write_event(Event::Empty(category_mem))?;

    if table {
        let view = TableView::new(map);
        write_axis(writer, view.x_axis, AxisName::X, view.size)?;
        write_axis(writer, view.y_axis, AxisName::Y, view.size)?;
        write_axis(writer, view.z_axis(), AxisName::Z, view.size)?;
    } else {
        write_constant(writer, map)?;
    }

    writer.write_event(Event::End(BytesEnd::new(tag)))?;
    Ok(())
}

fn write_text<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> Result<(), ExportError> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

fn write_number<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    number: impl ToString,
) -> Result<(), ExportError> {
    write_text(writer, name, &number.to_string())
}

fn write_empty<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attributes: &[(&str, String)],
) -> Result<(), ExportError> {
    let mut elem = BytesStart::new(name);
    for (key, value) in attributes {
        elem.push_attribute((*key, value.as_str()));
    }
    writer.write_event(Event::Empty(elem))?;
    Ok(())
}

/// `mmedtypeflags` bits: 0x01 signed, 0x02 low byte first
fn type_flags(value: &Value) -> u32 {
    let mut flags = if value.signed { 0x01 } else { 0 };
    if value.encoding.is_little_endian() {
        flags |= 0x02;
    }
    flags
}

/// Conversion formula with its single variable
fn write_math<W: Write>(writer: &mut Writer<W>, equation: &str) -> Result<(), ExportError> {
    let mut math = BytesStart::new("MATH");
    math.push_attribute(("equation", equation));
    writer.write_event(Event::Start(math))?;
    write_empty(writer, "VAR", &[("id", "X".to_string())])?;
    writer.write_event(Event::End(BytesEnd::new("MATH")))?;
    Ok(())
}

fn write_decimal_places<W: Write>(writer: &mut Writer<W>, value: &Value) -> Result<(), ExportError> {
    if value.precision != DEFAULT_PRECISION {
        write_number(writer, "decimalpl", value.precision)?;
    }
    Ok(())
}

fn write_constant<W: Write>(writer: &mut Writer<W>, map: &Map) -> Result<(), ExportError> {
    let value = &map.value;
    let flags = type_flags(value);

    let mut embedded = Vec::new();
    if flags != 0 {
        embedded.push(("mmedtypeflags", format!("0x{:02X}", flags)));
    }
    embedded.push(("mmedaddress", format!("0x{:X}", map.address().0)));
    embedded.push(("mmedelementsizebits", (value.encoding.width() * 8).to_string()));
    write_empty(writer, "EMBEDDEDDATA", &embedded)?;

    write_text(writer, "units", &value.units)?;
    write_decimal_places(writer, value)?;
    write_math(writer, &value.equation())
}

/// One `XDFAXIS` element. `role` is the axis' position in the rendered
/// table, which differs from its decoded name when the table is transposed.
fn write_axis<W: Write>(
    writer: &mut Writer<W>,
    axis: &Axis,
    role: AxisName,
    size: Dimension,
) -> Result<(), ExportError> {
    let value = &axis.value;
    let is_z = role == AxisName::Z;
    let length = axis.length();

    let mut elem = BytesStart::new("XDFAXIS");
    elem.push_attribute(("id", role.as_str()));
    if !is_z {
        elem.push_attribute(("uniqueid", "0x0"));
    }
    writer.write_event(Event::Start(elem))?;

    if axis.data_source.is_ordinal() {
        write_empty(
            writer,
            "EMBEDDEDDATA",
            &[
                ("mmedelementsizebits", "16".to_string()),
                ("mmedmajorstridebits", "-32".to_string()),
            ],
        )?;
        write_text(writer, "units", &value.units)?;
        write_number(writer, "indexcount", length)?;
        write_decimal_places(writer, value)?;
        let output = if value.precision == 0 {
            OUTPUT_INTEGER
        } else {
            OUTPUT_FLOAT
        };
        write_number(writer, "outputtype", output)?;

        for (index, label) in axis.labels().into_iter().enumerate() {
            write_empty(
                writer,
                "LABEL",
                &[("index", index.to_string()), ("value", label)],
            )?;
        }
    } else {
        let bits = value.encoding.width() * 8;
        let flags = type_flags(value);

        let mut embedded = Vec::new();
        if flags != 0 {
            embedded.push(("mmedtypeflags", format!("0x{:02X}", flags)));
        }
        if let Some(address) = axis.address {
            embedded.push(("mmedaddress", format!("0x{:X}", address.0)));
        }
        embedded.push(("mmedelementsizebits", bits.to_string()));
        if is_z {
            embedded.push(("mmedrowcount", size.y.to_string()));
            if size.x > 1 {
                embedded.push(("mmedcolcount", size.x.to_string()));
            }
        } else {
            embedded.push(("mmedmajorstridebits", bits.to_string()));
        }
        write_empty(writer, "EMBEDDEDDATA", &embedded)?;

        write_text(writer, "units", &value.units)?;
        if length > 0 {
            write_number(writer, "indexcount", length)?;
        }
        write_decimal_places(writer, value)?;
        if value.precision == 0 {
            write_number(writer, "outputtype", OUTPUT_INTEGER)?;
        }
        if !is_z {
            write_empty(writer, "embedinfo", &[("type", "1".to_string())])?;
        }
        write_math(writer, &value.equation())?;
    }

    writer.write_event(Event::End(BytesEnd::new("XDFAXIS")))?;
    Ok(())
}
