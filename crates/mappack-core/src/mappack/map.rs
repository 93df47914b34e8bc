//! Map record decoding
//!
//! A map record is a fixed sequence of fields with no framing, so every
//! field (including the ones whose meaning is unknown) must be consumed in
//! order to keep the cursor aligned.

use serde::Serialize;
use std::sync::Arc;

use super::axis::{Axis, AxisName};
use super::error::DecodeError;
use super::reader::ByteReader;
use super::types::{Address, Dimension, Endianness, Organization, ValueEncoding};
use super::value::{Value, ValueHead};

/// Byte order of map records
pub const RECORD_ENDIANNESS: Endianness = Endianness::Little;

/// Fields of a map record whose meaning is unknown, kept for the raw dump.
/// They are named after the raw dump labels.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MapReserved {
    pub header0: u8,
    pub header: i32,
    pub headera: [i32; 2],
    pub header1: i32,
    pub header1a: u8,
    pub header2: [u32; 8],
    pub header3: [i32; 2],
    pub header4: [u32; 2],
    pub header5: [i32; 2],
    pub header8: i32,
    pub header8a: i16,
    pub header9: [i32; 8],
    pub header9a: i16,
    pub header9b: i32,
    pub header9c: u8,
    pub header10: [u32; 6],
    pub header11: [u32; 2],
    pub trailer: [u8; 3],
}

/// One decoded calibration map or constant
#[derive(Debug, Clone, Serialize)]
pub struct Map {
    /// Display name
    pub name: String,
    /// Symbol such as `KFMIRL`, optionally followed by `?` or a space and a suffix
    pub id: String,
    /// Folder the map is filed under
    pub folder_id: i32,
    /// Constant or table shape
    pub organization: Organization,
    /// Scaling and encoding of the map cells
    pub value: Arc<Value>,
    /// Columns by rows
    pub size: Dimension,
    /// Editing range as stored
    pub range: [i32; 4],
    /// Cells are stored as reciprocals
    pub reciprocal: bool,
    /// Cells are differences
    pub difference: bool,
    /// Cells are percentages
    pub percent: bool,
    /// First and second address of the map data
    pub extent: [Address; 2],
    /// Trailing signature word
    pub signature: Address,
    /// Record format version
    pub format_version: i32,
    /// Column axis
    pub x_axis: Axis,
    /// Row axis
    pub y_axis: Axis,
    /// Cell axis, derived from the map value
    pub z_axis: Axis,
    /// Fields of unknown meaning
    pub reserved: MapReserved,
}

impl Map {
    /// Decode one record from the start of `bytes`
    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut reader = ByteReader::new(bytes, RECORD_ENDIANNESS);
        Self::read(&mut reader)
    }

    /// Decode one record at the reader's position, leaving the reader just
    /// past its last byte
    pub fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        let mut reserved = MapReserved {
            header0: reader.read_u8("map reserved")?,
            ..MapReserved::default()
        };
        let name = reader.read_string("map name")?;
        let organization = Organization::read(reader, "map organization")?;
        reserved.header = reader.read_i32("map reserved")?;
        let encoding = ValueEncoding::read(reader, "map encoding")?;
        reserved.headera = reader.read_i32_array("map reserved")?;
        let folder_id = reader.read_i32("map folder id")?;
        let id = reader.read_string("map id")?;
        reserved.header1 = reader.read_i32("map reserved")?;
        reserved.header1a = reader.read_u8("map reserved")?;
        let range = reader.read_i32_array("map range")?;
        reserved.header2 = reader.read_u32_array("map reserved")?;
        let reciprocal = reader.read_flag("map reciprocal")?;
        let signed = reader.read_flag("map sign")?;
        let difference = reader.read_flag("map difference")?;
        let percent = reader.read_flag("map percent")?;
        let size = Dimension::read(reader, "map size")?;
        reserved.header3 = reader.read_i32_array("map reserved")?;
        let precision = reader.read_i32("map precision")?;
        let head = ValueHead::read(reader)?;
        let value = Arc::new(Value::from_head(
            head,
            encoding,
            signed,
            u32::try_from(precision).unwrap_or(0),
        ));
        let extent = [
            Address::read(reader, "map address")?,
            Address::read(reader, "map address")?,
        ];
        reserved.header4 = reader.read_u32_array("map reserved")?;
        reserved.header5 = reader.read_i32_array("map reserved")?;
        let signature = Address::read(reader, "map signature")?;
        let format_version = reader.read_i32("map format version")?;
        let x_axis = Axis::read(reader, AxisName::X, size.x)?;
        let y_axis = Axis::read(reader, AxisName::Y, size.y)?;
        reserved.header8 = reader.read_i32("map trailer")?;
        reserved.header8a = reader.read_i16("map trailer")?;
        reserved.header9 = reader.read_i32_array("map trailer")?;
        reserved.header9a = reader.read_i16("map trailer")?;
        reserved.header9b = reader.read_i32("map trailer")?;
        reserved.header9c = reader.read_u8("map trailer")?;
        reserved.header10 = reader.read_u32_array("map trailer")?;
        reserved.header11 = reader.read_u32_array("map trailer")?;
        reserved.trailer = reader.read_byte_array("map trailer")?;

        let z_axis = Axis::z(Arc::clone(&value), extent[0], size);

        tracing::debug!(name = %name, id = %id, organization = %organization, "decoded map");

        Ok(Self {
            name,
            id,
            folder_id,
            organization,
            value,
            size,
            range,
            reciprocal,
            difference,
            percent,
            extent,
            signature,
            format_version,
            x_axis,
            y_axis,
            z_axis,
            reserved,
        })
    }

    /// Primary address of the map data
    pub fn address(&self) -> Address {
        self.extent[0]
    }

    /// Id up to the first `?` or space
    pub fn id_stem(&self) -> &str {
        id_stem(&self.id)
    }

    /// Whether two maps describe the same calibration, compared by id stem.
    /// Maps with an empty stem match nothing.
    pub fn matches(&self, other: &Map) -> bool {
        let stem = other.id_stem();
        !stem.is_empty() && stem == self.id_stem()
    }

    /// Definition title: the first word of the id, or the name when there is no id
    pub fn title(&self) -> &str {
        if self.id.is_empty() {
            &self.name
        } else {
            self.id.split(' ').next().unwrap_or_default()
        }
    }

    /// Definition description: the name, but only when the id supplied the title
    pub fn description(&self) -> &str {
        if self.id.is_empty() {
            ""
        } else {
            &self.name
        }
    }
}

fn id_stem(id: &str) -> &str {
    id.split(['?', ' ']).next().unwrap_or_default()
}
