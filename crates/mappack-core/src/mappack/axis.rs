//! Map axes
//!
//! X and Y axes are decoded from the record. The Z axis has no bytes of its
//! own; it shares the map's [`Value`] and first extent address.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

use super::error::DecodeError;
use super::reader::ByteReader;
use super::types::{Address, DataSource, Dimension, ValueEncoding};
use super::value::{Value, ValueHead};

/// Role of an axis within a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisName {
    /// Columns
    X,
    /// Rows
    Y,
    /// Table cells
    Z,
}

impl AxisName {
    /// Lower-case axis letter
    pub fn as_str(&self) -> &'static str {
        match self {
            AxisName::X => "x",
            AxisName::Y => "y",
            AxisName::Z => "z",
        }
    }
}

impl fmt::Display for AxisName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of breakpoints along an axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AxisExtent {
    /// X and Y axes
    Length(i32),
    /// The Z axis spans the whole table
    Grid(Dimension),
}

/// Fields of an axis record whose meaning is unknown, kept for the raw dump
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AxisReserved {
    /// Two words after the encoding
    pub header1: [i32; 2],
    /// Byte before the reciprocal flag
    pub header1a: u8,
    /// Three bytes after the precision
    pub header2: [u8; 3],
    /// Declared word count of `block`
    pub block_len: i32,
    /// Length-prefixed word block
    pub block: Vec<i32>,
    /// Word before the signature
    pub header4: i32,
}

/// One axis of a map
#[derive(Debug, Clone, Serialize)]
pub struct Axis {
    /// Which axis this is
    pub name: AxisName,
    /// Scaling and encoding of the breakpoints
    pub value: Arc<Value>,
    /// Where the breakpoints come from
    pub data_source: DataSource,
    /// Present only for memory-backed data sources
    pub address: Option<Address>,
    /// Breakpoint count
    pub extent: AxisExtent,
    /// Breakpoints are stored as reciprocals
    pub reciprocal: bool,
    /// Trailing signature word
    pub signature: Address,
    /// Fields of unknown meaning
    pub reserved: AxisReserved,
}

impl Axis {
    /// Decode an X or Y axis record with `length` breakpoints
    pub fn read(
        reader: &mut ByteReader<'_>,
        name: AxisName,
        length: i32,
    ) -> Result<Self, DecodeError> {
        let head = ValueHead::read(reader)?;
        let data_source = DataSource::read(reader, "axis data source")?;
        // the address slot is always present, even when unused
        let address = Address::read(reader, "axis address")?;
        let encoding = ValueEncoding::read(reader, "axis encoding")?;
        let header1 = reader.read_i32_array("axis reserved")?;
        let header1a = reader.read_u8("axis reserved")?;
        let reciprocal = reader.read_flag("axis reciprocal")?;
        let precision = reader.read_u8("axis precision")?;
        let header2 = reader.read_byte_array("axis reserved")?;
        let signed = reader.read_flag("axis sign")?;
        let (block_len, block) = reader.read_sized_words("axis reserved block")?;
        let header4 = reader.read_i32("axis reserved")?;
        let signature = Address::read(reader, "axis signature")?;

        // precision is limited here, once encoding and sign are known
        let value = Value::from_head(head, encoding, signed, u32::from(precision));

        Ok(Self {
            name,
            value: Arc::new(value),
            data_source,
            address: data_source.is_addressed().then_some(address),
            extent: AxisExtent::Length(length),
            reciprocal,
            signature,
            reserved: AxisReserved {
                header1,
                header1a,
                header2,
                block_len,
                block,
                header4,
            },
        })
    }

    /// The Z axis of a map, sharing the map's value and first address
    pub fn z(value: Arc<Value>, address: Address, size: Dimension) -> Self {
        Self {
            name: AxisName::Z,
            value,
            data_source: DataSource::default(),
            address: Some(address),
            extent: AxisExtent::Grid(size),
            reciprocal: false,
            signature: Address::NONE,
            reserved: AxisReserved::default(),
        }
    }

    /// Whether this is the Z axis derived from the map
    pub fn is_z(&self) -> bool {
        matches!(self.extent, AxisExtent::Grid(_))
    }

    /// Breakpoint count; 0 for the Z axis
    pub fn length(&self) -> i32 {
        match self.extent {
            AxisExtent::Length(n) => n,
            AxisExtent::Grid(_) => 0,
        }
    }

    /// Display labels for each breakpoint.
    ///
    /// A single breakpoint is labelled with the units; otherwise each index is
    /// converted and formatted with the axis precision.
    pub fn labels(&self) -> Vec<String> {
        let count = self.length().max(0);
        if count == 1 {
            return vec![self.value.units.clone()];
        }
        (0..count)
            .map(|i| self.value.format(self.value.convert(f64::from(i))))
            .collect()
    }
}
