//! Enumerated record fields and small value types
//!
//! Every enumerated field is stored as a 4-byte code. Codes outside the
//! known range are kept as `Other(code)` and rendered as a diagnostic
//! string instead of failing the decode.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::DecodeError;
use super::reader::ByteReader;

/// Byte order of multi-byte fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Endianness {
    /// Most significant byte first
    Big,
    /// Least significant byte first
    #[default]
    Little,
}

/// Render a code through its legend, falling back to `(len N) code` for
/// codes the legend does not cover.
fn render_code(f: &mut fmt::Formatter<'_>, legend: &[&str], code: i32) -> fmt::Result {
    match usize::try_from(code).ok().and_then(|i| legend.get(i)) {
        Some(label) => f.write_str(label),
        None => write!(f, "(len {}) {:x}", legend.len(), code),
    }
}

const ENCODING_LEGEND: [&str; 8] = [
    "??",
    "8 Bit",
    "16 Bit (HiLo)",
    "16 Bit (LoHi)",
    "32 Bit (HiLoHilo)",
    "32 Bit (LoHiLoHi)",
    "32 BitFloat (HiLoHiLo)",
    "32 BitFloat (LoHiLoHi)",
];

/// Storage encoding of a cell value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValueEncoding {
    /// Code 0
    Unknown,
    /// 8-bit integer
    Byte,
    /// 16-bit integer, high byte first
    WordHiLo,
    /// 16-bit integer, low byte first
    WordLoHi,
    /// 32-bit integer, high byte first
    LongHiLo,
    /// 32-bit integer, low byte first
    LongLoHi,
    /// 32-bit IEEE float, high byte first
    FloatHiLo,
    /// 32-bit IEEE float, low byte first
    FloatLoHi,
    /// Code outside the legend
    Other(i32),
}

impl ValueEncoding {
    /// Map a raw code to its variant
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => ValueEncoding::Unknown,
            1 => ValueEncoding::Byte,
            2 => ValueEncoding::WordHiLo,
            3 => ValueEncoding::WordLoHi,
            4 => ValueEncoding::LongHiLo,
            5 => ValueEncoding::LongLoHi,
            6 => ValueEncoding::FloatHiLo,
            7 => ValueEncoding::FloatLoHi,
            other => ValueEncoding::Other(other),
        }
    }

    /// Decode one 4-byte code
    pub fn read(reader: &mut ByteReader<'_>, field: &'static str) -> Result<Self, DecodeError> {
        reader.read_i32(field).map(Self::from_code)
    }

    /// The raw code
    pub fn code(&self) -> i32 {
        match self {
            ValueEncoding::Unknown => 0,
            ValueEncoding::Byte => 1,
            ValueEncoding::WordHiLo => 2,
            ValueEncoding::WordLoHi => 3,
            ValueEncoding::LongHiLo => 4,
            ValueEncoding::LongLoHi => 5,
            ValueEncoding::FloatHiLo => 6,
            ValueEncoding::FloatLoHi => 7,
            ValueEncoding::Other(code) => *code,
        }
    }

    /// Cell width in bytes, 0 when unknown
    pub fn width(&self) -> u32 {
        match self {
            ValueEncoding::Byte => 1,
            ValueEncoding::WordHiLo | ValueEncoding::WordLoHi => 2,
            ValueEncoding::LongHiLo
            | ValueEncoding::LongLoHi
            | ValueEncoding::FloatHiLo
            | ValueEncoding::FloatLoHi => 4,
            ValueEncoding::Unknown | ValueEncoding::Other(_) => 0,
        }
    }

    /// Odd codes above 1 store the low byte first
    pub fn is_little_endian(&self) -> bool {
        let code = self.code();
        code > 1 && code & 1 == 1
    }

    /// Whether cells hold IEEE floats
    pub fn is_float(&self) -> bool {
        matches!(self, ValueEncoding::FloatHiLo | ValueEncoding::FloatLoHi)
    }

    /// Byte order of a multi-byte cell; `None` for single-byte and unknown encodings
    pub fn byte_order(&self) -> Option<Endianness> {
        if self.width() < 2 {
            None
        } else if self.is_little_endian() {
            Some(Endianness::Little)
        } else {
            Some(Endianness::Big)
        }
    }
}

impl fmt::Display for ValueEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_code(f, &ENCODING_LEGEND, self.code())
    }
}

const DATA_SOURCE_LEGEND: [&str; 5] = [
    "1,2,3",
    "Eprom",
    "Eprom, add",
    "Eprom, subtract",
    "Free editable",
];

/// Where an axis takes its breakpoint values from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DataSource {
    /// Index labels 1, 2, 3, ...
    Ordinal,
    /// Stored in memory
    #[default]
    Memory,
    /// Stored in memory, derived by addition
    MemoryAdd,
    /// Stored in memory, derived by subtraction
    MemorySubtract,
    /// Freely editable labels
    FreeEditable,
    /// Code outside the legend
    Other(i32),
}

impl DataSource {
    /// Map a raw code to its variant
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => DataSource::Ordinal,
            1 => DataSource::Memory,
            2 => DataSource::MemoryAdd,
            3 => DataSource::MemorySubtract,
            4 => DataSource::FreeEditable,
            other => DataSource::Other(other),
        }
    }

    /// Decode one 4-byte code
    pub fn read(reader: &mut ByteReader<'_>, field: &'static str) -> Result<Self, DecodeError> {
        reader.read_i32(field).map(Self::from_code)
    }

    /// The raw code
    pub fn code(&self) -> i32 {
        match self {
            DataSource::Ordinal => 0,
            DataSource::Memory => 1,
            DataSource::MemoryAdd => 2,
            DataSource::MemorySubtract => 3,
            DataSource::FreeEditable => 4,
            DataSource::Other(code) => *code,
        }
    }

    /// Values live at an address in the image
    pub fn is_addressed(&self) -> bool {
        (1..=3).contains(&self.code())
    }

    /// Labels are plain indices
    pub fn is_ordinal(&self) -> bool {
        self.code() == 0
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_code(f, &DATA_SOURCE_LEGEND, self.code())
    }
}

const ORGANIZATION_LEGEND: [&str; 6] = [
    "??",
    "??",
    "Single value",
    "Onedimensional",
    "Twodimensional",
    "2d Inverse",
];

/// Shape of a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Organization {
    /// Code 0
    Unset,
    /// Code 1
    Reserved,
    /// Scalar constant
    Single,
    /// 1-D table
    OneDimensional,
    /// 2-D table
    TwoDimensional,
    /// 2-D table with inverted lookup
    TwoDimensionalInverse,
    /// Code outside the legend
    Other(i32),
}

impl Organization {
    /// Map a raw code to its variant
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Organization::Unset,
            1 => Organization::Reserved,
            2 => Organization::Single,
            3 => Organization::OneDimensional,
            4 => Organization::TwoDimensional,
            5 => Organization::TwoDimensionalInverse,
            other => Organization::Other(other),
        }
    }

    /// Decode one 4-byte code
    pub fn read(reader: &mut ByteReader<'_>, field: &'static str) -> Result<Self, DecodeError> {
        reader.read_i32(field).map(Self::from_code)
    }

    /// The raw code
    pub fn code(&self) -> i32 {
        match self {
            Organization::Unset => 0,
            Organization::Reserved => 1,
            Organization::Single => 2,
            Organization::OneDimensional => 3,
            Organization::TwoDimensional => 4,
            Organization::TwoDimensionalInverse => 5,
            Organization::Other(code) => *code,
        }
    }

    /// 1-D, 2-D and inverse 2-D maps are tables
    pub fn is_table(&self) -> bool {
        (3..=5).contains(&self.code())
    }

    /// Explicitly one-dimensional
    pub fn is_one_dimensional(&self) -> bool {
        self.code() == 3
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        render_code(f, &ORGANIZATION_LEGEND, self.code())
    }
}

/// Columns (`x`) by rows (`y`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Dimension {
    /// Columns
    pub x: i32,
    /// Rows
    pub y: i32,
}

impl Dimension {
    /// `x` columns by `y` rows
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Decode x then y
    pub fn read(reader: &mut ByteReader<'_>, field: &'static str) -> Result<Self, DecodeError> {
        let x = reader.read_i32(field)?;
        let y = reader.read_i32(field)?;
        Ok(Self { x, y })
    }

    /// Same extent with rows and columns exchanged
    pub fn transposed(&self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    /// Number of cells, counting each dimension as at least one
    pub fn cell_count(&self) -> u64 {
        let cols = self.x.max(1) as u64;
        let rows = self.y.max(1) as u64;
        cols * rows
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.x, self.y)
    }
}

/// A 32-bit address in the calibration image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Address(pub u32);

impl Address {
    /// All bits set marks an unused slot
    pub const NONE: Address = Address(u32::MAX);

    /// Decode one address word
    pub fn read(reader: &mut ByteReader<'_>, field: &'static str) -> Result<Self, DecodeError> {
        reader.read_u32(field).map(Address)
    }

    /// Whether this is the unused-slot marker
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_width_and_order() {
        let expected = [(0, 0), (1, 1), (2, 2), (3, 2), (4, 4), (5, 4), (6, 4), (7, 4)];
        for (code, width) in expected {
            let encoding = ValueEncoding::from_code(code);
            assert_eq!(encoding.width(), width, "width of code {code}");
            assert_eq!(
                encoding.is_little_endian(),
                code > 1 && code % 2 == 1,
                "endianness of code {code}"
            );
            assert_eq!(encoding.code(), code);
        }
    }

    #[test]
    fn test_encoding_byte_order() {
        assert_eq!(ValueEncoding::Byte.byte_order(), None);
        assert_eq!(ValueEncoding::WordHiLo.byte_order(), Some(Endianness::Big));
        assert_eq!(ValueEncoding::FloatLoHi.byte_order(), Some(Endianness::Little));
        assert!(ValueEncoding::FloatHiLo.is_float());
        assert!(!ValueEncoding::LongLoHi.is_float());
    }

    #[test]
    fn test_unknown_codes_render_fallback() {
        assert_eq!(ValueEncoding::from_code(9).to_string(), "(len 8) 9");
        assert_eq!(ValueEncoding::from_code(9).width(), 0);
        assert_eq!(Organization::from_code(26).to_string(), "(len 6) 1a");
        assert_eq!(DataSource::from_code(-1).to_string(), "(len 5) ffffffff");
    }

    #[test]
    fn test_legends() {
        assert_eq!(ValueEncoding::WordLoHi.to_string(), "16 Bit (LoHi)");
        assert_eq!(Organization::Single.to_string(), "Single value");
        assert_eq!(DataSource::Ordinal.to_string(), "1,2,3");
    }

    #[test]
    fn test_data_source_classes() {
        assert!(DataSource::Ordinal.is_ordinal());
        assert!(!DataSource::Ordinal.is_addressed());
        for code in 1..=3 {
            assert!(DataSource::from_code(code).is_addressed());
        }
        assert!(!DataSource::FreeEditable.is_addressed());
        assert_eq!(DataSource::default(), DataSource::Memory);
    }

    #[test]
    fn test_organization_classes() {
        assert!(!Organization::Single.is_table());
        assert!(Organization::OneDimensional.is_table());
        assert!(Organization::OneDimensional.is_one_dimensional());
        assert!(Organization::TwoDimensionalInverse.is_table());
        assert!(!Organization::Other(6).is_table());
    }

    #[test]
    fn test_dimension_cells() {
        assert_eq!(Dimension::new(0, 0).cell_count(), 1);
        assert_eq!(Dimension::new(16, 8).cell_count(), 128);
        assert_eq!(
            Dimension::new(i32::MAX, i32::MAX).cell_count(),
            (i32::MAX as u64) * (i32::MAX as u64)
        );
        assert_eq!(Dimension::new(300, 10).transposed(), Dimension::new(10, 300));
        assert_eq!(Dimension::new(16, 8).to_string(), "16x8");
    }
}
