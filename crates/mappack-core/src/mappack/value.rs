//! Scaled value descriptor
//!
//! A [`Value`] describes how raw cells map to physical values
//! (`raw * factor + offset`) and how many fractional digits to show.

use serde::Serialize;

use super::error::DecodeError;
use super::reader::ByteReader;
use super::types::ValueEncoding;

/// Most significant digits a definition consumer will display
pub const MAX_DIGITS: u32 = 6;

/// Decimal places a definition consumer assumes when none are given
pub const DEFAULT_PRECISION: u32 = 2;

/// The part of a value stored ahead of its encoding and flags
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ValueHead {
    pub description: String,
    pub units: String,
    pub factor: f64,
    pub offset: f64,
}

impl ValueHead {
    pub(crate) fn read(reader: &mut ByteReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            description: reader.read_string("value description")?,
            units: reader.read_string("value units")?,
            factor: reader.read_f64("value factor")?,
            offset: reader.read_f64("value offset")?,
        })
    }
}

/// Numeric descriptor of a map or axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Value {
    /// Free text describing the value
    pub description: String,
    /// Physical units, e.g. `rpm`
    pub units: String,
    /// Multiplier applied to raw cells
    pub factor: f64,
    /// Added after scaling
    pub offset: f64,
    /// Storage width and byte order of raw cells
    pub encoding: ValueEncoding,
    /// Raw cells are two's complement
    pub signed: bool,
    /// Fractional digits shown
    pub precision: u32,
}

impl Value {
    /// Build a value and limit its precision to [`MAX_DIGITS`]
    pub fn new(
        description: impl Into<String>,
        units: impl Into<String>,
        factor: f64,
        offset: f64,
        encoding: ValueEncoding,
        signed: bool,
        precision: u32,
    ) -> Self {
        let mut value = Self {
            description: description.into(),
            units: units.into(),
            factor,
            offset,
            encoding,
            signed,
            precision,
        };
        value.limit_precision(MAX_DIGITS);
        value
    }

    pub(crate) fn from_head(
        head: ValueHead,
        encoding: ValueEncoding,
        signed: bool,
        precision: u32,
    ) -> Self {
        Self::new(
            head.description,
            head.units,
            head.factor,
            head.offset,
            encoding,
            signed,
            precision,
        )
    }

    /// Raw cell to physical value
    pub fn convert(&self, raw: f64) -> f64 {
        raw * self.factor + self.offset
    }

    /// Clamp `precision` so the largest representable value shows at most
    /// `max_digits` digits in total.
    ///
    /// Left untouched when the encoding width is unknown or the largest
    /// converted value is not a positive finite number, since the digit
    /// count is undefined there.
    pub fn limit_precision(&mut self, max_digits: u32) -> u32 {
        let width = self.encoding.width();
        if width == 0 {
            return self.precision;
        }

        let bits = if self.signed { width * 8 - 1 } else { width * 8 };
        let max = self.convert(2f64.powi(bits as i32) - 1.0);
        if !(max.is_finite() && max > 0.0) {
            return self.precision;
        }

        // 99 = 2 digits, 100 = 3 digits
        let int_digits = max.log10().floor() as i64 + 1;
        let max_digits = i64::from(max_digits);
        if i64::from(self.precision) + int_digits > max_digits {
            self.precision = (max_digits - int_digits).max(0) as u32;
        }
        self.precision
    }

    /// Factor 1 and offset 0
    pub fn is_identity(&self) -> bool {
        self.factor == 1.0 && self.offset == 0.0
    }

    /// Conversion formula in definition syntax: `X`, `F * X` or `F * X+ O`
    pub fn equation(&self) -> String {
        if self.is_identity() {
            return "X".to_string();
        }
        let mut equation = format!("{:.6} * X", self.factor);
        if self.offset != 0.0 {
            equation.push_str(&format!("+ {:.6}", self.offset));
        }
        equation
    }

    /// Format a physical value with this value's precision
    pub fn format(&self, value: f64) -> String {
        format!("{:.*}", self.precision as usize, value)
    }
}
