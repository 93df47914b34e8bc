//! Min/max reduction over addressed image cells

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use std::sync::Arc;
use thiserror::Error;

use super::MemoryImage;
use crate::mappack::{Address, Axis, Dimension, Endianness, Map, Value, ValueEncoding};

/// Errors that can occur while overlaying a map on an image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// A cell ends past the end of the image
    #[error("Cell {index} at {address:#x} needs {width} bytes, image holds {image_len}")]
    OutOfBounds {
        /// First cell that does not fit
        index: usize,
        /// Image offset of that cell
        address: u64,
        /// Cell width in bytes
        width: u32,
        /// Image size in bytes
        image_len: usize,
    },

    /// The encoding has no known cell width
    #[error("Cannot read cells encoded as {0}")]
    UnsupportedEncoding(ValueEncoding),

    /// The axis takes its labels from somewhere other than the image
    #[error("Axis has no address")]
    Unaddressed,
}

/// A block of cells in the image: `size.x * size.y` cells of the value's
/// width starting at `address`
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    /// Encoding and scaling of the cells
    pub value: &'a Arc<Value>,
    /// Image offset of the first cell
    pub address: Address,
    /// Columns by rows
    pub size: Dimension,
}

impl<'a> Region<'a> {
    /// All cells of a map
    pub fn of_map(map: &'a Map) -> Self {
        Self {
            value: &map.value,
            address: map.address(),
            size: map.size,
        }
    }

    /// An axis' breakpoints, viewed as a one-column map
    pub fn of_axis(axis: &'a Axis) -> Option<Self> {
        Some(Self {
            value: &axis.value,
            address: axis.address?,
            size: Dimension::new(1, axis.length()),
        })
    }
}

/// Cells read from an image for one region
#[derive(Debug, Clone)]
pub struct MapData {
    value: Arc<Value>,
    raw: Vec<f64>,
}

impl MapData {
    /// Read every cell of `region` from `image`.
    ///
    /// The whole region is checked against the image before any cell is
    /// read, so a corrupt size fails with [`OverlayError::OutOfBounds`]
    /// instead of allocating for cells that cannot exist.
    pub fn new(region: Region<'_>, image: &MemoryImage) -> Result<Self, OverlayError> {
        let encoding = region.value.encoding;
        let width = encoding.width();
        if width == 0 {
            return Err(OverlayError::UnsupportedEncoding(encoding));
        }

        let data = image.as_bytes();
        let start = u64::from(region.address.0);
        let step = u64::from(width);
        let count = region.size.cell_count();
        let image_len = data.len() as u64;
        let fits = count
            .checked_mul(step)
            .and_then(|bytes| bytes.checked_add(start))
            .is_some_and(|end| end <= image_len);
        if !fits {
            // first cell whose last byte lies past the end of the image
            let index = image_len.saturating_sub(start) / step;
            return Err(OverlayError::OutOfBounds {
                index: index as usize,
                address: start + index * step,
                width,
                image_len: data.len(),
            });
        }

        // count * width <= image length, so every offset below is in range
        let raw = (0..count)
            .map(|index| {
                let offset = (start + index * step) as usize;
                read_cell(data, offset, encoding, region.value.signed).ok_or_else(|| {
                    OverlayError::OutOfBounds {
                        index: index as usize,
                        address: start + index * step,
                        width,
                        image_len: data.len(),
                    }
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            value: Arc::clone(region.value),
            raw,
        })
    }

    /// Read all cells of a map
    pub fn for_map(map: &Map, image: &MemoryImage) -> Result<Self, OverlayError> {
        Self::new(Region::of_map(map), image)
    }

    /// Read the breakpoints of a memory-backed axis
    pub fn for_axis(axis: &Axis, image: &MemoryImage) -> Result<Self, OverlayError> {
        let region = Region::of_axis(axis).ok_or(OverlayError::Unaddressed)?;
        Self::new(region, image)
    }

    /// Cells as stored
    pub fn raw_values(&self) -> &[f64] {
        &self.raw
    }

    /// Cells after scaling
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.raw.iter().map(|&raw| self.value.convert(raw))
    }

    /// Smallest raw cell
    pub fn minimum(&self) -> f64 {
        self.raw.iter().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest raw cell
    pub fn maximum(&self) -> f64 {
        self.raw.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Smallest scaled cell
    pub fn minimum_value(&self) -> f64 {
        self.values().fold(f64::INFINITY, f64::min)
    }

    /// Largest scaled cell
    pub fn maximum_value(&self) -> f64 {
        self.values().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Raw cell as hex. Negative integers are shown in two's complement at
    /// the cell width; floats by their bit pattern.
    pub fn format_raw(&self, raw: f64) -> String {
        let encoding = self.value.encoding;
        if encoding.is_float() {
            return format!("0x{:x}", (raw as f32).to_bits());
        }
        let mask = (1u64 << (encoding.width() * 8)) - 1;
        format!("0x{:x}", (raw as i64 as u64) & mask)
    }

    /// Scaled cells at the value's precision, comma separated
    pub fn labels(&self) -> String {
        self.values()
            .map(|v| self.value.format(v))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One cell at `offset`. Multi-byte cells use the order the encoding names.
fn read_cell(data: &[u8], offset: usize, encoding: ValueEncoding, signed: bool) -> Option<f64> {
    let width = encoding.width() as usize;
    let bytes = data.get(offset..offset.checked_add(width)?)?;

    let value = match (width, encoding.is_float(), signed, encoding.byte_order()) {
        (1, _, false, _) => f64::from(bytes[0]),
        (1, _, true, _) => f64::from(bytes[0] as i8),
        (2, _, false, Some(Endianness::Big)) => f64::from(BigEndian::read_u16(bytes)),
        (2, _, false, Some(Endianness::Little)) => f64::from(LittleEndian::read_u16(bytes)),
        (2, _, true, Some(Endianness::Big)) => f64::from(BigEndian::read_i16(bytes)),
        (2, _, true, Some(Endianness::Little)) => f64::from(LittleEndian::read_i16(bytes)),
        (4, true, _, Some(Endianness::Big)) => f64::from(BigEndian::read_f32(bytes)),
        (4, true, _, Some(Endianness::Little)) => f64::from(LittleEndian::read_f32(bytes)),
        (4, false, false, Some(Endianness::Big)) => f64::from(BigEndian::read_u32(bytes)),
        (4, false, false, Some(Endianness::Little)) => f64::from(LittleEndian::read_u32(bytes)),
        (4, false, true, Some(Endianness::Big)) => f64::from(BigEndian::read_i32(bytes)),
        (4, false, true, Some(Endianness::Little)) => f64::from(LittleEndian::read_i32(bytes)),
        _ => return None,
    };
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region_value(encoding: ValueEncoding, signed: bool, factor: f64) -> Arc<Value> {
        Arc::new(Value::new("", "", factor, 0.0, encoding, signed, 1))
    }

    #[test]
    fn test_word_cells_follow_encoding_order() {
        let image = MemoryImage::new(vec![0x00, 0x01, 0x02, 0x00, 0x03]);

        let value = region_value(ValueEncoding::WordHiLo, false, 1.0);
        let region = Region {
            value: &value,
            address: Address(0),
            size: Dimension::new(2, 1),
        };
        let data = MapData::new(region, &image).unwrap();
        assert_eq!(data.raw_values(), &[1.0, 512.0]);

        let value = region_value(ValueEncoding::WordLoHi, false, 1.0);
        let region = Region {
            value: &value,
            address: Address(1),
            size: Dimension::new(2, 1),
        };
        let data = MapData::new(region, &image).unwrap();
        assert_eq!(data.raw_values(), &[0x0201 as f64, 0x0300 as f64]);
    }

    #[test]
    fn test_signed_and_float_cells() {
        let image = MemoryImage::new(vec![0xFF, 0x7F, 0x80]);
        let value = region_value(ValueEncoding::Byte, true, 1.0);
        let region = Region {
            value: &value,
            address: Address(0),
            size: Dimension::new(3, 1),
        };
        let data = MapData::new(region, &image).unwrap();
        assert_eq!(data.minimum(), -128.0);
        assert_eq!(data.maximum(), 127.0);
        assert_eq!(data.format_raw(data.minimum()), "0x80");

        let image = MemoryImage::new(1.5f32.to_be_bytes().to_vec());
        let value = region_value(ValueEncoding::FloatHiLo, false, 2.0);
        let region = Region {
            value: &value,
            address: Address(0),
            size: Dimension::new(1, 1),
        };
        let data = MapData::new(region, &image).unwrap();
        assert_eq!(data.maximum_value(), 3.0);
        assert_eq!(data.format_raw(data.maximum()), "0x3fc00000");
    }

    #[test]
    fn test_negative_factor_flips_scaled_extremes() {
        let image = MemoryImage::new(vec![1, 9]);
        let value = region_value(ValueEncoding::Byte, false, -1.0);
        let region = Region {
            value: &value,
            address: Address(0),
            size: Dimension::new(2, 1),
        };
        let data = MapData::new(region, &image).unwrap();
        assert_eq!(data.minimum(), 1.0);
        assert_eq!(data.minimum_value(), -9.0);
        assert_eq!(data.maximum_value(), -1.0);
    }

    #[test]
    fn test_out_of_bounds() {
        let image = MemoryImage::new(vec![0; 4]);
        let value = region_value(ValueEncoding::WordHiLo, false, 1.0);
        let region = Region {
            value: &value,
            address: Address(2),
            size: Dimension::new(2, 1),
        };
        assert_eq!(
            MapData::new(region, &image).unwrap_err(),
            OverlayError::OutOfBounds {
                index: 1,
                address: 4,
                width: 2,
                image_len: 4,
            }
        );
    }

    #[test]
    fn test_region_larger_than_image() {
        let image = MemoryImage::new(vec![0; 16]);
        let value = region_value(ValueEncoding::LongLoHi, false, 1.0);
        let region = Region {
            value: &value,
            address: Address(8),
            size: Dimension::new(i32::MAX, i32::MAX),
        };
        assert_eq!(
            MapData::new(region, &image).unwrap_err(),
            OverlayError::OutOfBounds {
                index: 2,
                address: 16,
                width: 4,
                image_len: 16,
            }
        );
    }

    #[test]
    fn test_region_past_end_of_address_space() {
        let image = MemoryImage::new(vec![0; 16]);
        let value = region_value(ValueEncoding::WordHiLo, false, 1.0);
        let region = Region {
            value: &value,
            address: Address(u32::MAX),
            size: Dimension::new(4, 1),
        };
        assert_eq!(
            MapData::new(region, &image).unwrap_err(),
            OverlayError::OutOfBounds {
                index: 0,
                address: u64::from(u32::MAX),
                width: 2,
                image_len: 16,
            }
        );
    }

    #[test]
    fn test_unknown_width_rejected() {
        let image = MemoryImage::new(vec![0; 4]);
        let value = region_value(ValueEncoding::Other(12), false, 1.0);
        let region = Region {
            value: &value,
            address: Address(0),
            size: Dimension::new(1, 1),
        };
        assert!(matches!(
            MapData::new(region, &image),
            Err(OverlayError::UnsupportedEncoding(ValueEncoding::Other(12)))
        ));
    }

    #[test]
    fn test_labels() {
        let image = MemoryImage::new(vec![10, 20, 30]);
        let value = region_value(ValueEncoding::Byte, false, 0.5);
        let region = Region {
            value: &value,
            address: Address(0),
            size: Dimension::new(1, 3),
        };
        let data = MapData::new(region, &image).unwrap();
        assert_eq!(data.labels(), "5.0,10.0,15.0");
    }
}
