//! Map Pack Record Decoder
//!
//! Decodes the binary map records of a calibration map pack. Each record
//! describes one map:
//! - identity (name, id, folder)
//! - organization (constant, 1-D or 2-D table)
//! - value scaling, encoding and precision
//! - X and Y axes, plus a Z axis derived from the map itself

mod axis;
mod container;
mod error;
mod map;
mod reader;
mod types;
mod value;

pub use axis::{Axis, AxisExtent, AxisName, AxisReserved};
pub use container::Container;
pub use error::{ContainerError, DecodeError};
pub use map::{Map, MapReserved, RECORD_ENDIANNESS};
pub use reader::ByteReader;
pub use types::*;
pub use value::{Value, DEFAULT_PRECISION, MAX_DIGITS};
