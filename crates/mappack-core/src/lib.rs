//! # mappack Core Library
//!
//! Core functionality for decoding calibration map packs.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Binary map record decoding (identity, organization, scaling, axes)
//! - Memory image overlay for real min/max values
//! - Export as CSV digest, raw dump, legacy XDF and XML XDF definitions
//!
//! ## Example
//!
//! ```rust,ignore
//! use mappack_core::prelude::*;
//!
//! // Decode the records handed over by the container reader
//! let maps = Container::decode_stream(&records)?;
//!
//! // Write an XDF definition sized against a calibration image
//! let image = MemoryImage::open("stock.bin")?;
//! let config = ExportConfig::new(OutputFormat::Xdf).with_image(image);
//! write_dump(std::io::stdout(), &maps, &config)?;
//! ```

pub mod export;
pub mod image;
pub mod mappack;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::export::{
        write_dump, ExportConfig, ExportError, OutputFormat, Reference, RequestError, TableView,
    };
    pub use crate::image::{MapData, MemoryImage, OverlayError};
    pub use crate::mappack::{
        Axis, Container, ContainerError, DecodeError, Dimension, Endianness, Map, Organization,
        Value, ValueEncoding,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
