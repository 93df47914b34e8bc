//! Map Definition Export
//!
//! Renders decoded maps as:
//! - a raw field dump for debugging
//! - a CSV digest, optionally with image min/max and reference names
//! - the legacy line-oriented XDF definition format
//! - the XML XDF definition format

pub mod csv;
pub mod legacy;
pub mod raw;
mod view;
pub mod xdf;

pub use view::{TableView, MAX_COLUMNS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Write;
use thiserror::Error;

use crate::image::MemoryImage;
use crate::mappack::{Container, Map};

/// Output formats of a dump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Every decoded field, for debugging
    Dump,
    /// One CSV row per map
    #[default]
    Csv,
    /// Legacy line-oriented XDF
    OldXdf,
    /// XML XDF
    Xdf,
}

impl OutputFormat {
    /// Pick the format from mutually exclusive selections; none selected means CSV
    pub fn from_flags(dump: bool, old_xdf: bool, xdf: bool) -> Result<Self, RequestError> {
        match (dump, old_xdf, xdf) {
            (false, false, false) => Ok(OutputFormat::Csv),
            (true, false, false) => Ok(OutputFormat::Dump),
            (false, true, false) => Ok(OutputFormat::OldXdf),
            (false, false, true) => Ok(OutputFormat::Xdf),
            _ => Err(RequestError::ConflictingFormats),
        }
    }

    /// Definition formats need an image to size the definition against
    pub fn requires_image(&self) -> bool {
        matches!(self, OutputFormat::OldXdf | OutputFormat::Xdf)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Dump => "raw dump",
            OutputFormat::Csv => "CSV",
            OutputFormat::OldXdf => "old XDF",
            OutputFormat::Xdf => "XDF",
        })
    }
}

/// Invalid combinations of export options, detected before any decoding
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RequestError {
    /// More than one output format selected
    #[error("Can only select one of raw dump, old XDF and XDF output")]
    ConflictingFormats,

    /// A definition format without an image
    #[error("{0} output requires a memory image")]
    ImageRequired(OutputFormat),
}

/// Errors that can occur during export
#[derive(Error, Debug)]
pub enum ExportError {
    /// Options rejected before writing
    #[error("Invalid export request: {0}")]
    Request(#[from] RequestError),

    /// XML serialization failed
    #[error("XML writing error: {0}")]
    XmlError(#[from] quick_xml::Error),

    /// The sink failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// A second container whose map names annotate CSV rows
#[derive(Debug, Clone)]
pub struct Reference {
    /// Column header, usually the container's file name
    pub label: String,
    /// Maps whose names are looked up
    pub container: Container,
}

impl Reference {
    /// Reference `container` under the column header `label`
    pub fn new(label: impl Into<String>, container: Container) -> Self {
        Self {
            label: label.into(),
            container,
        }
    }

    /// Name of the first matching map, or empty
    pub fn name_for(&self, map: &Map) -> &str {
        self.container
            .find(map)
            .map(|found| found.name.as_str())
            .unwrap_or_default()
    }
}

/// Everything a dump needs besides the maps themselves
#[derive(Debug, Clone, Default)]
pub struct ExportConfig {
    /// Output format
    pub format: OutputFormat,
    /// Calibration image for min/max values and definition sizing
    pub image: Option<MemoryImage>,
    /// Containers annotating CSV rows, in column order
    pub references: Vec<Reference>,
    /// Timestamp for the XDF header comment; the current time when unset
    pub written_at: Option<DateTime<Utc>>,
}

impl ExportConfig {
    /// Config for `format` with no image or references
    pub fn new(format: OutputFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// Attach a calibration image
    pub fn with_image(mut self, image: MemoryImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Add a reference container column
    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.references.push(reference);
        self
    }

    /// Fix the XDF header timestamp
    pub fn with_timestamp(mut self, written_at: DateTime<Utc>) -> Self {
        self.written_at = Some(written_at);
        self
    }

    /// Reject option combinations the formats cannot honour
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.format.requires_image() && self.image.is_none() {
            return Err(RequestError::ImageRequired(self.format));
        }
        Ok(())
    }

    /// The image, if one was supplied and it is not empty
    pub fn overlay_image(&self) -> Option<&MemoryImage> {
        self.image.as_ref().filter(|image| !image.is_empty())
    }
}

/// Write a complete document for `maps` in the configured format
pub fn write_dump<'a, W, I>(mut sink: W, maps: I, config: &ExportConfig) -> Result<(), ExportError>
where
    W: Write,
    I: IntoIterator<Item = &'a Map>,
{
    config.validate()?;

    match config.format {
        OutputFormat::Dump => {
            for map in maps {
                raw::write_map(&mut sink, map)?;
            }
        }
        OutputFormat::Csv => {
            csv::write_header(&mut sink, &config.references)?;
            for map in maps {
                csv::write_row(&mut sink, map, config.overlay_image(), &config.references)?;
            }
        }
        OutputFormat::OldXdf => {
            legacy::write_preamble(&mut sink)?;
            for map in maps {
                legacy::write_map(&mut sink, map)?;
            }
        }
        OutputFormat::Xdf => {
            let mut writer = xdf::XdfWriter::new(&mut sink);
            writer.begin(config.written_at.unwrap_or_else(Utc::now))?;
            for map in maps {
                writer.write_map(map)?;
            }
            writer.finish()?;
        }
    }

    sink.flush()?;
    Ok(())
}
