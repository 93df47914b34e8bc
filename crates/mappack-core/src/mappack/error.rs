//! Error types for map record decoding

use thiserror::Error;

/// Errors that can occur while decoding a single map record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Truncated record: {field} needs {needed} bytes at offset {offset}, {remaining} left")]
    Truncated {
        /// Field being read
        field: &'static str,
        /// Record offset of the field
        offset: usize,
        /// Bytes the field needs
        needed: usize,
        /// Bytes left in the record
        remaining: usize,
    },

    #[error("Invalid length for {field} at offset {offset}: {declared}")]
    InvalidLength {
        /// Field being read
        field: &'static str,
        /// Record offset of the length prefix
        offset: usize,
        /// Length as declared
        declared: i64,
    },
}

/// Errors that can occur while decoding a sequence of map records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    #[error("Map {index} (record offset {offset:#x}): {source}")]
    Record {
        /// Zero-based position of the record
        index: usize,
        /// Byte offset of the record in the stream
        offset: usize,
        /// Why the record failed
        #[source]
        source: DecodeError,
    },
}
