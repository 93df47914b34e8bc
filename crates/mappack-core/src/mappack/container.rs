//! Decoded map collections
//!
//! The container file format itself is read elsewhere; this module takes the
//! record bytes it yields and decodes them into [`Map`]s.

use super::error::ContainerError;
use super::map::{Map, RECORD_ENDIANNESS};
use super::reader::ByteReader;

/// An ordered set of decoded maps
#[derive(Debug, Clone, Default)]
pub struct Container {
    maps: Vec<Map>,
}

impl Container {
    /// Wrap maps that are already decoded
    pub fn new(maps: Vec<Map>) -> Self {
        Self { maps }
    }

    /// Decode one map per record span. The first bad record aborts the decode.
    pub fn from_records<'a, I>(records: I) -> Result<Self, ContainerError>
    where
        I: IntoIterator<Item = &'a [u8]>,
    {
        let mut maps = Vec::new();
        let mut offset = 0;
        for (index, record) in records.into_iter().enumerate() {
            let mut reader = ByteReader::new(record, RECORD_ENDIANNESS);
            let map = Map::read(&mut reader).map_err(|source| ContainerError::Record {
                index,
                offset,
                source,
            })?;
            if !reader.is_empty() {
                tracing::debug!(index, unread = reader.remaining(), "record has trailing bytes");
            }
            maps.push(map);
            offset += record.len();
        }
        Ok(Self { maps })
    }

    /// Decode back-to-back records until `bytes` is exhausted
    pub fn decode_stream(bytes: &[u8]) -> Result<Self, ContainerError> {
        let mut reader = ByteReader::new(bytes, RECORD_ENDIANNESS);
        let mut maps = Vec::new();
        while !reader.is_empty() {
            let offset = reader.position();
            let map = Map::read(&mut reader).map_err(|source| ContainerError::Record {
                index: maps.len(),
                offset,
                source,
            })?;
            maps.push(map);
        }
        tracing::debug!(count = maps.len(), "decoded map stream");
        Ok(Self { maps })
    }

    /// Maps in record order
    pub fn maps(&self) -> &[Map] {
        &self.maps
    }

    /// Iterate maps in record order
    pub fn iter(&self) -> std::slice::Iter<'_, Map> {
        self.maps.iter()
    }

    /// Number of maps
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether no maps were decoded
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// First map whose id stem matches `map`
    pub fn find(&self, map: &Map) -> Option<&Map> {
        self.maps.iter().find(|candidate| candidate.matches(map))
    }
}

impl<'a> IntoIterator for &'a Container {
    type Item = &'a Map;
    type IntoIter = std::slice::Iter<'a, Map>;

    fn into_iter(self) -> Self::IntoIter {
        self.maps.iter()
    }
}
