//! CSV digest, one row per map

use std::fmt;
use std::io::{self, Write};

use super::Reference;
use crate::image::{MapData, MemoryImage};
use crate::mappack::Map;

/// Fixed columns, before one column per reference container
pub const CSV_COLUMNS: [&str; 16] = [
    "ID",
    "Address",
    "Name",
    "Size",
    "Organization",
    "Description",
    "Units",
    "X Units",
    "Y Units",
    "Scale",
    "X Scale",
    "Y Scale",
    "Value min",
    "Value max",
    "Value min*1",
    "Value max*1",
];

/// A row of double-quoted cells
#[derive(Debug, Clone, Default)]
pub struct CsvRow {
    cells: Vec<String>,
}

impl CsvRow {
    /// An empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell
    pub fn push(&mut self, cell: impl fmt::Display) {
        self.cells.push(cell.to_string());
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the row has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl fmt::Display for CsvRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "\"{}\"", cell.replace('"', "\"\""))?;
        }
        Ok(())
    }
}

/// Header row for the given reference containers
pub fn header(references: &[Reference]) -> CsvRow {
    let mut row = CsvRow::new();
    for column in CSV_COLUMNS {
        row.push(column);
    }
    for reference in references {
        row.push(&reference.label);
    }
    row
}

/// Data row for one map.
///
/// With an image, the min/max columns hold scaled and raw extremes of the map
/// cells. If the map cannot be read from the image they are left empty, as
/// they are when no image is given.
pub fn row(map: &Map, image: Option<&MemoryImage>, references: &[Reference]) -> CsvRow {
    let mut row = CsvRow::new();
    row.push(&map.id);
    row.push(map.address());
    row.push(&map.name);
    row.push(map.size);
    row.push(map.value.encoding);
    row.push(&map.value.description);
    row.push(&map.value.units);
    row.push(&map.x_axis.value.units);
    row.push(&map.y_axis.value.units);
    row.push(format_args!("{:.6}", map.value.factor));
    row.push(format_args!("{:.6}", map.x_axis.value.factor));
    row.push(format_args!("{:.6}", map.y_axis.value.factor));

    let overlay = image.and_then(|image| match MapData::for_map(map, image) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!(map = %map.name, id = %map.id, "Skipping image overlay: {e}");
            None
        }
    });
    match overlay {
        Some(data) => {
            row.push(format_args!("{:.6}", data.minimum_value()));
            row.push(format_args!("{:.6}", data.maximum_value()));
            row.push(data.format_raw(data.minimum()));
            row.push(data.format_raw(data.maximum()));
        }
        None => {
            for _ in 0..4 {
                row.push("");
            }
        }
    }

    for reference in references {
        row.push(reference.name_for(map));
    }
    row
}

/// Write the header line, one extra column per reference
pub fn write_header<W: Write>(writer: &mut W, references: &[Reference]) -> io::Result<()> {
    writeln!(writer, "{}", header(references))
}

/// Write the digest line of one map
pub fn write_row<W: Write>(
    writer: &mut W,
    map: &Map,
    image: Option<&MemoryImage>,
    references: &[Reference],
) -> io::Result<()> {
    writeln!(writer, "{}", row(map, image, references))
}
