//! Table layout as seen by definition consumers

use crate::mappack::{Axis, Dimension, Map};

/// Widest table a definition consumer accepts
pub const MAX_COLUMNS: i32 = 256;

/// Column/row assignment of a table map for definition output.
///
/// Tables wider than [`MAX_COLUMNS`] but no taller are transposed: the X and Y
/// axes trade places along with the two dimensions. The map itself is never
/// modified, so any number of views may be taken from one map.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    /// The map being viewed
    pub map: &'a Map,
    /// Axis rendered as columns
    pub x_axis: &'a Axis,
    /// Axis rendered as rows
    pub y_axis: &'a Axis,
    /// Columns by rows after any transposition
    pub size: Dimension,
    /// Whether the axes were exchanged
    pub swapped: bool,
}

impl<'a> TableView<'a> {
    /// View `map`, transposing it when it is too wide
    pub fn new(map: &'a Map) -> Self {
        let swap = map.organization.is_table()
            && map.size.x > MAX_COLUMNS
            && map.size.y <= MAX_COLUMNS;
        if swap {
            Self {
                map,
                x_axis: &map.y_axis,
                y_axis: &map.x_axis,
                size: map.size.transposed(),
                swapped: true,
            }
        } else {
            Self {
                map,
                x_axis: &map.x_axis,
                y_axis: &map.y_axis,
                size: map.size,
                swapped: false,
            }
        }
    }

    /// Cell axis, never exchanged
    pub fn z_axis(&self) -> &'a Axis {
        &self.map.z_axis
    }
}
