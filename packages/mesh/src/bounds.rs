//! Geographic extent of a mesh cell.

use geo::{Polygon, Rect, coord};
use serde::{Deserialize, Serialize};

use crate::code::MeshCode;
use crate::scheme::GridScheme;
use crate::{Coordinate, MeshError};

/// Longitude/latitude extent of one cell: `[min, max)` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellBounds {
    /// Western edge.
    pub min_longitude: f64,
    /// Southern edge.
    pub min_latitude: f64,
    /// Eastern edge.
    pub max_longitude: f64,
    /// Northern edge.
    pub max_latitude: f64,
}

impl CellBounds {
    /// The cell centre.
    #[must_use]
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            f64::midpoint(self.min_longitude, self.max_longitude),
            f64::midpoint(self.min_latitude, self.max_latitude),
        )
    }

    /// Whether `coord` falls in the cell (west/south edges inclusive).
    #[must_use]
    pub fn contains(&self, coord: Coordinate) -> bool {
        (self.min_longitude..self.max_longitude).contains(&coord.longitude)
            && (self.min_latitude..self.max_latitude).contains(&coord.latitude)
    }

    /// The cell as a `geo` rectangle (x = longitude, y = latitude).
    #[must_use]
    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            coord! { x: self.min_longitude, y: self.min_latitude },
            coord! { x: self.max_longitude, y: self.max_latitude },
        )
    }

    /// The cell outline as a closed polygon ring.
    #[must_use]
    pub fn to_polygon(&self) -> Polygon<f64> {
        self.to_rect().to_polygon()
    }
}

impl GridScheme {
    /// Extent of the cell identified by `code`, at the code's own tier.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::InvalidMeshCode`] if the code's digit count is
    /// not 4, 6 or 8 and therefore names no cell size.
    pub fn cell_bounds(&self, code: MeshCode) -> Result<CellBounds, MeshError> {
        let tier = code.tier().ok_or_else(|| MeshError::InvalidMeshCode {
            input: code.to_string(),
            reason: "digit count matches no mesh tier",
        })?;
        let corner = self.decode(code);
        let (width, height) = self.cell_size(tier);

        Ok(CellBounds {
            min_longitude: corner.longitude,
            min_latitude: corner.latitude,
            max_longitude: corner.longitude + width,
            max_latitude: corner.latitude + height,
        })
    }
}
