//! Adjacency navigation between 3rd-order cells.

use std::ops::BitOr;

use serde::{Deserialize, Serialize};

use crate::code::{MeshCode, MeshTier};
use crate::scheme::GridScheme;
use crate::MeshError;

/// Independent movement flags; combine with `|` for diagonal moves.
///
/// Opposite flags cancel: `LEFT | RIGHT` stays in place along longitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Direction {
    /// Move one cell west.
    pub left: bool,
    /// Move one cell east.
    pub right: bool,
    /// Move one cell north.
    pub up: bool,
    /// Move one cell south.
    pub down: bool,
}

impl Direction {
    /// No movement.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
    };
    /// One cell west.
    pub const LEFT: Self = Self {
        left: true,
        ..Self::NONE
    };
    /// One cell east.
    pub const RIGHT: Self = Self {
        right: true,
        ..Self::NONE
    };
    /// One cell north.
    pub const UP: Self = Self {
        up: true,
        ..Self::NONE
    };
    /// One cell south.
    pub const DOWN: Self = Self {
        down: true,
        ..Self::NONE
    };

    /// Net `(longitude, latitude)` steps, each in `-1..=1`.
    #[must_use]
    pub const fn steps(self) -> (i8, i8) {
        (
            self.right as i8 - self.left as i8,
            self.up as i8 - self.down as i8,
        )
    }
}

impl BitOr for Direction {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self {
            left: self.left || rhs.left,
            right: self.right || rhs.right,
            up: self.up || rhs.up,
            down: self.down || rhs.down,
        }
    }
}

/// The eight compass moves, row by row from north-west to south-east.
const SURROUNDING: [Direction; 8] = [
    Direction {
        up: true,
        left: true,
        right: false,
        down: false,
    },
    Direction::UP,
    Direction {
        up: true,
        right: true,
        left: false,
        down: false,
    },
    Direction::LEFT,
    Direction::RIGHT,
    Direction {
        down: true,
        left: true,
        right: false,
        up: false,
    },
    Direction::DOWN,
    Direction {
        down: true,
        right: true,
        left: false,
        up: false,
    },
];

impl GridScheme {
    /// Returns the 3rd-order code one step away from `code` in `direction`.
    ///
    /// The step is `1/80` deg of longitude and one 3rd-order row of
    /// latitude. The shift is applied to the centre of the 3rd-order cell
    /// at the code's reference corner, so the result never depends on
    /// rounding at cell edges.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] if the scheme is strict and the
    /// move leaves its domain.
    pub fn adjacent(&self, code: MeshCode, direction: Direction) -> Result<MeshCode, MeshError> {
        self.encode(self.shifted_center(code, direction), MeshTier::Third)
    }

    /// [`GridScheme::adjacent`] without consulting validation.
    #[must_use]
    pub fn adjacent_unchecked(&self, code: MeshCode, direction: Direction) -> MeshCode {
        self.encode_unchecked(self.shifted_center(code, direction), MeshTier::Third)
    }

    /// The eight 3rd-order cells around `code`, north-west first.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::OutOfRange`] if the scheme is strict and any
    /// neighbour lies outside its domain.
    pub fn neighbors(&self, code: MeshCode) -> Result<[MeshCode; 8], MeshError> {
        let mut cells = [code; 8];
        for (cell, direction) in cells.iter_mut().zip(SURROUNDING) {
            *cell = self.adjacent(code, direction)?;
        }
        Ok(cells)
    }

    fn shifted_center(&self, code: MeshCode, direction: Direction) -> crate::Coordinate {
        let (width, height) = self.cell_size(MeshTier::Third);
        let (d_lon, d_lat) = direction.steps();
        self.decode(code).offset(
            width * (f64::from(d_lon) + 0.5),
            height * (f64::from(d_lat) + 0.5),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Coordinate, decode, encode3};

    fn code(value: u64) -> MeshCode {
        MeshCode::new(value).unwrap()
    }

    #[test]
    fn moves_one_cell_per_flag() {
        let scheme = GridScheme::JIS;
        let origin = code(53_394_655);
        assert_eq!(scheme.adjacent_unchecked(origin, Direction::RIGHT), code(53_394_656));
        assert_eq!(scheme.adjacent_unchecked(origin, Direction::LEFT), code(53_394_654));
        assert_eq!(scheme.adjacent_unchecked(origin, Direction::UP), code(53_394_665));
        assert_eq!(scheme.adjacent_unchecked(origin, Direction::DOWN), code(53_394_645));
    }

    #[test]
    fn combined_flags_move_diagonally() {
        let origin = code(53_394_655);
        let moved = GridScheme::JIS.adjacent_unchecked(origin, Direction::UP | Direction::RIGHT);
        assert_eq!(moved, code(53_394_666));
    }

    #[test]
    fn opposite_flags_cancel() {
        let origin = code(53_394_655);
        assert_eq!(
            GridScheme::JIS.adjacent_unchecked(origin, Direction::LEFT | Direction::RIGHT),
            origin
        );
        assert_eq!(GridScheme::JIS.adjacent_unchecked(origin, Direction::NONE), origin);
    }

    #[test]
    fn crosses_second_order_boundary() {
        // Last column of 2nd-order cell 533946 borders the first column of 533947.
        let origin = code(53_394_619);
        assert_eq!(
            GridScheme::JIS.adjacent_unchecked(origin, Direction::RIGHT),
            code(53_394_710)
        );
        // Top row of 533946 borders the bottom row of 533956.
        let origin = code(53_394_695);
        assert_eq!(
            GridScheme::JIS.adjacent_unchecked(origin, Direction::UP),
            code(53_395_605)
        );
    }

    #[test]
    fn crosses_first_order_boundary() {
        let origin = code(53_397_799);
        assert_eq!(
            GridScheme::JIS.adjacent_unchecked(origin, Direction::RIGHT),
            code(53_407_090)
        );
    }

    #[test]
    fn every_direction_round_trips() {
        let origin = encode3(Coordinate::new(140.740_593, 40.824_308));
        let pairs = [
            (Direction::LEFT, Direction::RIGHT),
            (Direction::UP, Direction::DOWN),
            (Direction::UP | Direction::LEFT, Direction::DOWN | Direction::RIGHT),
        ];
        for (there, back) in pairs {
            let moved = crate::adjacent(origin, there);
            assert_ne!(moved, origin);
            assert_eq!(crate::adjacent(moved, back), origin);
        }
    }

    #[test]
    fn neighbors_surround_origin() {
        let origin = code(53_394_655);
        let cells = GridScheme::JIS.neighbors(origin).unwrap();
        assert_eq!(
            cells.map(MeshCode::value),
            [
                53_394_664, 53_394_665, 53_394_666, 53_394_654, 53_394_656, 53_394_644,
                53_394_645, 53_394_646,
            ]
        );
        let centre = decode(origin);
        for cell in cells {
            let corner = decode(cell);
            assert!((corner.longitude - centre.longitude).abs() < 1.5 / 80.0);
            assert!((corner.latitude - centre.latitude).abs() < 1.5 / 120.0);
        }
    }

    #[test]
    fn strict_scheme_rejects_leaving_domain() {
        // 3rd-order cell in the westernmost column of the JIS domain.
        let edge = code(53_000_000);
        assert!(matches!(
            GridScheme::JIS.strict().adjacent(edge, Direction::LEFT),
            Err(MeshError::OutOfRange { .. })
        ));
        assert!(GridScheme::JIS.strict().adjacent(edge, Direction::RIGHT).is_ok());
    }
}
