//! Ship kinds, board coordinates and placement geometry.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::PlacementError;
use crate::config::BOARD_SIZE;

/// A cell on the 10×10 board. Origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: u8,
    pub y: u8,
}

impl Coordinate {
    /// Returns `None` when either axis is off the board.
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if x < BOARD_SIZE && y < BOARD_SIZE {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Apply a signed offset, failing if the result leaves the board.
    fn offset(self, dx: i8, dy: i8) -> Result<Self, PlacementError> {
        let x = self.x as i16 + dx as i16;
        let y = self.y as i16 + dy as i16;
        let size = BOARD_SIZE as i16;
        if (0..size).contains(&x) && (0..size).contains(&y) {
            Ok(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            Err(PlacementError::OutOfBounds { x, y })
        }
    }

    /// Every cell of the board, row by row.
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Coordinate { x, y }))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Orientation of a ship on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn token(self) -> &'static str {
        match self {
            Orientation::Horizontal => "H",
            Orientation::Vertical => "V",
        }
    }
}

impl FromStr for Orientation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "H" => Ok(Orientation::Horizontal),
            "V" => Ok(Orientation::Vertical),
            _ => Err(()),
        }
    }
}

/// The five ship classes. Lengths are fixed by the rules of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ShipKind {
    Carrier,
    Cruiser,
    Battleship,
    Destroyer,
    Submarine,
}

const CARRIER_H: [(i8, i8); 5] = [(0, 0), (1, 0), (2, 0), (2, 1), (2, -1)];
const CARRIER_V: [(i8, i8); 5] = [(0, 0), (0, 1), (0, 2), (1, 2), (-1, 2)];
const CRUISER_H: [(i8, i8); 4] = [(0, 0), (1, 0), (2, 0), (3, 0)];
const CRUISER_V: [(i8, i8); 4] = [(0, 0), (0, 1), (0, 2), (0, 3)];
const BATTLESHIP_H: [(i8, i8); 3] = [(0, 0), (1, 0), (2, 0)];
const BATTLESHIP_V: [(i8, i8); 3] = [(0, 0), (0, 1), (0, 2)];
const DESTROYER_H: [(i8, i8); 2] = [(0, 0), (1, 0)];
const DESTROYER_V: [(i8, i8); 2] = [(0, 0), (0, 1)];
const SUBMARINE: [(i8, i8); 1] = [(0, 0)];

impl ShipKind {
    pub const ALL: [ShipKind; 5] = [
        ShipKind::Carrier,
        ShipKind::Cruiser,
        ShipKind::Battleship,
        ShipKind::Destroyer,
        ShipKind::Submarine,
    ];

    /// Number of cells the ship occupies.
    pub fn length(self) -> usize {
        match self {
            ShipKind::Carrier => 5,
            ShipKind::Cruiser => 4,
            ShipKind::Battleship => 3,
            ShipKind::Destroyer => 2,
            ShipKind::Submarine => 1,
        }
    }

    /// Wire name, e.g. `CARRIER`.
    pub fn name(self) -> &'static str {
        match self {
            ShipKind::Carrier => "CARRIER",
            ShipKind::Cruiser => "CRUISER",
            ShipKind::Battleship => "BATTLESHIP",
            ShipKind::Destroyer => "DESTROYER",
            ShipKind::Submarine => "SUBMARINE",
        }
    }

    /// Cell offsets from the anchor. The carrier is not a straight line: its
    /// shaft of three ends in a perpendicular cap of two.
    pub fn offsets(self, orientation: Orientation) -> &'static [(i8, i8)] {
        match (self, orientation) {
            (ShipKind::Carrier, Orientation::Horizontal) => &CARRIER_H,
            (ShipKind::Carrier, Orientation::Vertical) => &CARRIER_V,
            (ShipKind::Cruiser, Orientation::Horizontal) => &CRUISER_H,
            (ShipKind::Cruiser, Orientation::Vertical) => &CRUISER_V,
            (ShipKind::Battleship, Orientation::Horizontal) => &BATTLESHIP_H,
            (ShipKind::Battleship, Orientation::Vertical) => &BATTLESHIP_V,
            (ShipKind::Destroyer, Orientation::Horizontal) => &DESTROYER_H,
            (ShipKind::Destroyer, Orientation::Vertical) => &DESTROYER_V,
            (ShipKind::Submarine, _) => &SUBMARINE,
        }
    }
}

impl fmt::Display for ShipKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShipKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or(())
    }
}

/// Cells occupied by a ship of `kind` anchored at `anchor`.
///
/// Pure: knows nothing about other ships. Fails if any cell is off the board.
pub fn compute_cells(
    kind: ShipKind,
    anchor: Coordinate,
    orientation: Orientation,
) -> Result<Vec<Coordinate>, PlacementError> {
    kind.offsets(orientation)
        .iter()
        .map(|&(dx, dy)| anchor.offset(dx, dy))
        .collect()
}

/// A requested placement, before it is checked against a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub kind: ShipKind,
    pub anchor: Coordinate,
    pub orientation: Orientation,
}

/// A placed ship with per-cell hit flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ship {
    kind: ShipKind,
    cells: Vec<Coordinate>,
    hits: Vec<bool>,
}

impl Ship {
    pub fn new(placement: Placement) -> Result<Self, PlacementError> {
        let cells = compute_cells(placement.kind, placement.anchor, placement.orientation)?;
        let hits = vec![false; cells.len()];
        Ok(Self {
            kind: placement.kind,
            cells,
            hits,
        })
    }

    pub fn kind(&self) -> ShipKind {
        self.kind
    }

    pub fn cells(&self) -> &[Coordinate] {
        &self.cells
    }

    /// Mark `coord` as hit. Returns `Some(true)` on a fresh hit, `Some(false)`
    /// if that cell was already hit and `None` if the ship does not cover it.
    pub fn hit(&mut self, coord: Coordinate) -> Option<bool> {
        let idx = self.cells.iter().position(|c| *c == coord)?;
        let fresh = !self.hits[idx];
        self.hits[idx] = true;
        Some(fresh)
    }

    pub fn is_sunk(&self) -> bool {
        self.hits.iter().all(|h| *h)
    }
}
