//! A player's fleet: placed ships, a cell index for attack lookup, and the
//! remaining-unit counter that decides defeat.

use std::collections::HashMap;

use rand::Rng;

use crate::common::{PlacementError, ProtocolError};
use crate::config::{quota, BOARD_SIZE, FLEET, FLEET_UNITS};
use crate::ship::{Coordinate, Orientation, Placement, Ship, ShipKind};

/// Outcome of a single attack against a fleet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strike {
    pub hit: bool,
    /// Set when this strike sank the ship it hit.
    pub sunk: Option<ShipKind>,
}

#[derive(Debug, Clone)]
pub struct Fleet {
    ships: Vec<Ship>,
    positions: HashMap<Coordinate, usize>,
    placed_units: usize,
    remaining_units: usize,
    ready: bool,
}

impl Default for Fleet {
    fn default() -> Self {
        Self::new()
    }
}

impl Fleet {
    pub fn new() -> Self {
        Self {
            ships: Vec::new(),
            positions: HashMap::new(),
            placed_units: 0,
            remaining_units: FLEET_UNITS,
            ready: false,
        }
    }

    /// Add a ship. Either every cell is committed or nothing changes.
    pub fn place(&mut self, ship: Ship) -> Result<(), PlacementError> {
        let kind = ship.kind();
        let placed_of_kind = self.ships.iter().filter(|s| s.kind() == kind).count();
        if placed_of_kind >= quota(kind) {
            return Err(PlacementError::QuotaExceeded(kind));
        }
        if let Some(taken) = ship.cells().iter().find(|c| self.positions.contains_key(c)) {
            return Err(PlacementError::PositionOccupied(*taken));
        }

        let idx = self.ships.len();
        for cell in ship.cells() {
            self.positions.insert(*cell, idx);
        }
        self.placed_units += ship.cells().len();
        self.ships.push(ship);
        Ok(())
    }

    pub fn ship_at(&self, coord: Coordinate) -> Option<&Ship> {
        self.positions.get(&coord).map(|&idx| &self.ships[idx])
    }

    /// Resolve an attack on `coord`. A repeated hit on the same cell reports a
    /// hit again but is not counted twice.
    pub fn receive_attack(&mut self, coord: Coordinate) -> Strike {
        let Some(&idx) = self.positions.get(&coord) else {
            return Strike {
                hit: false,
                sunk: None,
            };
        };
        let ship = &mut self.ships[idx];
        let fresh = ship.hit(coord).unwrap_or(false);
        if !fresh {
            return Strike {
                hit: true,
                sunk: None,
            };
        }
        self.remaining_units = self.remaining_units.saturating_sub(1);
        Strike {
            hit: true,
            sunk: ship.is_sunk().then_some(ship.kind()),
        }
    }

    pub fn all_sunk(&self) -> bool {
        self.remaining_units == 0
    }

    pub fn placed_units(&self) -> usize {
        self.placed_units
    }

    pub fn remaining_units(&self) -> usize {
        self.remaining_units
    }

    pub fn is_full(&self) -> bool {
        self.placed_units == FLEET_UNITS
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Flag the fleet ready. Only a complete fleet can be flagged, and only once.
    pub fn mark_ready(&mut self) -> Result<(), ProtocolError> {
        if self.ready {
            return Err(ProtocolError::AlreadyReady);
        }
        if !self.is_full() {
            return Err(ProtocolError::FleetNotFull {
                placed: self.placed_units,
            });
        }
        self.ready = true;
        Ok(())
    }

    pub fn ships(&self) -> &[Ship] {
        &self.ships
    }

    /// Generate a complete, non-overlapping layout. Returns `None` only if
    /// every retry got stuck, which does not happen on a 10×10 board in practice.
    pub fn random_layout<R: Rng>(rng: &mut R) -> Option<Vec<Placement>> {
        'layout: for _ in 0..100 {
            let mut fleet = Fleet::new();
            let mut layout = Vec::with_capacity(crate::config::NUM_SHIPS);
            for (kind, count) in FLEET {
                for _ in 0..count {
                    let mut placed = false;
                    for _ in 0..200 {
                        let orientation = if rng.random::<bool>() {
                            Orientation::Horizontal
                        } else {
                            Orientation::Vertical
                        };
                        let anchor = Coordinate {
                            x: rng.random_range(0..BOARD_SIZE),
                            y: rng.random_range(0..BOARD_SIZE),
                        };
                        let placement = Placement {
                            kind,
                            anchor,
                            orientation,
                        };
                        let Ok(ship) = Ship::new(placement) else {
                            continue;
                        };
                        if fleet.place(ship).is_ok() {
                            layout.push(placement);
                            placed = true;
                            break;
                        }
                    }
                    if !placed {
                        continue 'layout;
                    }
                }
            }
            return Some(layout);
        }
        None
    }
}
