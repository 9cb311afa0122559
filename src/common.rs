//! Common error types for placement and command handling.

use core::fmt;

use crate::player::Phase;
use crate::ship::{Coordinate, ShipKind};

/// Errors returned by ship geometry and fleet placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementError {
    /// A derived cell falls outside the board.
    OutOfBounds { x: i16, y: i16 },
    /// A cell is already owned by another ship of the same fleet.
    PositionOccupied(Coordinate),
    /// The fleet already holds every ship of this kind.
    QuotaExceeded(ShipKind),
}

impl fmt::Display for PlacementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlacementError::OutOfBounds { x, y } => {
                write!(f, "invalid placement: ({}, {}) is off the board", x, y)
            }
            PlacementError::PositionOccupied(c) => {
                write!(f, "invalid placement: {} already occupied", c)
            }
            PlacementError::QuotaExceeded(kind) => {
                write!(f, "fleet quota exceeded for {}", kind)
            }
        }
    }
}

impl std::error::Error for PlacementError {}

/// Command-level failures. Every variant is reported to the offending
/// connection as an `ERROR <reason>` line and leaves all state untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Empty line or unknown verb.
    UnknownCommand,
    /// Known verb with the wrong number of arguments.
    Malformed(&'static str),
    InvalidName,
    InvalidShipKind,
    InvalidOrientation,
    InvalidCoordinate,
    Placement(PlacementError),
    FleetNotFull { placed: usize },
    AlreadyReady,
    NotYourTurn,
    AlreadyAttacked(Coordinate),
    HelloRequired,
    /// The seat already registered a name.
    AlreadyJoined,
    /// A well-formed command arrived in a state that does not accept it.
    Sequence { command: &'static str, phase: Phase },
    MatchOver,
}

impl From<PlacementError> for ProtocolError {
    fn from(err: PlacementError) -> Self {
        ProtocolError::Placement(err)
    }
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::UnknownCommand => write!(f, "invalid command"),
            ProtocolError::Malformed(verb) => write!(f, "invalid {} command", verb),
            ProtocolError::InvalidName => write!(f, "invalid player name"),
            ProtocolError::InvalidShipKind => write!(f, "invalid ship type"),
            ProtocolError::InvalidOrientation => write!(f, "invalid direction"),
            ProtocolError::InvalidCoordinate => write!(f, "invalid coordinates"),
            ProtocolError::Placement(e) => write!(f, "{}", e),
            ProtocolError::FleetNotFull { placed } => {
                write!(f, "fleet not full ({}/{} units)", placed, crate::config::FLEET_UNITS)
            }
            ProtocolError::AlreadyReady => write!(f, "already ready"),
            ProtocolError::NotYourTurn => write!(f, "not your turn"),
            ProtocolError::AlreadyAttacked(c) => write!(f, "already attacked {} {}", c.x, c.y),
            ProtocolError::HelloRequired => write!(f, "hello command not received yet"),
            ProtocolError::AlreadyJoined => write!(f, "hello already received"),
            ProtocolError::Sequence { command, phase } => {
                write!(f, "{} not allowed while {}", command, phase)
            }
            ProtocolError::MatchOver => write!(f, "match is over"),
        }
    }
}

impl std::error::Error for ProtocolError {}
