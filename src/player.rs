//! Seats, protocol phases and the per-player record kept inside a match.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TURN_MAX_ATTACKS;
use crate::fleet::Fleet;

/// Which side of a match a connection occupies, assigned by arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn opponent(self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }

    /// Wire code, `P1` or `P2`.
    pub fn code(self) -> &'static str {
        match self {
            Seat::First => "P1",
            Seat::Second => "P2",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Per-connection protocol state. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingHello,
    PlacingFleet,
    AwaitingStart,
    TurnActive,
    TurnWaiting,
    Finished,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::AwaitingHello => "AWAITING_HELLO",
            Phase::PlacingFleet => "PLACING_FLEET",
            Phase::AwaitingStart => "AWAITING_START",
            Phase::TurnActive => "TURN_ACTIVE",
            Phase::TurnWaiting => "TURN_WAITING",
            Phase::Finished => "FINISHED",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct Player {
    seat: Seat,
    name: String,
    fleet: Fleet,
    /// Number of the next attack within the current turn, 1-based.
    attack_counter: u8,
}

impl Player {
    pub fn new(seat: Seat, name: impl Into<String>) -> Self {
        Self {
            seat,
            name: name.into(),
            fleet: Fleet::new(),
            attack_counter: 1,
        }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    pub fn code(&self) -> &'static str {
        self.seat.code()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fleet(&self) -> &Fleet {
        &self.fleet
    }

    pub fn fleet_mut(&mut self) -> &mut Fleet {
        &mut self.fleet
    }

    #[cfg(test)]
    fn attack_counter(&self) -> u8 {
        self.attack_counter
    }

    /// Count one attack. Returns `true` when the turn quota is used up, in
    /// which case the counter has been reset for the next turn.
    pub fn record_attack(&mut self) -> bool {
        if self.attack_counter >= TURN_MAX_ATTACKS {
            self.attack_counter = 1;
            true
        } else {
            self.attack_counter += 1;
            false
        }
    }
}
