//! Shared state of one match and the rules that mutate it.
//!
//! Both connection workers of a match hold an `Arc<Match>`. Every operation
//! takes the single match lock, applies the rule, posts any signal the peer
//! needs and releases the lock before returning. Nothing here awaits.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use log::info;
use serde::Serialize;

use crate::common::ProtocolError;
use crate::fleet::Strike;
use crate::player::{Player, Seat};
use crate::ship::{Coordinate, Placement, Ship, ShipKind};
use crate::sync::{Arrival, ReadinessBarrier, Signal, SignalReceiver, Signals};

/// How a match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Winner(Seat),
    Abandoned { left: Seat },
}

/// What happens after an attack was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AfterAttack {
    /// The attacker still has attacks left this turn.
    Continue,
    /// The quota is used up and the named seat now owns the turn.
    TurnPassed(Seat),
    /// The defender's fleet is gone.
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackReport {
    pub target: Coordinate,
    pub strike: Strike,
    pub after: AfterAttack,
}

/// Point-in-time view of a match, for logs and reports.
#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub id: u64,
    pub players: Vec<PlayerSummary>,
    pub turn: u32,
    pub winner: Option<&'static str>,
    pub abandoned: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlayerSummary {
    pub code: &'static str,
    pub name: String,
    pub remaining_units: usize,
}

#[derive(Debug, Default)]
struct MatchState {
    players: [Option<Player>; 2],
    /// 0 before the start; afterwards odd turns belong to the first seat.
    turn: u32,
    barrier: ReadinessBarrier,
    /// Coordinates each seat has already fired at.
    shots: [HashSet<Coordinate>; 2],
    outcome: Option<Outcome>,
}

impl MatchState {
    fn player(&self, seat: Seat) -> Result<&Player, ProtocolError> {
        self.players[seat.index()]
            .as_ref()
            .ok_or(ProtocolError::HelloRequired)
    }

    fn player_mut(&mut self, seat: Seat) -> Result<&mut Player, ProtocolError> {
        self.players[seat.index()]
            .as_mut()
            .ok_or(ProtocolError::HelloRequired)
    }

    fn active_seat(&self) -> Option<Seat> {
        match self.turn {
            0 => None,
            t if t % 2 == 1 => Some(Seat::First),
            _ => Some(Seat::Second),
        }
    }
}

#[derive(Debug)]
pub struct Match {
    id: u64,
    state: Mutex<MatchState>,
    signals: Signals,
}

impl Match {
    /// Create a match and the two seat mailboxes, in seat order.
    pub fn new(id: u64) -> (Self, [SignalReceiver; 2]) {
        let (signals, receivers) = Signals::pair();
        let game = Self {
            id,
            state: Mutex::new(MatchState::default()),
            signals,
        };
        (game, receivers)
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    fn state(&self) -> MutexGuard<'_, MatchState> {
        // Rules never panic mid-update, so a poisoned lock still holds
        // consistent state.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register the display name for `seat`.
    pub fn join(&self, seat: Seat, name: &str) -> Result<(), ProtocolError> {
        let mut state = self.state();
        let slot = &mut state.players[seat.index()];
        if slot.is_some() {
            return Err(ProtocolError::AlreadyJoined);
        }
        *slot = Some(Player::new(seat, name));
        info!("match {}: {} joined as {}", self.id, name, seat);
        Ok(())
    }

    /// Place one ship into `seat`'s fleet.
    pub fn place(&self, seat: Seat, placement: Placement) -> Result<ShipKind, ProtocolError> {
        let ship = Ship::new(placement)?;
        let mut state = self.state();
        let player = state.player_mut(seat)?;
        if player.fleet().is_ready() {
            return Err(ProtocolError::AlreadyReady);
        }
        player.fleet_mut().place(ship)?;
        Ok(placement.kind)
    }

    /// Flag `seat`'s fleet ready and arrive at the readiness barrier. The
    /// arrival that completes the barrier starts the match and signals both
    /// seats.
    pub fn ready(&self, seat: Seat) -> Result<Arrival, ProtocolError> {
        let mut state = self.state();
        if state.outcome.is_some() {
            return Err(ProtocolError::MatchOver);
        }
        state.player_mut(seat)?.fleet_mut().mark_ready()?;
        let arrival = state.barrier.arrive(seat)?;
        if arrival == Arrival::Released {
            state.turn = 1;
            self.signals.broadcast(Signal::Start);
            info!("match {}: both fleets ready, starting", self.id);
        }
        Ok(arrival)
    }

    /// Seat that owns the current turn, or `None` before the start.
    pub fn active_seat(&self) -> Option<Seat> {
        self.state().active_seat()
    }

    pub fn turn(&self) -> u32 {
        self.state().turn
    }

    /// Resolve an attack by `seat` at `target` against the opposing fleet.
    pub fn attack(&self, seat: Seat, target: Coordinate) -> Result<AttackReport, ProtocolError> {
        let mut guard = self.state();
        let state = &mut *guard;
        if state.outcome.is_some() {
            return Err(ProtocolError::MatchOver);
        }
        if state.active_seat() != Some(seat) {
            return Err(ProtocolError::NotYourTurn);
        }
        if state.shots[seat.index()].contains(&target) {
            return Err(ProtocolError::AlreadyAttacked(target));
        }

        let defender = seat.opponent();
        let strike = state
            .player_mut(defender)?
            .fleet_mut()
            .receive_attack(target);
        state.shots[seat.index()].insert(target);

        let after = if state.player(defender)?.fleet().all_sunk() {
            state.outcome = Some(Outcome::Winner(seat));
            self.signals.notify(defender, Signal::Over { winner: seat });
            info!("match {}: {} wins on turn {}", self.id, seat, state.turn);
            AfterAttack::Won
        } else if state.player_mut(seat)?.record_attack() {
            state.turn += 1;
            self.signals.notify(defender, Signal::Turn(defender));
            AfterAttack::TurnPassed(defender)
        } else {
            AfterAttack::Continue
        };

        Ok(AttackReport {
            target,
            strike,
            after,
        })
    }

    /// Record that `seat`'s connection is gone. If the match was still
    /// running it is abandoned and the other seat is told. Returns whether
    /// this call ended the match.
    pub fn leave(&self, seat: Seat) -> bool {
        let mut state = self.state();
        if state.outcome.is_some() {
            return false;
        }
        state.outcome = Some(Outcome::Abandoned { left: seat });
        self.signals.notify(seat.opponent(), Signal::OpponentLeft);
        info!("match {}: {} left, match abandoned", self.id, seat);
        true
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state().outcome
    }

    pub fn summary(&self) -> MatchSummary {
        let state = self.state();
        let players = state
            .players
            .iter()
            .flatten()
            .map(|p| PlayerSummary {
                code: p.code(),
                name: p.name().to_string(),
                remaining_units: p.fleet().remaining_units(),
            })
            .collect();
        MatchSummary {
            id: self.id,
            players,
            turn: state.turn,
            winner: match state.outcome {
                Some(Outcome::Winner(seat)) => Some(seat.code()),
                _ => None,
            },
            abandoned: matches!(state.outcome, Some(Outcome::Abandoned { .. })),
        }
    }
}
