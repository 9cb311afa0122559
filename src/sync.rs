//! Cross-connection rendezvous for one match.
//!
//! Two primitives keep the two connection workers in step:
//! - [`ReadinessBarrier`]: the second fleet to report ready releases both.
//! - [`Signals`]: one mailbox per seat. A worker that changes shared state in a
//!   way its peer must react to (match start, turn handoff, defeat, departure)
//!   posts a [`Signal`] into the peer's mailbox while still holding the match
//!   lock, so the signal can never be observed out of order with the state.
//!
//! Signals never carry game data beyond whose turn it is or who won.

use log::debug;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::common::ProtocolError;
use crate::player::Seat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Both fleets are ready; the first seat acts first.
    Start,
    /// The named seat now owns the turn.
    Turn(Seat),
    /// The match ended with `winner` sinking the whole opposing fleet.
    Over { winner: Seat },
    /// The other connection went away before the match ended.
    OpponentLeft,
}

pub type SignalReceiver = UnboundedReceiver<Signal>;

/// Result of arriving at the readiness barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrival {
    /// The other seat has not arrived yet.
    Waiting,
    /// This arrival completed the barrier.
    Released,
}

#[derive(Debug, Default)]
pub struct ReadinessBarrier {
    arrived: [bool; 2],
}

impl ReadinessBarrier {
    pub fn arrive(&mut self, seat: Seat) -> Result<Arrival, ProtocolError> {
        let slot = &mut self.arrived[seat.index()];
        if *slot {
            return Err(ProtocolError::AlreadyReady);
        }
        *slot = true;
        if self.is_released() {
            Ok(Arrival::Released)
        } else {
            Ok(Arrival::Waiting)
        }
    }

    pub fn is_released(&self) -> bool {
        self.arrived.iter().all(|a| *a)
    }
}

/// Sending halves of both seats' mailboxes.
#[derive(Debug)]
pub struct Signals {
    senders: [UnboundedSender<Signal>; 2],
}

impl Signals {
    /// Create both mailboxes. Receivers are returned in seat order.
    pub fn pair() -> (Self, [SignalReceiver; 2]) {
        let (tx1, rx1) = unbounded_channel();
        let (tx2, rx2) = unbounded_channel();
        (
            Self {
                senders: [tx1, tx2],
            },
            [rx1, rx2],
        )
    }

    pub fn notify(&self, seat: Seat, signal: Signal) {
        if self.senders[seat.index()].send(signal).is_err() {
            // Receiver dropped: that connection already ended.
            debug!("dropping {:?} for departed seat {}", signal, seat);
        }
    }

    pub fn broadcast(&self, signal: Signal) {
        self.notify(Seat::First, signal);
        self.notify(Seat::Second, signal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_arrival_releases() {
        let mut barrier = ReadinessBarrier::default();
        assert_eq!(barrier.arrive(Seat::Second), Ok(Arrival::Waiting));
        assert!(!barrier.is_released());
        assert_eq!(barrier.arrive(Seat::Second), Err(ProtocolError::AlreadyReady));
        assert_eq!(barrier.arrive(Seat::First), Ok(Arrival::Released));
        assert!(barrier.is_released());
    }

    #[tokio::test]
    async fn signals_reach_the_named_seat() {
        let (signals, [mut first, mut second]) = Signals::pair();
        signals.notify(Seat::Second, Signal::Turn(Seat::Second));
        signals.broadcast(Signal::Start);
        assert_eq!(second.recv().await, Some(Signal::Turn(Seat::Second)));
        assert_eq!(second.recv().await, Some(Signal::Start));
        assert_eq!(first.recv().await, Some(Signal::Start));
        assert!(first.try_recv().is_err());
    }

    #[test]
    fn notify_after_receiver_dropped_is_harmless() {
        let (signals, [first, _second]) = Signals::pair();
        drop(first);
        signals.notify(Seat::First, Signal::OpponentLeft);
    }
}
