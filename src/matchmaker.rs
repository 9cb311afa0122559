//! First-come first-paired matchmaking.
//!
//! The first admitted connection opens a match and takes the first seat; the
//! next one takes the second seat of that same match. The table maps every
//! live connection to its match so the server can release it on disconnect.

use core::fmt;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{debug, info};

use crate::game::Match;
use crate::player::Seat;
use crate::sync::SignalReceiver;

/// Arrival number of a connection, starting at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Everything a connection worker needs to take part in its match.
pub struct Ticket {
    pub game: Arc<Match>,
    pub seat: Seat,
    pub signals: SignalReceiver,
}

#[derive(Default)]
struct Table {
    next_match: u64,
    /// Match waiting for its second seat, with that seat's mailbox.
    pending: Option<(Arc<Match>, SignalReceiver)>,
    members: HashMap<ConnectionId, (Arc<Match>, Seat)>,
}

#[derive(Default)]
pub struct Matchmaker {
    table: Mutex<Table>,
}

impl Matchmaker {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Seat a newly accepted connection.
    pub fn admit(&self, conn: ConnectionId) -> Ticket {
        let mut table = self.table();

        if let Some((game, signals)) = table.pending.take() {
            if game.outcome().is_none() {
                info!("connection {} joins match {} as {}", conn, game.id(), Seat::Second);
                table.members.insert(conn, (game.clone(), Seat::Second));
                return Ticket {
                    game,
                    seat: Seat::Second,
                    signals,
                };
            }
            debug!("discarding abandoned match {}", game.id());
        }

        table.next_match += 1;
        let (game, [first, second]) = Match::new(table.next_match);
        let game = Arc::new(game);
        info!("connection {} opens match {} as {}", conn, game.id(), Seat::First);
        table.pending = Some((game.clone(), second));
        table.members.insert(conn, (game.clone(), Seat::First));
        Ticket {
            game,
            seat: Seat::First,
            signals: first,
        }
    }

    /// Forget a closed connection. An unpaired match whose only member left
    /// is dropped so the next arrival starts fresh.
    pub fn release(&self, conn: ConnectionId) {
        let mut table = self.table();
        let Some((game, seat)) = table.members.remove(&conn) else {
            return;
        };
        debug!("connection {} ({}) released from match {}", conn, seat, game.id());
        let orphaned = matches!(&table.pending, Some((pending, _)) if Arc::ptr_eq(pending, &game));
        if orphaned {
            table.pending = None;
            info!("match {} discarded before pairing", game.id());
        }
    }

    pub fn lookup(&self, conn: ConnectionId) -> Option<(Arc<Match>, Seat)> {
        self.table().members.get(&conn).cloned()
    }

    /// Number of matches with at least one live connection.
    #[cfg(test)]
    fn live_matches(&self) -> usize {
        let table = self.table();
        let mut ids: Vec<u64> = table.members.values().map(|(g, _)| g.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pairs_in_arrival_order() {
        let mm = Matchmaker::new();
        let a = mm.admit(ConnectionId(1));
        let b = mm.admit(ConnectionId(2));
        let c = mm.admit(ConnectionId(3));
        assert_eq!(a.seat, Seat::First);
        assert_eq!(b.seat, Seat::Second);
        assert!(Arc::ptr_eq(&a.game, &b.game));
        assert_eq!(c.seat, Seat::First);
        assert!(!Arc::ptr_eq(&a.game, &c.game));
        assert_eq!(mm.live_matches(), 2);
    }

    #[test]
    fn lone_player_leaving_discards_the_match() {
        let mm = Matchmaker::new();
        let a = mm.admit(ConnectionId(1));
        a.game.leave(a.seat);
        mm.release(ConnectionId(1));
        let b = mm.admit(ConnectionId(2));
        assert_eq!(b.seat, Seat::First);
        assert!(!Arc::ptr_eq(&a.game, &b.game));
        assert!(mm.lookup(ConnectionId(1)).is_none());
    }

    #[test]
    fn abandoned_pending_match_is_skipped() {
        let mm = Matchmaker::new();
        let a = mm.admit(ConnectionId(1));
        // Left but not yet released.
        a.game.leave(a.seat);
        let b = mm.admit(ConnectionId(2));
        assert_eq!(b.seat, Seat::First);
        assert_ne!(a.game.id(), b.game.id());
    }
}
