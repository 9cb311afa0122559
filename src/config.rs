use crate::ship::ShipKind;

pub const BOARD_SIZE: u8 = 10;

/// Attacks a player may issue before the turn passes to the opponent.
pub const TURN_MAX_ATTACKS: u8 = 3;

/// Longest display name accepted by `HELLO`.
pub const MAX_NAME_LEN: usize = 20;

/// Longest command line a connection may send, in bytes.
pub const MAX_LINE_LEN: usize = 256;

/// Ships in a complete fleet, counted from `FLEET`.
pub const NUM_SHIPS: usize = 1 + 1 + 2 + 3 + 4;

/// Fixed fleet composition: kind and how many of it each player places.
pub const FLEET: [(ShipKind, usize); 5] = [
    (ShipKind::Carrier, 1),
    (ShipKind::Cruiser, 1),
    (ShipKind::Battleship, 2),
    (ShipKind::Destroyer, 3),
    (ShipKind::Submarine, 4),
];

/// Total number of ship cells in a complete fleet.
pub const FLEET_UNITS: usize = 5 + 4 + 3 * 2 + 2 * 3 + 4;

/// How many ships of `kind` a complete fleet holds.
pub fn quota(kind: ShipKind) -> usize {
    FLEET
        .iter()
        .find(|(k, _)| *k == kind)
        .map(|(_, n)| *n)
        .unwrap_or(0)
}

/// Runtime settings for the TCP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub max_line_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_line_len: MAX_LINE_LEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fleet_table_matches_unit_total() {
        let units: usize = FLEET.iter().map(|(k, n)| k.length() * n).sum();
        let ships: usize = FLEET.iter().map(|(_, n)| n).sum();
        assert_eq!(units, FLEET_UNITS);
        assert_eq!(ships, NUM_SHIPS);
    }
}
