//! Text protocol: parsing client command lines and formatting server replies.
//!
//! Commands are space-separated tokens on one line:
//! `HELLO <name>`, `SHIP <KIND> <x> <y> <H|V>`, `READY`, `ATTACK <x> <y>`.

use core::fmt;

use crate::common::ProtocolError;
use crate::config::{BOARD_SIZE, MAX_NAME_LEN};
use crate::player::Seat;
use crate::ship::{Coordinate, Orientation, Placement, ShipKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Hello { name: String },
    Ship(Placement),
    Ready,
    Attack(Coordinate),
}

impl Command {
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Hello { .. } => "HELLO",
            Command::Ship(_) => "SHIP",
            Command::Ready => "READY",
            Command::Attack(_) => "ATTACK",
        }
    }

    /// Parse one trimmed line.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&verb, args)) = parts.split_first() else {
            return Err(ProtocolError::UnknownCommand);
        };
        match verb {
            "HELLO" => {
                let [name] = args else {
                    return Err(ProtocolError::Malformed("HELLO"));
                };
                let len = name.chars().count();
                if len == 0 || len > MAX_NAME_LEN {
                    return Err(ProtocolError::InvalidName);
                }
                Ok(Command::Hello {
                    name: name.to_string(),
                })
            }
            "SHIP" => {
                let [kind, x, y, orientation] = args else {
                    return Err(ProtocolError::Malformed("SHIP"));
                };
                let kind: ShipKind = kind.parse().map_err(|_| ProtocolError::InvalidShipKind)?;
                let anchor = parse_coordinate(x, y)?;
                let orientation: Orientation = orientation
                    .parse()
                    .map_err(|_| ProtocolError::InvalidOrientation)?;
                Ok(Command::Ship(Placement {
                    kind,
                    anchor,
                    orientation,
                }))
            }
            "READY" => {
                if !args.is_empty() {
                    return Err(ProtocolError::Malformed("READY"));
                }
                Ok(Command::Ready)
            }
            "ATTACK" => {
                let [x, y] = args else {
                    return Err(ProtocolError::Malformed("ATTACK"));
                };
                Ok(Command::Attack(parse_coordinate(x, y)?))
            }
            _ => Err(ProtocolError::UnknownCommand),
        }
    }
}

/// Each axis must be a single digit inside the board.
fn parse_coordinate(x: &str, y: &str) -> Result<Coordinate, ProtocolError> {
    let axis = |token: &str| -> Result<u8, ProtocolError> {
        match token.as_bytes() {
            [d @ b'0'..=b'9'] if d - b'0' < BOARD_SIZE => Ok(d - b'0'),
            _ => Err(ProtocolError::InvalidCoordinate),
        }
    };
    Coordinate::new(axis(x)?, axis(y)?).ok_or(ProtocolError::InvalidCoordinate)
}

/// Server reply lines. `Display` renders the exact wire text without the
/// trailing newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    Welcome { seat: Seat, name: String },
    ShipPlaced(ShipKind),
    Start(Seat),
    Turn(Seat),
    Hit(Coordinate),
    Miss(Coordinate),
    Sunk(Coordinate, ShipKind),
    Win(Seat),
    /// Sent to the defeated side, naming the winner.
    Lose(Seat),
    OpponentLeft,
    Error(ProtocolError),
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Response::Welcome { seat, name } => write!(f, "WELCOME {} {}", seat, name),
            Response::ShipPlaced(kind) => write!(f, "OK SHIP {}", kind),
            Response::Start(seat) => write!(f, "START {}", seat),
            Response::Turn(seat) => write!(f, "TURN {}", seat),
            Response::Hit(c) => write!(f, "HIT {} {}", c.x, c.y),
            Response::Miss(c) => write!(f, "MISS {} {}", c.x, c.y),
            Response::Sunk(c, kind) => write!(f, "SUNK {} {} {}", c.x, c.y, kind),
            Response::Win(seat) => write!(f, "WIN {}", seat),
            Response::Lose(seat) => write!(f, "LOSE {}", seat),
            Response::OpponentLeft => write!(f, "OPPONENT_LEFT"),
            Response::Error(e) => write!(f, "ERROR {}", e),
        }
    }
}
