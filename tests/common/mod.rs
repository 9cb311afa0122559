#![allow(dead_code)]

use std::sync::Arc;

use battleship_server::{
    serve_connection, ConnectionId, Coordinate, Fleet, InMemoryTransport, Matchmaker, Placement,
    Ship, Transport,
};
use tokio::time::{timeout, Duration};

/// A legal full fleet, one command per ship.
pub const FLEET_COMMANDS: [&str; 11] = [
    "SHIP CARRIER 1 1 H",
    "SHIP CRUISER 5 0 V",
    "SHIP BATTLESHIP 6 7 H",
    "SHIP BATTLESHIP 0 7 H",
    "SHIP DESTROYER 4 5 H",
    "SHIP DESTROYER 0 3 V",
    "SHIP DESTROYER 7 0 H",
    "SHIP SUBMARINE 9 2 V",
    "SHIP SUBMARINE 9 4 V",
    "SHIP SUBMARINE 9 9 H",
    "SHIP SUBMARINE 0 9 H",
];

/// The same fleet as a model the tests can attack locally.
pub fn fleet_model() -> Fleet {
    let mut fleet = Fleet::new();
    for cmd in FLEET_COMMANDS {
        match battleship_server::Command::parse(cmd) {
            Ok(battleship_server::Command::Ship(p)) => fleet.place(Ship::new(p).unwrap()).unwrap(),
            other => panic!("bad fixture {:?}", other),
        }
    }
    fleet
}

pub fn occupied_cells() -> Vec<Coordinate> {
    let fleet = fleet_model();
    fleet.ships().iter().flat_map(|s| s.cells().to_vec()).collect()
}

pub fn water_cells() -> Vec<Coordinate> {
    let fleet = fleet_model();
    Coordinate::all().filter(|c| fleet.ship_at(*c).is_none()).collect()
}

pub fn placement_line(p: &Placement) -> String {
    format!("SHIP {} {} {} {}", p.kind, p.anchor.x, p.anchor.y, p.orientation.token())
}

/// Admit two in-memory connections into one match and return the client ends.
pub fn spawn_match(mm: &Arc<Matchmaker>) -> (InMemoryTransport, InMemoryTransport) {
    let (server1, client1) = InMemoryTransport::pair();
    let (server2, client2) = InMemoryTransport::pair();
    for (n, server) in [(1, server1), (2, server2)] {
        let conn = ConnectionId(n);
        let ticket = mm.admit(conn);
        tokio::spawn(serve_connection(conn, ticket, server, mm.clone()));
    }
    (client1, client2)
}

pub async fn send(t: &mut InMemoryTransport, line: &str) {
    t.send_line(line).await.unwrap();
}

pub async fn recv(t: &mut InMemoryTransport) -> String {
    timeout(Duration::from_secs(5), t.recv_line())
        .await
        .expect("timed out waiting for a server line")
        .unwrap()
        .expect("server closed the connection")
}

pub async fn expect(t: &mut InMemoryTransport, line: &str) {
    assert_eq!(recv(t).await, line);
}

/// Nothing arrives within a short grace period.
pub async fn expect_silence(t: &mut InMemoryTransport) {
    let res = timeout(Duration::from_millis(100), t.recv_line()).await;
    assert!(res.is_err(), "unexpected line: {:?}", res);
}

/// The server side hung up.
pub async fn expect_closed(t: &mut InMemoryTransport) {
    let res = timeout(Duration::from_secs(5), t.recv_line())
        .await
        .expect("timed out waiting for close")
        .unwrap();
    assert_eq!(res, None);
}

pub async fn hello_and_place(t: &mut InMemoryTransport, code: &str, name: &str) {
    send(t, &format!("HELLO {}", name)).await;
    expect(t, &format!("WELCOME {} {}", code, name)).await;
    for cmd in FLEET_COMMANDS {
        send(t, cmd).await;
        let kind = cmd.split_whitespace().nth(1).unwrap();
        expect(t, &format!("OK SHIP {}", kind)).await;
    }
}

/// Both sides placed and started; P1 owns the first turn.
pub async fn started_match(mm: &Arc<Matchmaker>) -> (InMemoryTransport, InMemoryTransport) {
    let (mut a, mut b) = spawn_match(mm);
    hello_and_place(&mut a, "P1", "Alice").await;
    hello_and_place(&mut b, "P2", "Bob").await;
    send(&mut a, "READY").await;
    send(&mut b, "READY").await;
    for t in [&mut a, &mut b] {
        expect(t, "START P1").await;
        expect(t, "TURN P1").await;
    }
    (a, b)
}
