//! Per-connection protocol state machine.
//!
//! A `Session` owns one connection's transport and walks it through
//! `AWAITING_HELLO → PLACING_FLEET → AWAITING_START → (TURN_ACTIVE ⇄
//! TURN_WAITING) → FINISHED`. It waits on two sources at once: the next line
//! from its own client and the next signal from its peer's worker. Rule
//! violations are answered with an `ERROR` line and never end the session;
//! only a transport failure or the end of the match does.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::common::ProtocolError;
use crate::game::{AfterAttack, Match};
use crate::matchmaker::{ConnectionId, Ticket};
use crate::player::{Phase, Seat};
use crate::protocol::{Command, Response};
use crate::sync::{Signal, SignalReceiver};
use crate::transport::Transport;

enum Event {
    Line(anyhow::Result<Option<String>>),
    Signal(Option<Signal>),
}

pub struct Session<T: Transport> {
    conn: ConnectionId,
    seat: Seat,
    game: Arc<Match>,
    signals: SignalReceiver,
    transport: T,
    phase: Phase,
}

impl<T: Transport> Session<T> {
    pub fn new(conn: ConnectionId, ticket: Ticket, transport: T) -> Self {
        Self {
            conn,
            seat: ticket.seat,
            game: ticket.game,
            signals: ticket.signals,
            transport,
            phase: Phase::AwaitingHello,
        }
    }

    /// Drive the connection until the match ends or the transport does.
    /// Always leaves the match on the way out, so the peer is never left
    /// waiting on a connection that is gone.
    pub async fn run(mut self) -> anyhow::Result<Phase> {
        let result = self.drive().await;
        if self.game.leave(self.seat) {
            debug!("connection {} left match {} in {}", self.conn, self.game.id(), self.phase);
        }
        result.map(|()| self.phase)
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        while self.phase != Phase::Finished {
            let event = tokio::select! {
                biased;
                signal = self.signals.recv() => Event::Signal(signal),
                line = self.transport.recv_line() => Event::Line(line),
            };
            match event {
                Event::Signal(Some(signal)) => self.on_signal(signal).await?,
                // Senders live in the match we hold; treat closure as the end.
                Event::Signal(None) => return Ok(()),
                Event::Line(Ok(Some(line))) => self.on_line(&line).await?,
                Event::Line(Ok(None)) => {
                    info!("connection {} ({}) closed by client in {}", self.conn, self.seat, self.phase);
                    return Ok(());
                }
                Event::Line(Err(e)) => {
                    warn!("connection {} ({}) read failed: {}", self.conn, self.seat, e);
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    async fn send(&mut self, response: Response) -> anyhow::Result<()> {
        let line = response.to_string();
        debug!("connection {} <- {}", self.conn, line);
        self.transport.send_line(&line).await
    }

    fn advance(&mut self, next: Phase) {
        debug!("connection {} ({}): {} -> {}", self.conn, self.seat, self.phase, next);
        self.phase = next;
    }

    async fn on_signal(&mut self, signal: Signal) -> anyhow::Result<()> {
        match signal {
            Signal::Start if self.phase == Phase::AwaitingStart => {
                let first = Seat::First;
                self.advance(if self.seat == first {
                    Phase::TurnActive
                } else {
                    Phase::TurnWaiting
                });
                self.send(Response::Start(first)).await?;
                self.send(Response::Turn(first)).await?;
            }
            Signal::Turn(seat) if seat == self.seat => {
                self.advance(Phase::TurnActive);
                self.send(Response::Turn(seat)).await?;
            }
            Signal::Over { winner } => {
                self.advance(Phase::Finished);
                self.send(Response::Lose(winner)).await?;
            }
            Signal::OpponentLeft => {
                self.advance(Phase::Finished);
                self.send(Response::OpponentLeft).await?;
            }
            other => {
                debug!("connection {} ignoring {:?} in {}", self.conn, other, self.phase);
            }
        }
        Ok(())
    }

    async fn on_line(&mut self, line: &str) -> anyhow::Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        debug!("connection {} -> {}", self.conn, line);

        // Apply any handoff the peer posted before this line was read, so the
        // local phase agrees with the match.
        while let Ok(signal) = self.signals.try_recv() {
            self.on_signal(signal).await?;
        }
        if self.phase == Phase::Finished {
            return Ok(());
        }

        let responses = match Command::parse(line).and_then(|cmd| self.handle(cmd)) {
            Ok(responses) => responses,
            Err(e) => {
                debug!("connection {} rejected: {}", self.conn, e);
                vec![Response::Error(e)]
            }
        };
        for response in responses {
            self.send(response).await?;
        }
        Ok(())
    }

    fn handle(&mut self, command: Command) -> Result<Vec<Response>, ProtocolError> {
        match (self.phase, command) {
            (Phase::AwaitingHello, Command::Hello { name }) => {
                self.game.join(self.seat, &name)?;
                self.advance(Phase::PlacingFleet);
                Ok(vec![Response::Welcome {
                    seat: self.seat,
                    name,
                }])
            }
            (Phase::AwaitingHello, _) => Err(ProtocolError::HelloRequired),

            (Phase::PlacingFleet, Command::Ship(placement)) => {
                let kind = self.game.place(self.seat, placement)?;
                Ok(vec![Response::ShipPlaced(kind)])
            }
            (Phase::PlacingFleet, Command::Ready) => {
                // The reply to READY is the START line, sent when the barrier
                // releases this seat.
                self.game.ready(self.seat)?;
                self.advance(Phase::AwaitingStart);
                Ok(Vec::new())
            }
            (Phase::AwaitingStart, Command::Ready) => Err(ProtocolError::AlreadyReady),

            (Phase::TurnWaiting, Command::Attack(_)) => Err(ProtocolError::NotYourTurn),
            (Phase::TurnActive, Command::Attack(target)) => {
                let report = self.game.attack(self.seat, target)?;
                let resolution = match (report.strike.hit, report.strike.sunk) {
                    (false, _) => Response::Miss(target),
                    (true, None) => Response::Hit(target),
                    (true, Some(kind)) => Response::Sunk(target, kind),
                };
                let mut responses = vec![resolution];
                match report.after {
                    AfterAttack::Continue => {}
                    AfterAttack::TurnPassed(next) => {
                        self.advance(Phase::TurnWaiting);
                        responses.push(Response::Turn(next));
                    }
                    AfterAttack::Won => {
                        self.advance(Phase::Finished);
                        responses.push(Response::Win(self.seat));
                    }
                }
                Ok(responses)
            }

            (phase, command) => Err(ProtocolError::Sequence {
                command: command.verb(),
                phase,
            }),
        }
    }
}
