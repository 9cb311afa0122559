//! Headless client that plays a whole match with a random fleet and random
//! targets. Used by the `bot` command, the simulator and the tests.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use serde::Serialize;

use crate::config::{FLEET_UNITS, TURN_MAX_ATTACKS};
use crate::fleet::Fleet;
use crate::player::Seat;
use crate::ship::Coordinate;
use crate::transport::Transport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BotOutcome {
    Won,
    Lost,
    OpponentLeft,
}

#[derive(Debug, Clone, Serialize)]
pub struct BotReport {
    pub seat: Seat,
    pub outcome: BotOutcome,
    pub attacks: usize,
    pub hits: usize,
}

pub struct BotClient<T: Transport> {
    transport: T,
    name: String,
    rng: SmallRng,
}

impl<T: Transport> BotClient<T> {
    pub fn new(transport: T, name: impl Into<String>, rng: SmallRng) -> Self {
        Self {
            transport,
            name: name.into(),
            rng,
        }
    }

    async fn expect_line(&mut self) -> anyhow::Result<String> {
        self.transport
            .recv_line()
            .await?
            .ok_or_else(|| anyhow::anyhow!("server closed the connection"))
    }

    pub async fn play(mut self) -> anyhow::Result<BotReport> {
        self.transport
            .send_line(&format!("HELLO {}", self.name))
            .await?;
        let welcome = self.expect_line().await?;
        let seat = match welcome.split_whitespace().nth(1) {
            Some("P1") if welcome.starts_with("WELCOME ") => Seat::First,
            Some("P2") if welcome.starts_with("WELCOME ") => Seat::Second,
            _ => return Err(anyhow::anyhow!("expected WELCOME, got {:?}", welcome)),
        };

        let layout = Fleet::random_layout(&mut self.rng)
            .ok_or_else(|| anyhow::anyhow!("could not generate a fleet layout"))?;
        for p in layout {
            let line = format!(
                "SHIP {} {} {} {}",
                p.kind,
                p.anchor.x,
                p.anchor.y,
                p.orientation.token()
            );
            self.transport.send_line(&line).await?;
            let reply = self.expect_line().await?;
            if reply != format!("OK SHIP {}", p.kind) {
                return Err(anyhow::anyhow!("placement {:?} refused: {}", line, reply));
            }
        }
        self.transport.send_line("READY").await?;

        let mut targets: Vec<Coordinate> = Coordinate::all().collect();
        targets.shuffle(&mut self.rng);
        let own_turn = format!("TURN {}", seat);
        let mut left_this_turn = 0u8;
        let mut attacks = 0usize;
        let mut hits = 0usize;

        loop {
            // Stop firing once the last unit is down; the WIN line follows.
            if left_this_turn > 0 && hits < FLEET_UNITS {
                let target = targets
                    .pop()
                    .ok_or_else(|| anyhow::anyhow!("ran out of targets"))?;
                self.transport
                    .send_line(&format!("ATTACK {} {}", target.x, target.y))
                    .await?;
                left_this_turn -= 1;
                attacks += 1;
            }

            let line = self.expect_line().await?;
            let verb = line.split_whitespace().next().unwrap_or("");
            match verb {
                "START" | "MISS" => {}
                "HIT" | "SUNK" => hits += 1,
                "TURN" => {
                    left_this_turn = if line == own_turn { TURN_MAX_ATTACKS } else { 0 };
                }
                "WIN" | "LOSE" => {
                    let outcome = if line == format!("WIN {}", seat) {
                        BotOutcome::Won
                    } else {
                        BotOutcome::Lost
                    };
                    return Ok(BotReport {
                        seat,
                        outcome,
                        attacks,
                        hits,
                    });
                }
                "OPPONENT_LEFT" => {
                    return Ok(BotReport {
                        seat,
                        outcome: BotOutcome::OpponentLeft,
                        attacks,
                        hits,
                    })
                }
                _ => return Err(anyhow::anyhow!("unexpected server line: {:?}", line)),
            }
        }
    }
}
