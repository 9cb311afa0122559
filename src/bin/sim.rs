use battleship_server::{BotClient, BotOutcome, Server, ServerConfig, TcpTransport};
use rand::{rngs::SmallRng, SeedableRng};
use serde_json::json;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let server = Server::bind(ServerConfig {
        bind: "127.0.0.1:0".to_string(),
        ..ServerConfig::default()
    })
    .await?;
    let addr = server.local_addr()?;
    tokio::spawn(server.run());

    // Connect in order so the first bot gets the first seat.
    let t1 = TcpTransport::connect(addr).await?;
    let t2 = TcpTransport::connect(addr).await?;
    let bot1 = BotClient::new(t1, "player1", SmallRng::seed_from_u64(seed1));
    let bot2 = BotClient::new(t2, "player2", SmallRng::seed_from_u64(seed2));

    let (res1, res2) = tokio::try_join!(bot1.play(), bot2.play())?;

    let winner = match (res1.outcome, res2.outcome) {
        (BotOutcome::Won, BotOutcome::Lost) => Some("player1"),
        (BotOutcome::Lost, BotOutcome::Won) => Some("player2"),
        _ => None,
    };

    let result = json!({
        "player1": res1,
        "player2": res2,
        "winner": winner,
    });

    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
