use battleship_server::{init_logging, BotClient, BotOutcome, Server, ServerConfig, TcpTransport};
use clap::{Parser, Subcommand};
use rand::rngs::SmallRng;
use rand::SeedableRng;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pair incoming connections into matches and referee them.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8000")]
        bind: String,
        #[arg(long, default_value_t = battleship_server::MAX_LINE_LEN, help = "Longest accepted command line in bytes")]
        max_line_len: usize,
    },
    /// Connect to a server and play one match with a random fleet.
    Bot {
        #[arg(long, default_value = "127.0.0.1:8000")]
        connect: String,
        #[arg(long, default_value = "Bot")]
        name: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, max_line_len } => {
            let server = Server::bind(ServerConfig { bind, max_line_len }).await?;
            server.run().await?;
        }
        Commands::Bot {
            connect,
            name,
            seed,
        } => {
            let rng = match seed {
                Some(s) => SmallRng::seed_from_u64(s),
                None => {
                    let mut seed_rng = rand::rng();
                    SmallRng::from_rng(&mut seed_rng)
                }
            };
            let transport = TcpTransport::connect(connect.as_str()).await?;
            println!("Connected to {}", connect);
            let report = BotClient::new(transport, name, rng).play().await?;
            match report.outcome {
                BotOutcome::Won => println!("{} won after {} attacks", report.seat, report.attacks),
                BotOutcome::Lost => println!("{} lost after {} attacks", report.seat, report.attacks),
                BotOutcome::OpponentLeft => println!("{}: opponent left the match", report.seat),
            }
        }
    }
    Ok(())
}
