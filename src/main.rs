#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use broadside::{
    init_logging, player_cli::PlayerCli, serve, GameClient, GameServer, InMemoryTransport,
    ServerConfig, TcpTransport, Transport,
};

#[cfg(feature = "std")]
use clap::Parser;
#[cfg(feature = "std")]
use tokio::net::TcpListener;
#[cfg(feature = "std")]
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Parser)]
#[cfg(feature = "std")]
enum Commands {
    /// Host matches over TCP, one per connecting player.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        bind: String,
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 500, help = "Pause before the bot's reply shot")]
        reveal_delay_ms: u64,
    },
    /// Connect to a server and play interactively.
    Play {
        #[arg(long, default_value = "127.0.0.1:8080")]
        connect: String,
    },
    /// Play against the bot in this process.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible games (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(long, default_value_t = 500, help = "Pause before the bot's reply shot")]
        reveal_delay_ms: u64,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            bind,
            seed,
            reveal_delay_ms,
        } => {
            let config = ServerConfig {
                reveal_delay: Duration::from_millis(reveal_delay_ms),
                seed,
            };
            let listener = TcpListener::bind(&bind).await?;
            log::info!("listening on {}", listener.local_addr()?);
            serve(listener, config).await?;
        }
        Commands::Play { connect } => {
            println!("Connecting to {}...", connect);
            let transport: Box<dyn Transport> = Box::new(TcpTransport::connect(&connect).await?);
            play(transport).await?;
        }
        Commands::Local {
            seed,
            reveal_delay_ms,
        } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (game will be reproducible)", s);
            }
            let config = ServerConfig {
                reveal_delay: Duration::from_millis(reveal_delay_ms),
                seed,
            };
            let (ours, theirs) = InMemoryTransport::pair();
            let server = tokio::spawn(async move {
                let mut server = GameServer::new(theirs, config);
                server.run().await
            });
            let transport: Box<dyn Transport> = Box::new(ours);
            play(transport).await?;
            server.await??;
        }
    }
    Ok(())
}

#[cfg(feature = "std")]
async fn play(transport: Box<dyn Transport>) -> anyhow::Result<()> {
    let stdin = std::io::stdin();
    let mut cli = PlayerCli::new(GameClient::new(transport), std::io::stdout());
    cli.run(stdin.lock()).await?;
    Ok(())
}
