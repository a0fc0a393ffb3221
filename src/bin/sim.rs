use broadside::{
    GameClient, GameServer, InMemoryTransport, Phase, ServerConfig, Side, TOTAL_CELLS,
};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde_json::json;
use tokio::time::Duration;

/// Play one full match over an in-memory link: a shuffled-order player
/// seeded with `seed1` against the server's bot seeded with `seed2`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() != 3 {
        eprintln!("Usage: {} <seed1> <seed2>", args[0]);
        std::process::exit(1);
    }
    let seed1: u64 = args[1].parse()?;
    let seed2: u64 = args[2].parse()?;

    let (client_side, server_side) = InMemoryTransport::pair();
    let config = ServerConfig {
        reveal_delay: Duration::ZERO,
        seed: Some(seed2),
    };
    let server = tokio::spawn(async move {
        let mut server = GameServer::new(server_side, config);
        server.run().await
    });

    let mut rng = SmallRng::seed_from_u64(seed1);
    let mut client = GameClient::new(client_side);
    let layout = client.randomize().await?;
    client.set_board(layout.board).await?;
    client.set_fleet(layout.fleet).await?;
    client.start().await?;

    let mut order: Vec<usize> = (0..TOTAL_CELLS).collect();
    order.shuffle(&mut rng);

    let mut player_shots = 0usize;
    let mut bot_shots = 0usize;
    let mut winner = None;
    for id in order {
        let res = client.shoot(id).await?;
        player_shots += 1;
        if res.bot_shot.is_some() {
            bot_shots += 1;
        }
        if res.match_state.phase == Phase::Finished {
            winner = res.match_state.winner;
            break;
        }
    }
    drop(client);
    server.await??;

    let winner = match winner {
        Some(Side::Player) => Some("player"),
        Some(Side::Bot) => Some("bot"),
        None => None,
    };
    let result = json!({
        "winner": winner,
        "playerShots": player_shots,
        "botShots": bot_shots,
    });
    println!("{}", serde_json::to_string(&result)?);
    Ok(())
}
