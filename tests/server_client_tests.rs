use broadside::client::remote_kind;
use broadside::{
    serve, Board, CellStatus, ErrorKind, GameClient, GameEngine, GameServer, InMemoryTransport,
    Message, Phase, ServerConfig, Side, TcpTransport, Transport, PROTOCOL_VERSION,
};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tokio::net::TcpListener;
use tokio::time::{Duration, Instant};

fn quick(seed: u64) -> ServerConfig {
    ServerConfig {
        reveal_delay: Duration::ZERO,
        seed: Some(seed),
    }
}

fn spawn_server(config: ServerConfig) -> GameClient<InMemoryTransport> {
    let (client_side, server_side) = InMemoryTransport::pair();
    tokio::spawn(async move {
        let mut server = GameServer::new(server_side, config);
        server.run().await.unwrap();
    });
    GameClient::new(client_side)
}

#[tokio::test(flavor = "multi_thread")]
async fn setup_then_play_a_shot() -> anyhow::Result<()> {
    let mut client = spawn_server(quick(1));

    let fleet = client.get_fleet().await?;
    assert_eq!(fleet.len(), 5);
    assert!(fleet.iter().all(|s| !s.placed));

    let err = client.start().await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::IncompletePlacement));

    let layout = client.randomize().await?;
    // randomize does not touch the match
    assert_eq!(client.get_board().await?.ship_cells(), 0);
    client.set_board(layout.board.clone()).await?;
    client.set_fleet(layout.fleet.clone()).await?;
    assert_eq!(client.get_board().await?, layout.board);

    let state = client.start().await?;
    assert_eq!((state.phase, state.turn), (Phase::Playing, Side::Player));

    let res = client.shoot(0).await?;
    assert_eq!(res.player_shot.id, 0);
    assert!(res.player_shot.status.is_resolved());
    let bot = res.bot_shot.expect("bot replies to a non-winning shot");
    assert!(bot.status.is_resolved());
    assert_eq!(res.match_state.turn, Side::Player);

    let err = client.shoot(0).await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::AlreadyResolved));

    // the opponent view only shows what has been shot
    let view = client.get_opponent_board().await?;
    assert!(view.cell(0).unwrap().status.is_resolved());
    assert!(view
        .cells()
        .iter()
        .filter(|c| c.id != 0)
        .all(|c| c.status == CellStatus::Empty && !c.has_ship));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_payloads_are_rejected() -> anyhow::Result<()> {
    let mut client = spawn_server(quick(2));

    let err = client.set_board(Board::empty()).await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::Validation));

    let mut fleet = client.get_fleet().await?;
    fleet.ships_mut()[0].size = 9;
    let err = client.set_fleet(fleet).await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::Validation));

    let err = client
        .request(Message::Shoot { cell_id: 100 })
        .await
        .unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::Validation));

    let err = client.request(Message::Ack).await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::Protocol));

    // the session survives all of the above
    assert_eq!(client.get_fleet().await?.len(), 5);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn overlapping_layout_fails_at_start() -> anyhow::Result<()> {
    let mut client = spawn_server(quick(3));
    let layout = client.randomize().await?;
    let mut fleet = layout.fleet.clone();
    let stolen = fleet.ships()[1].coordinates.clone();
    fleet.ships_mut()[0].coordinates[..stolen.len()].copy_from_slice(&stolen);
    client.set_board(layout.board).await?;
    client.set_fleet(fleet).await?;

    let err = client.start().await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::InvalidLayout));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn stuck_bot_still_reports_the_player_shot() -> anyhow::Result<()> {
    let mut rng = SmallRng::seed_from_u64(8);
    let mut engine = GameEngine::new();
    let layout = engine.randomize(&mut rng)?;
    engine.adopt_player_board(layout.board.clone());
    engine.adopt_player_fleet(layout.fleet);
    engine.start(&mut rng)?;
    // leave the bot nothing to aim at
    let spent: Vec<_> = layout
        .board
        .into_cells()
        .into_iter()
        .map(|mut c| {
            c.status = if c.has_ship { CellStatus::Hit } else { CellStatus::Miss };
            c
        })
        .collect();
    engine.adopt_player_board(Board::from_cells(spent));

    let (_peer, server_side) = InMemoryTransport::pair();
    let mut server = GameServer::with_engine(engine, server_side, quick(8));
    let reply = server.handle(Message::Shoot { cell_id: 0 }).await;
    let res = match reply {
        Message::ShotResult(res) => res,
        other => panic!("expected a shot result, got {:?}", other),
    };
    assert_eq!(res.player_shot.id, 0);
    assert!(res.player_shot.status.is_resolved());
    assert!(res.bot_shot.is_none());
    assert_eq!(res.match_state, server.engine().state());
    assert_eq!(res.match_state.phase, Phase::Playing);
    assert!(server.engine().bot_board().cell(0).unwrap().status.is_resolved());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn shooting_before_start_is_out_of_turn() -> anyhow::Result<()> {
    let mut client = spawn_server(quick(4));
    let err = client.shoot(5).await.unwrap_err();
    assert_eq!(remote_kind(&err), Some(ErrorKind::InvalidTurn));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn reveal_delay_holds_the_reply() -> anyhow::Result<()> {
    let mut client = spawn_server(ServerConfig {
        reveal_delay: Duration::from_millis(150),
        seed: Some(5),
    });
    let layout = client.randomize().await?;
    client.set_board(layout.board).await?;
    client.set_fleet(layout.fleet).await?;
    client.start().await?;

    let began = Instant::now();
    let res = client.shoot(55).await?;
    assert!(res.bot_shot.is_some());
    assert!(began.elapsed() >= Duration::from_millis(150));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn handshake_version_mismatch_closes_the_session() -> anyhow::Result<()> {
    let (mut peer, server_side) = InMemoryTransport::pair();
    let server = tokio::spawn(async move {
        let mut server = GameServer::new(server_side, quick(6));
        server.run().await
    });
    peer.send(Message::Handshake {
        version: PROTOCOL_VERSION + 1,
    })
    .await?;
    assert!(server.await?.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn full_match_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(serve(listener, quick(7)));

    let mut client = GameClient::new(TcpTransport::connect(addr).await?);
    let layout = client.randomize().await?;
    client.set_board(layout.board).await?;
    client.set_fleet(layout.fleet).await?;
    client.start().await?;

    let mut winner = None;
    for id in 0..100 {
        let res = client.shoot(id).await?;
        if res.match_state.phase == Phase::Finished {
            winner = res.match_state.winner;
            break;
        }
    }
    assert!(winner.is_some());

    let err = client.shoot(99).await.unwrap_err();
    assert!(matches!(
        remote_kind(&err),
        Some(ErrorKind::InvalidTurn) | Some(ErrorKind::AlreadyResolved)
    ));

    let fresh = client.reset().await?;
    assert!(fresh.fleet.iter().all(|s| !s.placed));
    Ok(())
}
