use broadside::{
    Board, CellStatus, GameEngine, LayoutError, MatchError, Orientation, Phase, ShotOutcome,
    Side, NUM_SHIPS, SHIPS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

/// One ship per row pair, all against the left edge.
fn place_standard(engine: &mut GameEngine) {
    for (i, def) in SHIPS.iter().enumerate() {
        engine
            .place_ship(def.name(), i * 20, Orientation::Horizontal)
            .unwrap();
    }
}

fn started_engine(seed: u64) -> (GameEngine, SmallRng) {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut engine = GameEngine::new();
    place_standard(&mut engine);
    engine.start(&mut rng).unwrap();
    (engine, rng)
}

#[test]
fn setup_scenario() {
    let mut rng = SmallRng::seed_from_u64(7);
    let mut engine = GameEngine::new();
    let fresh = engine.reset();
    assert_eq!(fresh.fleet.len(), NUM_SHIPS);
    assert!(fresh.fleet.iter().all(|s| !s.placed));

    assert_eq!(engine.start(&mut rng), Err(MatchError::IncompletePlacement));
    assert_eq!(engine.state().phase, Phase::Setup);

    place_standard(&mut engine);
    let state = engine.start(&mut rng).unwrap();
    assert_eq!(state.phase, Phase::Playing);
    assert_eq!(state.turn, Side::Player);
    assert_eq!(engine.bot_fleet().len(), NUM_SHIPS);
    assert!(engine.bot_fleet().all_placed());
    assert_eq!(engine.bot_board().ship_cells(), 17);

    // setup edits are closed once play begins
    assert_eq!(engine.rotate_ship("Carrier"), Err(MatchError::InvalidTurn));
    assert_eq!(engine.start(&mut rng), Err(MatchError::InvalidTurn));
}

#[test]
fn shots_rejected_outside_play() {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut engine = GameEngine::new();
    assert_eq!(engine.player_shoot(0), Err(MatchError::InvalidTurn));
    assert_eq!(engine.bot_shoot(&mut rng), Err(MatchError::InvalidTurn));
}

#[test]
fn bot_cannot_move_out_of_turn() {
    let (mut engine, mut rng) = started_engine(3);
    assert_eq!(engine.bot_shoot(&mut rng), Err(MatchError::InvalidTurn));
    assert_eq!(engine.state().turn, Side::Player);
    assert_eq!(engine.player_shoot(100), Err(MatchError::InvalidCell(100)));
}

#[test]
fn last_segment_sinks_the_ship() {
    let (mut engine, mut rng) = started_engine(11);
    let destroyer = engine
        .bot_fleet()
        .iter()
        .find(|s| s.name == "Destroyer")
        .unwrap()
        .clone();

    let first = engine.player_shoot(destroyer.coordinates[0]).unwrap();
    assert_eq!(first.outcome, ShotOutcome::Hit);
    assert!(first.sunk_ship.is_none());
    engine.bot_shoot(&mut rng).unwrap();

    let second = engine.player_shoot(destroyer.coordinates[1]).unwrap();
    assert_eq!(second.outcome, ShotOutcome::Sunk);
    assert_eq!(second.cell.status, broadside::CellStatus::Hit);
    let sunk = second.sunk_ship.unwrap();
    assert_eq!((sunk.name.as_str(), sunk.size), ("Destroyer", 2));
    assert!(sunk.sunk);
    assert!(!second.game_finished);
}

#[test]
fn repeat_shot_is_rejected_without_side_effects() {
    let (mut engine, mut rng) = started_engine(5);
    let target = engine.bot_fleet().ships()[0].coordinates[0];
    engine.player_shoot(target).unwrap();
    engine.bot_shoot(&mut rng).unwrap();

    let fleet_before = engine.bot_fleet().clone();
    let board_before = engine.bot_board().clone();
    assert_eq!(engine.player_shoot(target), Err(MatchError::AlreadyResolved));
    assert_eq!(engine.bot_fleet(), &fleet_before);
    assert_eq!(engine.bot_board(), &board_before);
    assert_eq!(engine.state().turn, Side::Player);
}

#[test]
fn player_wins_by_sinking_everything() {
    let (mut engine, mut rng) = started_engine(21);
    let targets: Vec<usize> = engine
        .bot_fleet()
        .iter()
        .flat_map(|s| s.coordinates.clone())
        .collect();
    let last = targets.len() - 1;
    for (i, id) in targets.into_iter().enumerate() {
        let report = engine.player_shoot(id).unwrap();
        if i == last {
            assert!(report.game_finished);
            assert_eq!(report.state.phase, Phase::Finished);
            assert_eq!(report.state.winner, Some(Side::Player));
        } else {
            assert!(!report.game_finished);
            // the bot gets one shot fewer than it would need to win
            let bot = engine.bot_shoot(&mut rng).unwrap();
            assert!(!bot.game_finished);
        }
    }
    assert!(engine.bot_fleet().all_sunk());
    assert_eq!(engine.player_shoot(0), Err(MatchError::InvalidTurn));
}

#[test]
fn reset_returns_to_setup() {
    let (mut engine, mut rng) = started_engine(9);
    engine.player_shoot(0).unwrap();
    engine.bot_shoot(&mut rng).unwrap();
    let fresh = engine.reset();
    assert_eq!(engine.state().phase, Phase::Setup);
    assert_eq!(engine.state().winner, None);
    assert_eq!(fresh.board.ship_cells(), 0);
    assert!(engine.bot_memory().tried().is_empty());
    assert!(engine.bot_fleet().is_empty());
}

#[test]
fn adopted_layouts_are_checked_at_start() {
    let mut rng = SmallRng::seed_from_u64(4);
    let mut engine = GameEngine::new();
    let layout = engine.randomize(&mut rng).unwrap();
    // randomize leaves the match alone
    assert_eq!(engine.player_board().ship_cells(), 0);

    let mut fleet = layout.fleet.clone();
    // slide the carrier onto its neighbour
    let other = fleet.ships()[1].coordinates[0];
    fleet.ships_mut()[0].coordinates[0] = other;
    engine.adopt_player_board(layout.board.clone());
    engine.adopt_player_fleet(fleet);
    assert!(matches!(
        engine.start(&mut rng),
        Err(MatchError::InvalidLayout(_))
    ));
    assert_eq!(engine.state().phase, Phase::Setup);

    engine.adopt_player_fleet(layout.fleet);
    assert!(engine.start(&mut rng).is_ok());
}

#[test]
fn shot_marks_on_an_adopted_board_block_the_start() {
    let mut rng = SmallRng::seed_from_u64(12);
    let mut engine = GameEngine::new();
    let layout = engine.randomize(&mut rng).unwrap();
    let resolved: Vec<_> = layout
        .board
        .clone()
        .into_cells()
        .into_iter()
        .map(|mut c| {
            c.status = if c.has_ship { CellStatus::Hit } else { CellStatus::Miss };
            c
        })
        .collect();
    engine.adopt_player_board(Board::from_cells(resolved));
    engine.adopt_player_fleet(layout.fleet.clone());
    assert_eq!(
        engine.start(&mut rng),
        Err(MatchError::InvalidLayout(LayoutError::AlreadyShot(0)))
    );
    assert_eq!(engine.state().phase, Phase::Setup);
    assert!(engine.bot_fleet().is_empty());

    // a single miss is enough to refuse
    let mut cells = layout.board.clone().into_cells();
    let water = cells.iter().position(|c| !c.has_ship).unwrap();
    cells[water].status = CellStatus::Miss;
    engine.adopt_player_board(Board::from_cells(cells));
    assert_eq!(
        engine.start(&mut rng),
        Err(MatchError::InvalidLayout(LayoutError::AlreadyShot(water)))
    );

    engine.adopt_player_board(layout.board);
    assert!(engine.start(&mut rng).is_ok());
}

#[test]
fn damaged_fleet_blocks_the_start() {
    let mut rng = SmallRng::seed_from_u64(13);
    let mut engine = GameEngine::new();
    let layout = engine.randomize(&mut rng).unwrap();
    engine.adopt_player_board(layout.board.clone());

    let mut sunk = layout.fleet.clone();
    for ship in sunk.ships_mut() {
        ship.hit_count = ship.size;
        ship.sunk = true;
    }
    engine.adopt_player_fleet(sunk);
    assert_eq!(
        engine.start(&mut rng),
        Err(MatchError::InvalidLayout(LayoutError::Damaged("Carrier".into())))
    );
    assert_eq!(engine.state().phase, Phase::Setup);

    let mut scratched = layout.fleet.clone();
    scratched.ships_mut()[4].hit_count = 1;
    let name = scratched.ships()[4].name.clone();
    engine.adopt_player_fleet(scratched);
    assert_eq!(
        engine.start(&mut rng),
        Err(MatchError::InvalidLayout(LayoutError::Damaged(name)))
    );

    engine.adopt_player_fleet(layout.fleet);
    let state = engine.start(&mut rng).unwrap();
    assert_eq!((state.phase, state.turn), (Phase::Playing, Side::Player));
}

#[test]
fn off_board_coordinates_in_an_adopted_fleet_do_not_panic() {
    let mut rng = SmallRng::seed_from_u64(14);
    let mut engine = GameEngine::new();
    let mut fleet = engine.reset().fleet;
    fleet.ships_mut()[0].place(vec![150, 151, 152, 153, 154], Orientation::Horizontal);
    engine.adopt_player_fleet(fleet);

    // other ships still place normally around the bogus one
    for (i, def) in SHIPS.iter().enumerate().skip(1) {
        engine
            .place_ship(def.name(), i * 20, Orientation::Horizontal)
            .unwrap();
    }
    assert!(matches!(
        engine.start(&mut rng),
        Err(MatchError::InvalidLayout(_))
    ));

    // re-placing the bogus ship repairs the layout
    engine.place_ship("Carrier", 0, Orientation::Horizontal).unwrap();
    assert!(engine.start(&mut rng).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn turns_alternate_until_someone_wins(seed in any::<u64>()) {
        let (mut engine, mut rng) = started_engine(seed);
        let mut order: Vec<usize> = (0..100).collect();
        for i in (1..order.len()).rev() {
            let j = rng.random_range(0..=i);
            order.swap(i, j);
        }
        for id in order {
            prop_assert_eq!(engine.state().turn, Side::Player);
            let report = engine.player_shoot(id).unwrap();
            if report.game_finished {
                break;
            }
            prop_assert_eq!(report.state.turn, Side::Bot);
            // out-of-turn attempts leave the turn where it is
            prop_assert_eq!(engine.player_shoot(id), Err(MatchError::InvalidTurn));
            prop_assert_eq!(engine.state().turn, Side::Bot);

            let report = engine.bot_shoot(&mut rng).unwrap();
            if report.game_finished {
                break;
            }
            prop_assert_eq!(report.state.turn, Side::Player);
        }

        let state = engine.state();
        prop_assert_eq!(state.phase, Phase::Finished);
        match state.winner {
            Some(Side::Player) => {
                prop_assert!(engine.bot_fleet().iter().all(|s| s.hit_count == s.size));
                prop_assert!(!engine.player_fleet().all_sunk());
            }
            Some(Side::Bot) => {
                prop_assert!(engine.player_fleet().iter().all(|s| s.hit_count == s.size));
                prop_assert!(!engine.bot_fleet().all_sunk());
            }
            None => prop_assert!(false, "finished without a winner"),
        }
    }
}
