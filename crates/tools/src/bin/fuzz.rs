use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use trek_core::journal_file::JournalWriter;
use trek_core::replay::replay_to_end;
use trek_core::{
    Direction, Game, HintResponse, InputJournal, MoveError, MoveOutcome, Rules, Trek,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to exercise
    #[arg(short, long, default_value_t = 64)]
    runs: u64,
    #[arg(short, long, default_value_t = 2_000)]
    moves: u32,
    /// Also write each run's journal as hash-chained JSONL (overwritten per run)
    #[arg(long)]
    journal_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let rules = Rules::default();

    println!("Fuzzing {} seeds starting at {}...", args.runs, args.seed);
    let mut skipped = 0;
    for run in 0..args.runs {
        let run_seed = args.seed.wrapping_add(run);
        let mut rng = ChaCha8Rng::seed_from_u64(run_seed);

        match Game::new(run_seed, &rules) {
            Ok(mut game) => {
                let journal = fuzz_grid_run(run_seed, &mut game, &mut rng, args.moves, &rules);
                if let (Some(journal), Some(path)) = (journal, args.journal_out.as_ref()) {
                    write_jsonl(path, &journal)?;
                }
            }
            Err(error) => {
                log::warn!("seed {run_seed}: generation failed: {error:?}");
                skipped += 1;
            }
        }

        fuzz_graph_trek(run_seed, &mut rng);
    }

    println!("Fuzzing completed; {skipped} of {} seeds skipped on generation.", args.runs);
    Ok(())
}

/// Drive one grid run with mostly hint-guided, occasionally random moves,
/// asserting engine invariants after every input, then check the recorded
/// journal replays to the live snapshot. Returns `None` when a mid-run
/// regeneration failure makes the run unjournalable.
fn fuzz_grid_run(
    run_seed: u64,
    game: &mut Game,
    rng: &mut ChaCha8Rng,
    max_moves: u32,
    rules: &Rules,
) -> Option<InputJournal> {
    let mut journal = InputJournal::new(run_seed);
    let mut seq = 0;

    for _ in 0..max_moves {
        let direction = if rng.next_u64() % 4 == 0 {
            Direction::ALL[rng.next_u64() as usize % Direction::ALL.len()]
        } else {
            match game.next_hint() {
                HintResponse::Step(target) => Direction::between(game.state().player_pos, target)?,
                HintResponse::NoMoreHints => break,
            }
        };

        let pos_before = game.state().player_pos;
        let money_before = game.state().money;
        let path_len_before = game.state().path.len();

        match game.apply_move(direction) {
            Ok(MoveOutcome::Finished(_)) => {
                journal.append_move(direction, seq);
                break;
            }
            Ok(MoveOutcome::LevelCleared { .. }) => {
                journal.append_move(direction, seq);
                seq += 1;
                assert_eq!(game.state().path.len(), 1, "a fresh level restarts the path");
            }
            Ok(_) => {
                journal.append_move(direction, seq);
                seq += 1;
                assert_eq!(game.state().path.len(), path_len_before + 1);
            }
            Err(MoveError::OutOfBounds { .. }) | Err(MoveError::WallBlocked { .. }) => {
                assert_eq!(game.state().player_pos, pos_before, "rejection moved the player");
                assert_eq!(game.state().money, money_before, "rejection charged money");
                assert_eq!(game.state().path.len(), path_len_before);
            }
            Err(MoveError::MazeRegeneration(_)) => return None,
            Err(MoveError::RunOver) => unreachable!("loop exits on Finished"),
        }
        assert!(
            !game.state().grid.is_wall(game.state().player_pos),
            "player ended up inside a wall"
        );
    }

    let replayed = replay_to_end(rules, &journal).expect("recorded journal must replay");
    assert_eq!(
        replayed.final_snapshot_hash,
        game.snapshot_hash(),
        "replay diverged from live play on seed {run_seed}"
    );
    Some(journal)
}

fn fuzz_graph_trek(run_seed: u64, rng: &mut ChaCha8Rng) {
    let mut trek = Trek::new(run_seed, 1);
    for _ in 0..64 {
        if trek.complete {
            break;
        }
        let roads = trek.map.nodes[trek.current].roads.clone();
        if roads.is_empty() {
            break;
        }
        let road = roads[rng.next_u64() as usize % roads.len()];
        let cost_before = trek.total_cost;
        let path_before = trek.path.len();
        match trek.move_car(road.to) {
            Ok(_) => assert_eq!(trek.path.len(), path_before + 1),
            Err(_) => {
                assert_eq!(trek.total_cost, cost_before, "rejected trek move charged");
                assert_eq!(trek.path.len(), path_before);
            }
        }
    }
}

fn write_jsonl(path: &std::path::Path, journal: &InputJournal) -> Result<()> {
    let mut writer = JournalWriter::create(path, journal.seed, &journal.build_id, 0)?;
    for record in &journal.inputs {
        writer.append(1, &record.payload)?;
    }
    log::info!("wrote {} records to {}", journal.inputs.len(), path.display());
    Ok(())
}
