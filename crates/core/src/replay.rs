use crate::game::Game;
use crate::journal::{InputJournal, InputPayload};
use crate::rules::Rules;
use crate::types::{GenerationError, MoveError, RunOutcome};

#[derive(Debug, PartialEq)]
pub enum ReplayError {
    Generation(GenerationError),
    /// A recorded input was rejected; journals only hold accepted moves, so
    /// this means the journal does not match the engine it is replayed on.
    RejectedMove { seq: u64, reason: MoveError },
    InputAfterRunEnded { seq: u64 },
}

#[derive(Debug, PartialEq)]
pub struct ReplayResult {
    /// None when the journal ends before the run does.
    pub outcome: Option<RunOutcome>,
    pub final_snapshot_hash: u64,
    pub final_level: u32,
    pub moves_applied: u64,
}

pub fn replay_to_end(rules: &Rules, journal: &InputJournal) -> Result<ReplayResult, ReplayError> {
    let mut game = Game::new(journal.seed, rules).map_err(ReplayError::Generation)?;

    let mut moves_applied = 0;
    for record in &journal.inputs {
        if game.state().outcome.is_some() {
            return Err(ReplayError::InputAfterRunEnded { seq: record.seq });
        }
        let InputPayload::Move { direction } = record.payload;
        game.apply_move(direction)
            .map_err(|reason| ReplayError::RejectedMove { seq: record.seq, reason })?;
        moves_applied += 1;
    }

    Ok(ReplayResult {
        outcome: game.state().outcome,
        final_snapshot_hash: game.snapshot_hash(),
        final_level: game.state().level,
        moves_applied,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, HintResponse, MoveOutcome};

    /// Live-play a hint-guided run while recording it, then check the replay
    /// lands on the identical snapshot.
    #[test]
    fn replay_reproduces_a_recorded_live_run() {
        let rules = Rules::default();
        for seed in 0..32_u64 {
            let Ok(mut game) = Game::new(seed, &rules) else {
                continue;
            };
            let mut journal = InputJournal::new(seed);
            let mut seq = 0;
            let mut regeneration_failed = false;
            for _ in 0..2_000 {
                let HintResponse::Step(target) = game.next_hint() else {
                    break;
                };
                let Some(direction) = Direction::between(game.state().player_pos, target) else {
                    break;
                };
                match game.apply_move(direction) {
                    Ok(MoveOutcome::Finished(_)) => {
                        journal.append_move(direction, seq);
                        break;
                    }
                    Ok(_) => {
                        journal.append_move(direction, seq);
                        seq += 1;
                    }
                    // A failed level regeneration mutates live state in a way
                    // a journal cannot represent; such a seed cannot anchor
                    // an equivalence check.
                    Err(MoveError::MazeRegeneration(_)) => {
                        regeneration_failed = true;
                        break;
                    }
                    Err(_) => break,
                }
            }
            if regeneration_failed {
                continue;
            }

            let result = replay_to_end(&rules, &journal).expect("replay");
            assert_eq!(result.final_snapshot_hash, game.snapshot_hash());
            assert_eq!(result.outcome, game.state().outcome);
            assert_eq!(result.final_level, game.state().level);
            return;
        }
        panic!("no seed in range produced a playable run");
    }

    #[test]
    fn rejected_recorded_moves_are_reported_with_their_sequence() {
        let rules = Rules::default();
        for seed in 0..32_u64 {
            if Game::new(seed, &rules).is_err() {
                continue;
            }
            // The first move of every maze starts at the top-left corner, so
            // an Up move is out of bounds by construction.
            let mut journal = InputJournal::new(seed);
            journal.append_move(Direction::Up, 0);
            let error = replay_to_end(&rules, &journal).expect_err("replay must reject");
            assert!(matches!(error, ReplayError::RejectedMove { seq: 0, .. }));
            return;
        }
        panic!("no seed in range produced a playable run");
    }
}
