use crate::mazegen::MazeGenerator;
use crate::rules::Rules;
use crate::search::{PlannedRoute, plan_cheapest_route};
use crate::state::{GameState, Grid};
use crate::types::{
    Direction, GenerationError, HintResponse, LogEvent, MoveError, MoveOutcome, Pos, RunOutcome,
};

pub struct Game {
    run_seed: u64,
    rules: Rules,
    state: GameState,
    /// Reference route used for hints; replanned when the player strays.
    plan: Option<PlannedRoute>,
    /// Index into the plan of the next step the player has not taken yet.
    hint_cursor: usize,
    log: Vec<LogEvent>,
    next_input_seq: u64,
}

impl Game {
    pub fn new(run_seed: u64, rules: &Rules) -> Result<Self, GenerationError> {
        let maze = MazeGenerator::new(run_seed, rules).generate(1)?;
        let grid = Grid::from_generated(&maze);
        let start = grid.start;
        let mut game = Self {
            run_seed,
            rules: rules.clone(),
            state: GameState {
                grid,
                player_pos: start,
                money: rules.starting_money,
                spent: 0,
                tolls_crossed: 0,
                level: 1,
                path: vec![start],
                outcome: None,
            },
            plan: None,
            hint_cursor: 0,
            log: vec![LogEvent::MazeAccepted { level: 1, attempt: maze.attempt }],
            next_input_seq: 0,
        };
        game.replan_from(start);
        Ok(game)
    }

    /// Apply one directional move. Out-of-bounds and wall moves are rejected
    /// with state untouched; everything else runs to completion, including
    /// toll collection, level advancement, and terminal outcomes.
    pub fn apply_move(&mut self, direction: Direction) -> Result<MoveOutcome, MoveError> {
        if self.state.outcome.is_some() {
            return Err(MoveError::RunOver);
        }

        let next = direction.apply(self.state.player_pos);
        if !self.state.grid.in_bounds(next) {
            let reason = MoveError::OutOfBounds { attempted: next };
            self.log.push(LogEvent::MoveRejected { attempted: next, reason });
            return Err(reason);
        }
        if self.state.grid.is_wall(next) {
            let reason = MoveError::WallBlocked { pos: next };
            self.log.push(LogEvent::MoveRejected { attempted: next, reason });
            return Err(reason);
        }

        self.state.player_pos = next;
        self.state.path.push(next);
        self.next_input_seq += 1;

        let mut paid = None;
        if let Some(booth) = self.state.grid.booth_at(next).copied() {
            if self.state.money < booth.cost {
                // The move itself stands; only payment fails. Money stays
                // untouched and the booth keeps standing.
                let outcome =
                    RunOutcome::Bankrupt { required: booth.cost, available: self.state.money };
                self.state.outcome = Some(outcome);
                self.log.push(LogEvent::RunEnded { outcome });
                return Ok(MoveOutcome::Finished(outcome));
            }
            self.state.money -= booth.cost;
            self.state.spent += booth.cost;
            self.state.tolls_crossed += 1;
            self.state.grid.take_booth(next);
            self.log.push(LogEvent::TollPaid {
                pos: next,
                cost: booth.cost,
                weather: booth.weather,
            });
            paid = Some(booth);
        }

        if next == self.state.grid.goal {
            return self.clear_level();
        }

        self.follow_or_replan(next);

        match paid {
            Some(booth) => Ok(MoveOutcome::TollPaid { cost: booth.cost, weather: booth.weather }),
            None => Ok(MoveOutcome::Moved),
        }
    }

    /// Next step of the reference route, or `NoMoreHints` once the player
    /// stands on the destination or the run has ended.
    pub fn next_hint(&mut self) -> HintResponse {
        if self.state.outcome.is_some() || self.state.player_pos == self.state.grid.goal {
            return HintResponse::NoMoreHints;
        }
        if self.plan.as_ref().is_none_or(|plan| self.hint_cursor >= plan.steps.len()) {
            self.replan_from(self.state.player_pos);
        }
        match self.plan.as_ref().and_then(|plan| plan.steps.get(self.hint_cursor)) {
            Some(&target) => {
                self.log.push(LogEvent::HintServed { target });
                HintResponse::Step(target)
            }
            None => HintResponse::NoMoreHints,
        }
    }

    /// Remaining reference route from the current position, with a flag for
    /// whether it still honors the toll-count floor.
    pub fn planned_route(&self) -> Option<(&[Pos], bool)> {
        self.plan.as_ref().map(|plan| (&plan.steps[self.hint_cursor..], plan.constrained))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn snapshot_hash(&self) -> u64 {
        use std::hash::Hasher;
        use xxhash_rust::xxh3::Xxh3;

        let mut hasher = Xxh3::new();
        hasher.write_u64(self.run_seed);
        hasher.write_u64(self.next_input_seq);
        hasher.write_u32(self.state.level);
        hasher.write_u32(self.state.money);
        hasher.write_u32(self.state.spent);
        hasher.write_u32(self.state.tolls_crossed);
        hasher.write_i32(self.state.player_pos.y);
        hasher.write_i32(self.state.player_pos.x);
        for pos in &self.state.path {
            hasher.write_i32(pos.y);
            hasher.write_i32(pos.x);
        }
        match self.state.outcome {
            Some(RunOutcome::Victory { .. }) => hasher.write_u8(1),
            Some(RunOutcome::Bankrupt { .. }) => hasher.write_u8(2),
            None => hasher.write_u8(0),
        }
        hasher.finish()
    }

    fn clear_level(&mut self) -> Result<MoveOutcome, MoveError> {
        let level = self.state.level;
        let bonus = self.rules.level_bonus * level;
        self.state.money += bonus;
        self.log.push(LogEvent::LevelCleared { level, bonus });

        if level >= self.rules.max_level {
            let outcome = RunOutcome::Victory {
                money: self.state.money,
                total_spent: self.state.spent,
                levels_cleared: level,
            };
            self.state.outcome = Some(outcome);
            self.log.push(LogEvent::RunEnded { outcome });
            return Ok(MoveOutcome::Finished(outcome));
        }

        let next_level = level + 1;
        let maze = MazeGenerator::new(self.run_seed, &self.rules)
            .generate(next_level)
            .map_err(MoveError::MazeRegeneration)?;
        self.log.push(LogEvent::MazeAccepted { level: next_level, attempt: maze.attempt });
        self.state.grid = Grid::from_generated(&maze);
        self.state.level = next_level;
        self.state.player_pos = self.state.grid.start;
        self.state.path = vec![self.state.grid.start];
        self.state.tolls_crossed = 0;
        self.replan_from(self.state.grid.start);
        Ok(MoveOutcome::LevelCleared { bonus, next_level })
    }

    fn follow_or_replan(&mut self, next: Pos) {
        let on_plan = self
            .plan
            .as_ref()
            .and_then(|plan| plan.steps.get(self.hint_cursor))
            .is_some_and(|&step| step == next);
        if on_plan {
            self.hint_cursor += 1;
        } else {
            // The stale plan is discarded wholesale; progress on it does not
            // carry over.
            self.replan_from(next);
        }
    }

    fn replan_from(&mut self, from: Pos) {
        let still_owed = self.rules.min_tolls_to_cross.saturating_sub(self.state.tolls_crossed);
        self.plan = plan_cheapest_route(&self.state.grid, from, still_owed);
        self.hint_cursor = 0;
        if let Some(plan) = &self.plan {
            self.log.push(LogEvent::RouteReplanned { from, constrained: plan.constrained });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TollBooth;
    use crate::types::Weather;

    fn game_with_grid(grid: Grid, rules: Rules) -> Game {
        let start = grid.start;
        let mut game = Game {
            run_seed: 0,
            state: GameState {
                grid,
                player_pos: start,
                money: rules.starting_money,
                spent: 0,
                tolls_crossed: 0,
                level: 1,
                path: vec![start],
                outcome: None,
            },
            rules,
            plan: None,
            hint_cursor: 0,
            log: Vec::new(),
            next_input_seq: 0,
        };
        game.replan_from(start);
        game
    }

    fn open_rules() -> Rules {
        Rules { min_tolls_to_cross: 0, grid_size: 4, ..Rules::default() }
    }

    #[test]
    fn wall_bump_leaves_position_and_path_untouched() {
        let mut grid = Grid::open(4);
        grid.set_wall(Pos { y: 0, x: 1 }, true);
        let mut game = game_with_grid(grid, open_rules());

        let result = game.apply_move(Direction::Right);
        assert_eq!(result, Err(MoveError::WallBlocked { pos: Pos { y: 0, x: 1 } }));
        assert_eq!(game.state().player_pos, Pos { y: 0, x: 0 });
        assert_eq!(game.state().path.len(), 1);
        assert!(matches!(game.log().last(), Some(LogEvent::MoveRejected { .. })));
    }

    #[test]
    fn leaving_the_grid_is_rejected() {
        let mut game = game_with_grid(Grid::open(4), open_rules());
        let result = game.apply_move(Direction::Up);
        assert_eq!(result, Err(MoveError::OutOfBounds { attempted: Pos { y: -1, x: 0 } }));
        assert_eq!(game.state().path.len(), 1);
    }

    #[test]
    fn toll_is_charged_and_consumed_exactly_once() {
        let mut grid = Grid::open(4);
        let booth_pos = Pos { y: 0, x: 1 };
        grid.place_booth(booth_pos, TollBooth { cost: 7, weather: Weather::Fog });
        let mut game = game_with_grid(grid, open_rules());

        let outcome = game.apply_move(Direction::Right).expect("move");
        assert_eq!(outcome, MoveOutcome::TollPaid { cost: 7, weather: Weather::Fog });
        assert_eq!(game.state().money, Rules::default().starting_money - 7);
        assert_eq!(game.state().spent, 7);
        assert_eq!(game.state().tolls_crossed, 1);
        assert_eq!(game.state().grid.booth_at(booth_pos), None);

        // Stepping off and back on: the booth is gone, nothing is charged.
        game.apply_move(Direction::Left).expect("move back");
        let outcome = game.apply_move(Direction::Right).expect("re-enter");
        assert_eq!(outcome, MoveOutcome::Moved);
        assert_eq!(game.state().spent, 7);
    }

    #[test]
    fn unaffordable_toll_ends_the_run_without_charging() {
        let mut grid = Grid::open(4);
        let booth_pos = Pos { y: 0, x: 1 };
        grid.place_booth(booth_pos, TollBooth { cost: 15, weather: Weather::Clear });
        let rules = Rules { starting_money: 10, ..open_rules() };
        let mut game = game_with_grid(grid, rules);

        let outcome = game.apply_move(Direction::Right).expect("the move itself stands");
        assert_eq!(
            outcome,
            MoveOutcome::Finished(RunOutcome::Bankrupt { required: 15, available: 10 })
        );
        assert_eq!(game.state().money, 10, "a failed payment must not debit");
        assert!(game.state().grid.booth_at(booth_pos).is_some(), "booth must keep standing");
        assert_eq!(game.apply_move(Direction::Left), Err(MoveError::RunOver));
    }

    #[test]
    fn clearing_the_final_level_pays_the_bonus_and_wins() {
        let rules = Rules { max_level: 1, ..open_rules() };
        let mut game = game_with_grid(Grid::open(4), rules);

        for direction in [Direction::Right; 3].into_iter().chain([Direction::Down; 3]) {
            match game.apply_move(direction).expect("move") {
                MoveOutcome::Finished(RunOutcome::Victory {
                    money,
                    total_spent,
                    levels_cleared,
                }) => {
                    assert_eq!(money, Rules::default().starting_money + 100);
                    assert_eq!(total_spent, 0);
                    assert_eq!(levels_cleared, 1);
                    return;
                }
                MoveOutcome::Moved => {}
                other => panic!("unexpected outcome {other:?}"),
            }
        }
        panic!("walk never reached the destination");
    }

    #[test]
    fn clearing_a_level_regenerates_and_resets_per_level_state() {
        // The first level is a hand-built grid; the advance regenerates a
        // real maze from the run seed, which can legally fail for a given
        // seed, so scan a few.
        for seed in 0..32_u64 {
            let mut game = game_with_grid(Grid::open(4), Rules { min_tolls_to_cross: 0, ..Rules::default() });
            game.run_seed = seed;
            let mut cleared = None;
            for direction in [Direction::Right; 3].into_iter().chain([Direction::Down; 3]) {
                match game.apply_move(direction) {
                    Ok(MoveOutcome::LevelCleared { bonus, next_level }) => {
                        cleared = Some((bonus, next_level));
                        break;
                    }
                    Ok(_) => {}
                    Err(MoveError::MazeRegeneration(_)) => break,
                    Err(other) => panic!("unexpected rejection {other:?}"),
                }
            }
            let Some((bonus, next_level)) = cleared else {
                continue;
            };
            assert_eq!(bonus, 100);
            assert_eq!(next_level, 2);
            assert_eq!(game.state().level, 2);
            assert_eq!(game.state().grid.size, Rules::default().grid_size);
            assert_eq!(game.state().player_pos, game.state().grid.start);
            assert_eq!(game.state().path.len(), 1);
            assert_eq!(game.state().tolls_crossed, 0);
            assert_eq!(game.state().money, Rules::default().starting_money + bonus);
            return;
        }
        panic!("no seed in range survived the level advance");
    }

    #[test]
    fn hints_walk_the_plan_and_deviation_replans() {
        let mut game = game_with_grid(Grid::open(4), open_rules());

        let HintResponse::Step(first) = game.next_hint() else {
            panic!("expected a hint on a fresh level");
        };
        assert_eq!(first, Pos { y: 0, x: 1 }, "plan starts along the top row");

        game.apply_move(Direction::Right).expect("follow the hint");
        let HintResponse::Step(second) = game.next_hint() else {
            panic!("expected a second hint");
        };
        assert_eq!(second, Pos { y: 0, x: 2 });

        let replans_before = count_replans(game.log());
        game.apply_move(Direction::Down).expect("stray from the plan");
        assert_eq!(count_replans(game.log()), replans_before + 1, "straying must replan");
    }

    #[test]
    fn hint_at_the_destination_is_a_polite_refusal() {
        let mut game = game_with_grid(Grid::open(4), open_rules());
        game.state.player_pos = game.state.grid.goal;
        assert_eq!(game.next_hint(), HintResponse::NoMoreHints);

        let mut finished = game_with_grid(Grid::open(4), Rules { max_level: 1, ..open_rules() });
        finished.state.outcome =
            Some(RunOutcome::Bankrupt { required: 1, available: 0 });
        assert_eq!(finished.next_hint(), HintResponse::NoMoreHints);
    }

    #[test]
    fn snapshot_hash_tracks_accepted_moves_only() {
        let mut game = game_with_grid(Grid::open(4), open_rules());
        let fresh = game.snapshot_hash();

        let _ = game.apply_move(Direction::Up);
        assert_eq!(game.snapshot_hash(), fresh, "rejected moves must not disturb the hash");

        game.apply_move(Direction::Right).expect("move");
        assert_ne!(game.snapshot_hash(), fresh);
    }

    fn count_replans(log: &[LogEvent]) -> usize {
        log.iter().filter(|event| matches!(event, LogEvent::RouteReplanned { .. })).count()
    }
}
