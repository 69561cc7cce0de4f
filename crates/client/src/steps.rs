//! Steps used by the demo runs.
//!
//! Every step reaches input and path finding through the context of the
//! routine polling it, via [`runtime::current_context`].

use std::time::{Duration, Instant};

use action::{Step, StepState, StepStatus};
use anyhow::{Context as _, anyhow};
use game_data::{Data, Position};

use crate::sim::MAX_CLICK_DISTANCE;

/// Walks toward `target` one click at a time along the computed path.
///
/// A blocked target is reached once the player stands on the walkable tile
/// the path finder substitutes for it.
pub struct MoveTo {
    target: Position,
    state: StepState,
}

impl MoveTo {
    pub fn new(target: Position) -> Self {
        Self {
            target,
            state: StepState::new(),
        }
    }
}

impl Step<Data> for MoveTo {
    fn name(&self) -> &'static str {
        "MoveTo"
    }

    fn status(&self, data: &Data) -> StepStatus {
        if data.player.position == self.target {
            return StepStatus::Completed;
        }
        self.state.status()
    }

    fn run(&mut self, data: &Data) -> anyhow::Result<()> {
        let ctx = runtime::current_context()?;
        ctx.set_last_step(self.name());

        let path = ctx
            .path_finder()
            .get_path(data, self.target)
            .with_context(|| format!("no path to {}", self.target))?;

        // furthest tile of the path a single click can reach
        let hop = path.tiles.len().saturating_sub(1).min(MAX_CLICK_DISTANCE as usize);
        if hop == 0 {
            // standing on the substitute tile
            self.state.mark_run();
            self.state.try_transition(StepStatus::Completed);
            return Ok(());
        }
        let next = path.tiles[hop];

        let input = ctx.input().ok_or_else(|| anyhow!("no input attached"))?;
        input.click(next)?;
        self.state.try_transition(StepStatus::InProgress);
        self.state.mark_run();
        tracing::trace!(from = %data.player.position, to = %next, "moving");
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

pub struct PressKey {
    key: &'static str,
    state: StepState,
}

impl PressKey {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            state: StepState::new(),
        }
    }
}

impl Step<Data> for PressKey {
    fn name(&self) -> &'static str {
        "PressKey"
    }

    fn status(&self, _: &Data) -> StepStatus {
        self.state.status()
    }

    fn run(&mut self, _: &Data) -> anyhow::Result<()> {
        let ctx = runtime::current_context()?;
        ctx.set_last_step(self.name());
        ctx.input()
            .ok_or_else(|| anyhow!("no input attached"))?
            .press_key(self.key)?;
        self.state.mark_run();
        self.state.try_transition(StepStatus::Completed);
        Ok(())
    }

    fn reset(&mut self) {
        self.state.reset();
    }
}

/// Completes once `condition` holds; fails if it does not within `timeout`.
pub struct WaitFor {
    condition: Box<dyn Fn(&Data) -> bool + Send>,
    timeout: Duration,
    started: Option<Instant>,
}

impl WaitFor {
    pub fn new(timeout: Duration, condition: impl Fn(&Data) -> bool + Send + 'static) -> Self {
        Self {
            condition: Box::new(condition),
            timeout,
            started: None,
        }
    }
}

impl Step<Data> for WaitFor {
    fn name(&self) -> &'static str {
        "WaitFor"
    }

    fn status(&self, data: &Data) -> StepStatus {
        match ((self.condition)(data), self.started) {
            (true, _) => StepStatus::Completed,
            (false, Some(_)) => StepStatus::InProgress,
            (false, None) => StepStatus::NotStarted,
        }
    }

    fn run(&mut self, _: &Data) -> anyhow::Result<()> {
        let started = *self.started.get_or_insert_with(Instant::now);
        if started.elapsed() > self.timeout {
            // next attempt waits a full timeout again
            self.started = None;
            anyhow::bail!("condition not met within {:?}", self.timeout);
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.started = None;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use runtime::{Context, GameReader, InputDispatch, Priority, TaskId};

    use super::*;
    use crate::sim::SimulatedGame;

    /// Polls `step` inside a scoped context wired to `game` until it completes.
    fn drive(game: Arc<SimulatedGame>, step: &mut dyn Step<Data>, max_runs: usize) -> usize {
        let task = TaskId::next();
        task.sync_scope(|| {
            let input: Arc<dyn InputDispatch> = game.clone();
            runtime::attach(
                Arc::new(Context::new("steps").with_input(input)),
                Priority::Normal,
            )
            .unwrap();

            let mut runs = 0;
            while !step.status(&game.get_data()).is_completed() {
                assert!(runs < max_runs, "step did not complete");
                step.run(&game.get_data()).unwrap();
                runs += 1;
            }
            runtime::detach().unwrap();
            runs
        })
    }

    #[test]
    fn move_to_walks_around_the_wall() {
        let game = Arc::new(SimulatedGame::demo());
        let target = Position::new(5030, 5002);
        let mut step = MoveTo::new(target);

        let clicks = drive(game.clone(), &mut step, 30);
        assert_eq!(game.player_position(), target);
        assert!(clicks > 1);
    }

    #[test]
    fn move_to_blocked_target_stops_next_to_it() {
        let game = Arc::new(SimulatedGame::demo());
        // inside the wall
        let target = Position::new(5020, 5005);
        let mut step = MoveTo::new(target);

        drive(game.clone(), &mut step, 30);
        let reached = game.player_position();
        assert_ne!(reached, target);
        assert!(reached.chebyshev(target) <= 3, "stopped at {reached}");
    }

    #[test]
    fn press_key_completes_after_one_press() {
        let game = Arc::new(SimulatedGame::demo());
        let mut step = PressKey::new("i");
        assert_eq!(drive(game.clone(), &mut step, 1), 1);
        assert_eq!(game.pressed_keys(), ["i"]);

        step.reset();
        assert_eq!(step.status(&game.get_data()), StepStatus::NotStarted);
    }

    #[test]
    fn steps_fail_without_a_context() {
        let data = SimulatedGame::demo().get_data();
        let err = PressKey::new("i").run(&data).unwrap_err();
        assert!(err.to_string().contains("no task identity"));
    }

    #[test]
    fn wait_for_times_out() {
        let mut step = WaitFor::new(Duration::from_millis(50), |data: &Data| {
            data.player.life_percent > 100
        });
        let data = Data::default();
        assert_eq!(step.status(&data), StepStatus::NotStarted);
        step.run(&data).unwrap();
        assert_eq!(step.status(&data), StepStatus::InProgress);
        std::thread::sleep(Duration::from_millis(60));
        assert!(step.run(&data).is_err());
        assert_eq!(step.status(&data), StepStatus::NotStarted);
    }
}
