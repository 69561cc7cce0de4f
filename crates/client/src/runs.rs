//! Demo runs and the potion hook.

use std::time::Duration;

use action::{ActionOptions, ActionPriority, BoxedAction, BoxedStep, builder};
use game_data::{Data, Position};
use runtime::{PriorityHook, Run};

use crate::{
    sim::{DEMO_SHRINE, DEMO_TARGET, PICKUP_KEY, POTION_KEY, TOWN_PORTAL_KEY},
    steps::{MoveTo, PressKey, WaitFor},
};

/// Life below which the potion hook drinks.
pub const POTION_THRESHOLD: u8 = 40;

const LOOT_RANGE: u32 = 2;

/// Runs played by the `bot` binary against [`crate::sim::SimulatedGame::demo`].
pub fn demo_runs() -> Vec<Run> {
    vec![
        Run::new(
            "prepare",
            vec![
                builder::static_action("inventory check", ActionOptions::new(), |_: &Data| {
                    vec![
                        Box::new(PressKey::new("inventory")) as BoxedStep<Data>,
                        Box::new(PressKey::new("escape")),
                    ]
                }),
                // polled first despite being listed last
                builder::static_action(
                    "town portal",
                    ActionOptions::new().priority(ActionPriority::High),
                    |_: &Data| vec![Box::new(PressKey::new(TOWN_PORTAL_KEY)) as BoxedStep<Data>],
                ),
            ],
        ),
        Run::new(
            "treasure",
            vec![
                approach(DEMO_SHRINE, "shrine", ActionOptions::new().can_be_skipped().max_retries(3)),
                approach(DEMO_TARGET, "treasure", ActionOptions::new().resettable()),
                loot(),
            ],
        ),
    ]
}

/// Walks to `target`, re-planning from the latest snapshot after every hop.
fn approach(target: Position, name: &str, options: ActionOptions) -> BoxedAction<Data> {
    let label = format!("approach {name}");
    builder::factory(&label, ActionOptions::new(), move |data: &Data| {
        if data.player.position == target {
            return None;
        }
        let options = options.clone();
        Some(builder::static_action("move", options, move |_: &Data| {
            vec![Box::new(MoveTo::new(target)) as BoxedStep<Data>]
        }))
    })
}

/// Picks up everything in reach, one object per rebuild.
fn loot() -> BoxedAction<Data> {
    builder::step_chain(
        "loot",
        ActionOptions::new().repeat_until_no_more_steps().ignore_errors(),
        |data: &Data| {
            let in_reach = data
                .objects
                .iter()
                .any(|object| object.position.chebyshev(data.player.position) <= LOOT_RANGE);
            if !in_reach {
                return Vec::new();
            }
            vec![Box::new(PressKey::new(PICKUP_KEY)) as BoxedStep<Data>]
        },
    )
}

/// Drinks a potion when life drops below a threshold.
pub struct PotionHook {
    threshold: u8,
}

impl PotionHook {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl PriorityHook for PotionHook {
    fn name(&self) -> &str {
        "potion"
    }

    fn check(&mut self, data: &Data) -> Option<BoxedAction<Data>> {
        if data.player.life_percent >= self.threshold {
            return None;
        }
        let threshold = self.threshold;
        tracing::info!(life = data.player.life_percent, "life low, drinking potion");
        Some(builder::static_action(
            "drink potion",
            ActionOptions::new().can_be_skipped(),
            move |_: &Data| {
                vec![
                    Box::new(PressKey::new(POTION_KEY)) as BoxedStep<Data>,
                    Box::new(WaitFor::new(Duration::from_secs(1), move |data: &Data| {
                        data.player.life_percent >= threshold
                    })),
                ]
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use action::Action;
    use game_data::PlayerUnit;

    use super::*;

    #[test]
    fn hook_fires_only_below_threshold() {
        let mut hook = PotionHook::new(POTION_THRESHOLD);
        let mut data = Data {
            player: PlayerUnit {
                position: Position::ORIGIN,
                life_percent: 90,
            },
            ..Data::default()
        };
        assert!(hook.check(&data).is_none());

        data.player.life_percent = 10;
        let action = hook.check(&data).expect("potion action");
        assert_eq!(action.name(), "drink potion");
    }

    #[test]
    fn demo_has_two_runs() {
        let runs = demo_runs();
        let names: Vec<_> = runs.iter().map(Run::name).collect();
        assert_eq!(names, ["prepare", "treasure"]);
    }
}
