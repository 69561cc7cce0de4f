//! In-process stand-in for the game client.
//!
//! Implements both boundary traits over one shared state: reads return the
//! current snapshot, clicks move the player along walkable tiles and a few
//! keys have effects (potion, pickup, town portal).

use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context as _, bail};
use game_data::{CollisionType, Data, Grid, Monster, Object, OpenMenus, PlayerUnit, Position};
use runtime::{GameReader, InputDispatch};

pub const POTION_KEY: &str = "potion";
pub const PICKUP_KEY: &str = "pickup";
pub const TOWN_PORTAL_KEY: &str = "town_portal";

/// Furthest tile a single click can move the player.
pub const MAX_CLICK_DISTANCE: u32 = 6;

/// Life lost per click.
const CLICK_DAMAGE: u8 = 7;
/// Reads that report the loading screen after a town portal.
const LOADING_READS: u32 = 3;
/// Pickup reach in tiles.
const PICKUP_RANGE: u32 = 2;

pub const DEMO_OFFSET: Position = Position::new(5000, 5000);
pub const DEMO_START: Position = Position::new(5002, 5002);
pub const DEMO_TARGET: Position = Position::new(5034, 5004);
/// Walled in on every side.
pub const DEMO_SHRINE: Position = Position::new(5010, 5018);

struct State {
    data: Data,
    start: Position,
    keys: Vec<String>,
    loading_reads: u32,
}

pub struct SimulatedGame {
    state: Mutex<State>,
}

impl SimulatedGame {
    pub fn new(grid: Grid, start: Position) -> Self {
        let data = Data {
            player: PlayerUnit {
                position: start,
                life_percent: 100,
            },
            grid: Some(Arc::new(grid)),
            ..Data::default()
        };
        Self {
            state: Mutex::new(State {
                data,
                start,
                keys: Vec::new(),
                loading_reads: 0,
            }),
        }
    }

    /// 40x24 area with a wall across the middle, a walled-in shrine, a
    /// monster on the way and loot next to the target.
    pub fn demo() -> Self {
        let mut grid = Grid::walkable(40, 24, DEMO_OFFSET);
        // wall at x = 20, open at the bottom
        for y in 0..20 {
            grid.set(Position::new(20, y), CollisionType::Blocked);
        }
        // shrine enclosure
        let shrine = grid.relative(DEMO_SHRINE);
        for dx in -1..=1 {
            for dy in -1..=1 {
                let tile = Position::new(shrine.x + dx, shrine.y + dy);
                if tile != shrine {
                    grid.set(tile, CollisionType::Blocked);
                }
            }
        }
        let grid = grid.with_wall_padding();

        let game = Self::new(grid, DEMO_START);
        game.with_state(|state| {
            state.data.monsters.push(Monster {
                id: 1,
                position: Position::new(5012, 5006),
            });
            state.data.objects.extend([
                Object {
                    id: 10,
                    position: Position::new(5035, 5005),
                },
                Object {
                    id: 11,
                    position: Position::new(5033, 5003),
                },
            ]);
        });
        game
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Keys pressed so far, oldest first.
    pub fn pressed_keys(&self) -> Vec<String> {
        self.with_state(|state| state.keys.clone())
    }

    pub fn set_life(&self, life_percent: u8) {
        self.with_state(|state| state.data.player.life_percent = life_percent.min(100));
    }

    pub fn player_position(&self) -> Position {
        self.with_state(|state| state.data.player.position)
    }
}

impl GameReader for SimulatedGame {
    fn get_data(&self) -> Data {
        self.with_state(|state| {
            if state.loading_reads > 0 {
                state.loading_reads -= 1;
                if state.loading_reads == 0 {
                    state.data.open_menus.remove(OpenMenus::LOADING_SCREEN);
                }
            }
            state.data.clone()
        })
    }
}

impl InputDispatch for SimulatedGame {
    fn press_key(&self, key: &str) -> anyhow::Result<()> {
        self.with_state(|state| {
            state.keys.push(key.to_string());
            let player = &mut state.data.player;
            match key {
                POTION_KEY => player.life_percent = 100,
                PICKUP_KEY => {
                    let from = player.position;
                    let Some(index) = state
                        .data
                        .objects
                        .iter()
                        .position(|object| object.position.chebyshev(from) <= PICKUP_RANGE)
                    else {
                        bail!("nothing to pick up around {from}");
                    };
                    state.data.objects.swap_remove(index);
                }
                TOWN_PORTAL_KEY => {
                    player.position = state.start;
                    state.data.open_menus.insert(OpenMenus::LOADING_SCREEN);
                    state.loading_reads = LOADING_READS;
                }
                _ => {}
            }
            Ok(())
        })
    }

    fn click(&self, at: Position) -> anyhow::Result<()> {
        self.with_state(|state| {
            let grid = state.data.grid.as_deref().context("no area loaded")?;
            if !grid.is_walkable(at) {
                bail!("tile {at} is not walkable");
            }
            let player = &mut state.data.player;
            let distance = player.position.chebyshev(at);
            if distance > MAX_CLICK_DISTANCE {
                bail!("tile {at} is {distance} tiles away");
            }
            player.position = at;
            player.life_percent = player.life_percent.saturating_sub(CLICK_DAMAGE);
            Ok(())
        })
    }
}
