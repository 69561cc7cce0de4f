//! Point-in-time world-state snapshot.

use std::sync::Arc;

use bitflags::bitflags;

use crate::{AreaId, Grid, Position};

bitflags! {
    /// Menus and overlays currently shown by the game client.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct OpenMenus: u8 {
        const LOADING_SCREEN = 1 << 0;
        const INVENTORY      = 1 << 1;
        const STASH          = 1 << 2;
        const NPC_INTERACT   = 1 << 3;
        const WAYPOINT       = 1 << 4;
        const CHARACTER      = 1 << 5;
    }
}

impl OpenMenus {
    /// The client is between areas and cannot process input.
    #[inline]
    pub fn is_loading(self) -> bool {
        self.contains(OpenMenus::LOADING_SCREEN)
    }

    /// Any interactive menu (not the loading screen) is open.
    #[inline]
    pub fn any_open(self) -> bool {
        self.intersects(!OpenMenus::LOADING_SCREEN)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerUnit {
    pub position: Position,
    /// Remaining life, 0-100.
    pub life_percent: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Monster {
    pub id: u32,
    pub position: Position,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Object {
    pub id: u32,
    pub position: Position,
}

/// Everything the engine knows about the world at one instant.
///
/// Cloning is cheap enough to do once per tick: the grid is shared.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Data {
    pub area: AreaId,
    pub player: PlayerUnit,
    pub monsters: Vec<Monster>,
    pub objects: Vec<Object>,
    pub open_menus: OpenMenus,
    /// Collision grid of the current area, if it has been fetched.
    pub grid: Option<Arc<Grid>>,
}

impl Data {
    pub fn is_loading(&self) -> bool {
        self.open_menus.is_loading()
    }

    /// Monsters ordered by distance to the player, closest first.
    pub fn monsters_by_distance(&self) -> Vec<&Monster> {
        let me = self.player.position;
        let mut monsters: Vec<&Monster> = self.monsters.iter().collect();
        monsters.sort_by_key(|m| me.chebyshev(m.position));
        monsters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loading_screen_is_not_a_menu() {
        let loading = OpenMenus::LOADING_SCREEN;
        assert!(loading.is_loading());
        assert!(!loading.any_open());

        let stash = OpenMenus::STASH | OpenMenus::LOADING_SCREEN;
        assert!(stash.any_open());
    }

    #[test]
    fn closest_monster_first() {
        let data = Data {
            player: PlayerUnit {
                position: Position::new(10, 10),
                life_percent: 100,
            },
            monsters: vec![
                Monster {
                    id: 1,
                    position: Position::new(20, 10),
                },
                Monster {
                    id: 2,
                    position: Position::new(11, 9),
                },
            ],
            ..Data::default()
        };

        let ids: Vec<u32> = data.monsters_by_distance().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }
}
