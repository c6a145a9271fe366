//! Where and what to spawn: side bias, off-screen X, archetype pick,
//! vertical bias, distance validation.

use bevy::prelude::*;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::ai::{Archetype, ArchetypeTable, CombatState, VerticalBias};
use crate::components::{CameraView, PlayerSnapshot, StreetLayout, WorldBounds};
use crate::spawn::config::LevelConfig;

/// What the director needs to know about a live combatant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterEntry {
    pub entity: Entity,
    pub position: Vec2,
    pub state: CombatState,
    pub is_boss: bool,
    pub spawned_at: f32,
    pub visual_destroyed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnSide {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnPlan {
    pub archetype: Archetype,
    pub position: Vec2,
    pub side: SpawnSide,
    /// Spawned past the world bounds: collision starts disabled
    pub outside_world: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnRejection {
    CapReached,
    NoArchetype,
    TooCloseToPlayer,
    TooCloseToEnemy,
}

#[allow(clippy::too_many_arguments)]
pub fn plan_spawn(
    config: &LevelConfig,
    roster: &[RosterEntry],
    player: &PlayerSnapshot,
    camera: &CameraView,
    bounds: &WorldBounds,
    layout: &StreetLayout,
    table: &ArchetypeTable,
    rng: &mut impl Rng,
) -> Result<SpawnPlan, SpawnRejection> {
    let alive = roster
        .iter()
        .filter(|entry| !entry.state.is_terminal())
        .count();
    if alive >= config.max_enemies {
        return Err(SpawnRejection::CapReached);
    }

    let side = choose_side(config, player, camera, rng);
    let offset = config.spawn_margin + rng.gen::<f32>() * config.spawn_spread;
    // Deliberately not clamped to the world: entering from off-screen
    let x = match side {
        SpawnSide::Right => camera.right() + offset,
        SpawnSide::Left => camera.left - offset,
    };

    let archetype = choose_archetype(config, table, rng).ok_or(SpawnRejection::NoArchetype)?;
    let y = spawn_y(table.get(archetype).vertical_bias, layout, rng);
    let position = Vec2::new(x, y);

    if position.distance(player.position) < config.min_distance_from_player {
        return Err(SpawnRejection::TooCloseToPlayer);
    }
    let crowded = roster.iter().any(|entry| {
        !entry.state.is_terminal()
            && entry.position.distance(position) < config.min_distance_from_enemies
    });
    if crowded {
        return Err(SpawnRejection::TooCloseToEnemy);
    }

    Ok(SpawnPlan {
        archetype,
        position,
        side,
        outside_world: !bounds.contains(x),
    })
}

pub fn choose_side(
    config: &LevelConfig,
    player: &PlayerSnapshot,
    camera: &CameraView,
    rng: &mut impl Rng,
) -> SpawnSide {
    let right_bias = if camera.locked {
        config.locked_camera_right_bias
    } else if player.position.x < config.first_segment_end_x {
        config.first_segment_right_bias
    } else {
        config.right_bias
    };

    if rng.gen::<f32>() < right_bias {
        SpawnSide::Right
    } else {
        SpawnSide::Left
    }
}

/// Uniform over the level whitelist, else weighted over the table.
pub fn choose_archetype(
    config: &LevelConfig,
    table: &ArchetypeTable,
    rng: &mut impl Rng,
) -> Option<Archetype> {
    if !config.allowed_archetypes.is_empty() {
        let index = rng.gen_range(0..config.allowed_archetypes.len());
        return Some(config.allowed_archetypes[index]);
    }

    let weights = table.spawn_weights();
    let dist = WeightedIndex::new(weights.iter().map(|(_, weight)| *weight)).ok()?;
    Some(weights[dist.sample(rng)].0)
}

pub fn spawn_y(bias: VerticalBias, layout: &StreetLayout, rng: &mut impl Rng) -> f32 {
    let (low, high) = match bias {
        VerticalBias::Anywhere => (layout.top, layout.bottom),
        VerticalBias::Upper => (layout.top, layout.middle()),
        VerticalBias::Lower => (layout.middle(), layout.bottom),
    };
    if high <= low {
        return layout.clamp_y(low);
    }
    rng.gen_range(low..=high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn entry(x: f32, state: CombatState) -> RosterEntry {
        RosterEntry {
            entity: Entity::PLACEHOLDER,
            position: Vec2::new(x, 520.0),
            state,
            is_boss: false,
            spawned_at: 0.0,
            visual_destroyed: false,
        }
    }

    struct Setup {
        config: LevelConfig,
        player: PlayerSnapshot,
        camera: CameraView,
        bounds: WorldBounds,
        layout: StreetLayout,
        table: ArchetypeTable,
        rng: ChaCha8Rng,
    }

    impl Setup {
        fn new() -> Self {
            Self {
                config: LevelConfig::default(),
                player: PlayerSnapshot {
                    position: Vec2::new(2000.0, 520.0),
                    ..Default::default()
                },
                camera: CameraView {
                    left: 1400.0,
                    width: 1280.0,
                    locked: false,
                },
                bounds: WorldBounds::default(),
                layout: StreetLayout::default(),
                table: ArchetypeTable::standard(),
                rng: ChaCha8Rng::seed_from_u64(5),
            }
        }

        fn plan(&mut self, roster: &[RosterEntry]) -> Result<SpawnPlan, SpawnRejection> {
            plan_spawn(
                &self.config,
                roster,
                &self.player,
                &self.camera,
                &self.bounds,
                &self.layout,
                &self.table,
                &mut self.rng,
            )
        }
    }

    #[test]
    fn test_cap_counts_only_living() {
        let mut setup = Setup::new();
        let full: Vec<_> = (0..5).map(|i| entry(i as f32 * 10.0, CombatState::Walking)).collect();
        assert_eq!(setup.plan(&full), Err(SpawnRejection::CapReached));

        let mut with_dead = full.clone();
        with_dead[0].state = CombatState::Dead;
        assert!(setup.plan(&with_dead).is_ok());
    }

    #[test]
    fn test_spawn_lands_off_screen_and_in_band() {
        let mut setup = Setup::new();
        for _ in 0..50 {
            let plan = setup.plan(&[]).unwrap();
            let x = plan.position.x;
            match plan.side {
                SpawnSide::Right => assert!(x >= setup.camera.right() + setup.config.spawn_margin),
                SpawnSide::Left => assert!(x <= setup.camera.left - setup.config.spawn_margin),
            }
            assert!(plan.position.y >= setup.layout.top && plan.position.y <= setup.layout.bottom);
            assert_ne!(plan.archetype, Archetype::Critic);
        }
    }

    #[test]
    fn test_first_segment_spawns_from_the_right() {
        let mut setup = Setup::new();
        setup.player.position.x = 300.0;
        setup.camera.left = 0.0;
        for _ in 0..50 {
            assert_eq!(
                choose_side(&setup.config, &setup.player, &setup.camera, &mut setup.rng),
                SpawnSide::Right
            );
        }
    }

    #[test]
    fn test_left_spawn_before_world_start_is_flagged() {
        let mut setup = Setup::new();
        setup.camera.left = 50.0;
        setup.player.position.x = 1500.0;
        setup.config.right_bias = 0.0;

        let plan = setup.plan(&[]).unwrap();
        assert_eq!(plan.side, SpawnSide::Left);
        assert!(plan.position.x < 0.0);
        assert!(plan.outside_world);
    }

    #[test]
    fn test_rejects_spawn_near_player_or_enemy() {
        let mut setup = Setup::new();
        setup.config.right_bias = 1.0;
        setup.config.spawn_spread = 0.0;
        let spawn_x = setup.camera.right() + setup.config.spawn_margin;

        setup.player.position = Vec2::new(spawn_x, 520.0);
        setup.config.allowed_archetypes = vec![Archetype::Crackhead];
        assert_eq!(setup.plan(&[]), Err(SpawnRejection::TooCloseToPlayer));

        setup.player.position = Vec2::new(2000.0, 520.0);
        setup.config.min_distance_from_enemies = 500.0;
        let crowd = [entry(spawn_x, CombatState::Walking)];
        assert_eq!(setup.plan(&crowd), Err(SpawnRejection::TooCloseToEnemy));

        // A corpse doesn't block the spot
        let corpse = [entry(spawn_x, CombatState::Dead)];
        assert!(setup.plan(&corpse).is_ok());
    }

    #[test]
    fn test_whitelist_is_respected() {
        let mut setup = Setup::new();
        setup.config.allowed_archetypes = vec![Archetype::BlackThug];
        for _ in 0..20 {
            assert_eq!(
                choose_archetype(&setup.config, &setup.table, &mut setup.rng),
                Some(Archetype::BlackThug)
            );
        }
    }

    #[test]
    fn test_empty_table_has_no_archetype() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            choose_archetype(&LevelConfig::default(), &ArchetypeTable::empty(), &mut rng),
            None
        );
    }

    #[test]
    fn test_vertical_bias_halves() {
        let layout = StreetLayout::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..50 {
            assert!(spawn_y(VerticalBias::Upper, &layout, &mut rng) <= layout.middle());
            assert!(spawn_y(VerticalBias::Lower, &layout, &mut rng) >= layout.middle());
        }
    }
}
