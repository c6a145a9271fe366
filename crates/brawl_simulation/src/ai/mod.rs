//! Enemy AI: archetype table, combatant state machine, flavor behaviors.
//!
//! Every enemy runs the same state machine; archetypes differ only in the
//! data they were spawned with. Bosses layer `BossKit` on top.

use bevy::prelude::*;

pub mod archetypes;
pub mod behaviors;
pub mod brain;
pub mod components;
pub mod movement;
pub mod systems;

pub use archetypes::{
    Archetype, ArchetypeConfig, ArchetypeTable, AttackKind, AttackProfile, AttackSelection,
    BehaviorTag, CombatProfile, CombatStats, FlavorTuning, MovementTuning, VerticalBias,
};
pub use brain::{update_combatant, Fighter, TickContext};
pub use components::*;
pub use systems::*;

use crate::SimulationSet;

/// AI Plugin
///
/// Registers the combatant tick in `SimulationSet::Agents`.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArchetypeTable>()
            .add_systems(FixedUpdate, tick_combatants.in_set(SimulationSet::Agents));
    }
}
