//! Protection ports queried by the damage resolver and the cleanup sweep.
//!
//! Scripted sequences (tutorial fights, boss intros) decide which combatants
//! must not be hurt or despawned. The simulation only asks.

use std::collections::HashSet;

use bevy::prelude::*;

use crate::ai::Combatant;
use crate::combat::ProtectionFlags;

pub trait ProtectionPolicy: Send + Sync {
    fn is_protected_from_damage(&self, _entity: Entity, _combatant: &Combatant) -> bool {
        false
    }

    fn is_protected_from_cleanup(&self, _entity: Entity, _combatant: &Combatant) -> bool {
        false
    }
}

/// Nothing is protected.
pub struct NoProtection;

impl ProtectionPolicy for NoProtection {}

/// Explicit entity sets, maintained by whoever runs the script.
#[derive(Debug, Clone, Default)]
pub struct ProtectedSet {
    pub damage: HashSet<Entity>,
    pub cleanup: HashSet<Entity>,
}

impl ProtectionPolicy for ProtectedSet {
    fn is_protected_from_damage(&self, entity: Entity, _combatant: &Combatant) -> bool {
        self.damage.contains(&entity)
    }

    fn is_protected_from_cleanup(&self, entity: Entity, _combatant: &Combatant) -> bool {
        self.cleanup.contains(&entity)
    }
}

#[derive(Resource)]
pub struct Protection(pub Box<dyn ProtectionPolicy>);

impl Default for Protection {
    fn default() -> Self {
        Self(Box::new(NoProtection))
    }
}

impl Protection {
    pub fn new(policy: impl ProtectionPolicy + 'static) -> Self {
        Self(Box::new(policy))
    }

    pub fn flags(&self, entity: Entity, combatant: &Combatant) -> ProtectionFlags {
        ProtectionFlags {
            damage: self.0.is_protected_from_damage(entity, combatant),
            cleanup: self.0.is_protected_from_cleanup(entity, combatant),
        }
    }

    pub fn is_protected_from_cleanup(&self, entity: Entity, combatant: &Combatant) -> bool {
        self.0.is_protected_from_cleanup(entity, combatant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::Archetype;

    #[test]
    fn test_default_protects_nothing() {
        let protection = Protection::default();
        let combatant = Combatant::new(Archetype::Crackhead, 0.0);
        assert_eq!(
            protection.flags(Entity::PLACEHOLDER, &combatant),
            ProtectionFlags::default()
        );
    }

    #[test]
    fn test_protected_set() {
        let entity = Entity::from_raw(7);
        let mut set = ProtectedSet::default();
        set.cleanup.insert(entity);
        let protection = Protection::new(set);
        let combatant = Combatant::new(Archetype::GreenThug, 0.0);

        let flags = protection.flags(entity, &combatant);
        assert!(flags.cleanup);
        assert!(!flags.damage);
        assert!(!protection.is_protected_from_cleanup(Entity::from_raw(8), &combatant));
    }
}
