//! Stat blocks for events that cast powers
//!
//! Events are not creatures, but the combat code needs an attacker record
//! for every power it resolves. Each power event therefore gets a minimal
//! stat block when its map is loaded.

use crate::event::Event;
use mapdef_core::FPoint;
use serde::Serialize;

/// Accuracy that can never miss
pub const GUARANTEED_HIT: i32 = 1000;

/// Effect id that makes map stat blocks immune to status effects
pub const MAP_EVENT_IMMUNITY: &str = "MAP_EVENT_IMMUNITY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EffectKind {
    Immunity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SourceType {
    Hero,
    Enemy,
}

/// A status effect applied to a stat block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Effect {
    pub id: String,
    pub kind: EffectKind,
    /// Remaining duration in milliseconds; `None` never expires
    pub duration_ms: Option<u32>,
    pub source: SourceType,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Damage {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatBlock {
    pub accuracy: i32,
    pub dmg_melee: Damage,
    pub dmg_ranged: Damage,
    pub dmg_ment: Damage,
    pub pos: FPoint,
    /// Cooldown ticks, one slot per power the block can cast
    pub power_cooldowns: Vec<u32>,
    pub effects: Vec<Effect>,
}

impl StatBlock {
    /// Build the stat block for a power-casting event
    pub fn for_event(event: &Event) -> Self {
        let pos = match event.power_path() {
            Some(path) => path.source.center(),
            None => event.location.origin().center(),
        };

        let damage = event
            .power_damage()
            .map(|d| Damage { min: d.min, max: d.max })
            .unwrap_or_default();

        Self {
            accuracy: GUARANTEED_HIT,
            dmg_melee: damage,
            dmg_ranged: damage,
            dmg_ment: damage,
            pos,
            power_cooldowns: vec![0],
            effects: vec![Effect {
                id: MAP_EVENT_IMMUNITY.to_string(),
                kind: EffectKind::Immunity,
                duration_ms: None,
                source: SourceType::Enemy,
            }],
        }
    }

    pub fn is_immune(&self) -> bool {
        self.effects.iter().any(|e| e.kind == EffectKind::Immunity)
    }
}
