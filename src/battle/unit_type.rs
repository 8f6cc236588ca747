//! Unit templates and the archetype factory
//!
//! A `UnitType` is built once per archetype and shared read-only by every
//! unit placed from it.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Recruitment category of a unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MusterCategory {
    #[default]
    None,
    Melee,
    Shooting,
    Magic,
    Fast,
    Hero,
    Elite,
    Monster,
    Artillery,
    Special,
}

/// Descriptive morale band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoraleCategory {
    #[default]
    Standard,
    Exasperation, // Confident, morale >= 80% of max
    Enraged,      // Shaky, morale <= 20% of max
}

/// Weapon profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Weapons {
    pub retaliate: f64,
    pub primary_damage: f64,
    pub primary_armour_piercing: f64,
    pub secondary_damage: f64,
    pub secondary_armour_piercing: f64,
    pub ranged_damage: f64,
    pub ranged_armour_piercing: f64,
}

/// Elemental resistances (negative = weakness)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resistances {
    pub lightning: i32,
    pub fire: i32,
    pub ice: i32,
    pub earth: i32,
    pub water: i32,
    pub wind: i32,
    pub light: i32,
    pub dark: i32,
}

/// Immutable stat template for a unit archetype
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub level: u32,
    pub type_name: String,
    pub category: MusterCategory,
    pub can_fly: bool,

    // Characteristics
    pub max_hp: f64,
    pub max_fatigue: f64,
    pub max_veil: f64,
    pub max_morale: f64,
    pub max_miniature_count: u32,

    // Rates
    pub toughness: f64,
    pub fatigue_rate: f64,
    pub veil_rate: f64,
    pub morale_rate: f64,

    pub aggressiveness: f64,

    // Combat
    pub attack: f64,
    pub initiative: u32,
    pub bulk: u32,
    pub movement: u32,

    pub weapons: Weapons,

    // Muster
    pub point_cost: u32,
    pub affinities: BTreeMap<String, i32>,
    pub muster_category: MusterCategory,

    // Offence
    pub strength: f64,
    pub shooting: f64,
    pub magic: f64,

    // Charge
    pub charge_priority: u32,
    pub reaction_priority: u32,

    // Accuracy (percent)
    pub melee_accuracy: u32,
    pub ranged_accuracy: u32,
    pub magic_accuracy: u32,

    // Morale
    pub morale_type: MoraleCategory,
    pub intimidation: f64,

    // Defence
    pub block: u32,
    pub evade: u32,
    pub deflect: u32,

    // Protection
    pub armour: u32,
    pub shield: u32,
    pub missile_block: f64,

    pub resistances: Resistances,

    pub talents: Vec<String>,
    /// Names of the powers this unit may use
    pub powers: Vec<String>,
}

impl UnitType {
    /// Blank template at the given level
    pub fn new(level: u32) -> Self {
        Self {
            level,
            ..Default::default()
        }
    }

    /// Does this template list the named power?
    pub fn has_power(&self, name: &str) -> bool {
        self.powers.iter().any(|p| p == name)
    }

    /// Pike-armed line infantry
    pub fn billmen(level: u32) -> Self {
        Self {
            level,
            type_name: "Billmen".to_string(),
            category: MusterCategory::Melee,
            can_fly: false,

            max_hp: 5.0 + level as f64,
            max_fatigue: 5.0,
            max_veil: 0.0,
            max_morale: 6.0,
            max_miniature_count: 1,

            toughness: 1.0,
            fatigue_rate: 1.0,
            veil_rate: 0.0,
            morale_rate: 1.0,

            aggressiveness: 0.0,

            attack: 4.0 + (level / 2) as f64,
            initiative: 1,
            bulk: 2,
            movement: 1,

            weapons: Weapons {
                retaliate: 1.0,
                primary_damage: 3.0 + level as f64,
                primary_armour_piercing: 1.0,
                ..Default::default()
            },

            point_cost: 100 + level * 20,
            affinities: BTreeMap::new(),
            muster_category: MusterCategory::Melee,

            strength: 3.0 + level as f64,
            shooting: 0.0,
            magic: 0.0,

            charge_priority: 2,
            reaction_priority: 1,

            melee_accuracy: 70 + level * 5,
            ranged_accuracy: 0,
            magic_accuracy: 0,

            morale_type: MoraleCategory::Standard,
            intimidation: 1.0,

            block: 2,
            evade: 1,
            deflect: 0,

            armour: 2,
            shield: 1,
            missile_block: 0.2,

            resistances: Resistances::default(),

            talents: vec!["Pike Formation".to_string()],
            powers: vec!["Move".to_string(), "Fight".to_string(), "Wait".to_string()],
        }
    }

    /// Flying fire demon with ranged and magic attacks
    pub fn lucifer(level: u32) -> Self {
        let mut affinities = BTreeMap::new();
        affinities.insert("fire".to_string(), 2);
        affinities.insert("dark".to_string(), 1);

        Self {
            level,
            type_name: "Lucifer".to_string(),
            category: MusterCategory::Magic,
            can_fly: true,

            max_hp: 8.0 + level as f64 * 2.0,
            max_fatigue: 7.0,
            max_veil: 5.0,
            max_morale: 8.0,
            max_miniature_count: 1,

            toughness: 1.2,
            fatigue_rate: 0.8,
            veil_rate: 1.5,
            morale_rate: 1.2,

            aggressiveness: 0.0,

            attack: 6.0 + (level / 2) as f64,
            initiative: 3,
            bulk: 3,
            movement: 2,

            weapons: Weapons {
                retaliate: 1.2,
                primary_damage: 5.0 + level as f64,
                primary_armour_piercing: 2.0,
                secondary_damage: 3.0 + (level / 2) as f64,
                secondary_armour_piercing: 1.0,
                ranged_damage: 4.0 + level as f64,
                ranged_armour_piercing: 2.0,
            },

            point_cost: 200 + level * 30,
            affinities,
            muster_category: MusterCategory::Magic,

            strength: 4.0 + level as f64,
            shooting: 3.0 + (level / 2) as f64,
            magic: 5.0 + level as f64,

            charge_priority: 3,
            reaction_priority: 2,

            melee_accuracy: 75 + level * 5,
            ranged_accuracy: 70 + level * 5,
            magic_accuracy: 85 + level * 5,

            morale_type: MoraleCategory::Exasperation,
            intimidation: 1.5,

            block: 3,
            evade: 2,
            deflect: 1,

            armour: 3,
            shield: 0,
            missile_block: 0.3,

            resistances: Resistances {
                lightning: 1,
                fire: 3,
                ice: 0,
                earth: 0,
                water: 0,
                wind: 1,
                light: -1,
                dark: 2,
            },

            talents: vec!["Hellfire".to_string(), "Dark Pact".to_string()],
            powers: vec![
                "Move".to_string(),
                "Fight".to_string(),
                "Shoot".to_string(),
                "Cast Spell".to_string(),
                "Wait".to_string(),
            ],
        }
    }
}

/// Archetypes the factory knows how to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Billmen,
    Lucifer,
}

impl Archetype {
    /// Build the stat template for this archetype
    pub fn template(&self, level: u32) -> UnitType {
        match self {
            Archetype::Billmen => UnitType::billmen(level),
            Archetype::Lucifer => UnitType::lucifer(level),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Archetype::Billmen => f.write_str("billmen"),
            Archetype::Lucifer => f.write_str("lucifer"),
        }
    }
}

impl FromStr for Archetype {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "billmen" => Ok(Archetype::Billmen),
            "lucifer" => Ok(Archetype::Lucifer),
            other => Err(format!("Unknown archetype: {}", other)),
        }
    }
}
