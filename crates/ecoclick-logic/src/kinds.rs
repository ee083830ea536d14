//! Closed kind enumerations (resources, machines, and everything the
//! inventory can hold) with their per-kind lookup tables.

use serde::{Deserialize, Serialize};

/// A collectible resource found on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Soil,
    Sand,
    Clay,
    Wood,
    ScrapMetal,
    Water,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Soil,
        ResourceKind::Sand,
        ResourceKind::Clay,
        ResourceKind::Wood,
        ResourceKind::ScrapMetal,
        ResourceKind::Water,
    ];

    /// Relative weight in the procedural generation pool.
    pub fn generation_weight(self) -> u32 {
        match self {
            ResourceKind::Soil | ResourceKind::Sand | ResourceKind::Clay | ResourceKind::Wood => 3,
            ResourceKind::ScrapMetal | ResourceKind::Water => 1,
        }
    }

    /// Flattened generation pool: each kind repeated by its weight.
    pub fn generation_pool() -> Vec<ResourceKind> {
        Self::ALL
            .iter()
            .flat_map(|&k| std::iter::repeat(k).take(k.generation_weight() as usize))
            .collect()
    }

    /// RGB color used by the renderer for resource nodes.
    pub fn color(self) -> u32 {
        match self {
            ResourceKind::Soil => 0x6b4f2a,
            ResourceKind::Sand => 0xd8c38a,
            ResourceKind::Clay => 0xb5653a,
            ResourceKind::Wood => 0x3f7d32,
            ResourceKind::ScrapMetal => 0x8a9199,
            ResourceKind::Water => 0x3a78c2,
        }
    }
}

/// A machine the player can place on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MachineKind {
    /// Hydraulic hub, energizes 4-neighbor consumers.
    PowerCube,
    /// Compressed earth brick press.
    CebPress,
}

impl MachineKind {
    pub const ALL: [MachineKind; 2] = [MachineKind::PowerCube, MachineKind::CebPress];

    pub fn is_power_source(self) -> bool {
        matches!(self, MachineKind::PowerCube)
    }

    /// What this machine produces while powered, and how often (seconds).
    pub fn production(self) -> Option<(Kind, f32)> {
        match self {
            MachineKind::PowerCube => None,
            MachineKind::CebPress => Some((Kind::BrickCeb, 1.5)),
        }
    }

    /// Short hotbar label.
    pub fn label(self) -> &'static str {
        match self {
            MachineKind::PowerCube => "PC",
            MachineKind::CebPress => "CEB",
        }
    }

    /// Base RGB color; the renderer tints powered machines.
    pub fn color(self) -> u32 {
        match self {
            MachineKind::PowerCube => 0x4aa3df,
            MachineKind::CebPress => 0xc98b4b,
        }
    }
}

/// Everything an inventory slot can count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Kind {
    Soil,
    Sand,
    Clay,
    Wood,
    ScrapMetal,
    Water,
    BrickCeb,
    PowerCube,
    CebPress,
    SeedHomeKit,
}

impl Kind {
    pub const ALL: [Kind; 10] = [
        Kind::Soil,
        Kind::Sand,
        Kind::Clay,
        Kind::Wood,
        Kind::ScrapMetal,
        Kind::Water,
        Kind::BrickCeb,
        Kind::PowerCube,
        Kind::CebPress,
        Kind::SeedHomeKit,
    ];

    /// Stable snake_case identifier (the save-format key).
    pub fn id(self) -> &'static str {
        match self {
            Kind::Soil => "soil",
            Kind::Sand => "sand",
            Kind::Clay => "clay",
            Kind::Wood => "wood",
            Kind::ScrapMetal => "scrap_metal",
            Kind::Water => "water",
            Kind::BrickCeb => "brick_ceb",
            Kind::PowerCube => "power_cube",
            Kind::CebPress => "ceb_press",
            Kind::SeedHomeKit => "seed_home_kit",
        }
    }

    pub fn from_id(id: &str) -> Option<Kind> {
        Kind::ALL.iter().copied().find(|k| k.id() == id)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Kind::Soil => "Soil",
            Kind::Sand => "Sand",
            Kind::Clay => "Clay",
            Kind::Wood => "Wood",
            Kind::ScrapMetal => "Scrap Metal",
            Kind::Water => "Water",
            Kind::BrickCeb => "CEB Brick",
            Kind::PowerCube => "Power Cube",
            Kind::CebPress => "CEB Press",
            Kind::SeedHomeKit => "Seed Eco-Home Kit",
        }
    }

    /// The placeable machine this kind corresponds to, if any.
    pub fn as_machine(self) -> Option<MachineKind> {
        match self {
            Kind::PowerCube => Some(MachineKind::PowerCube),
            Kind::CebPress => Some(MachineKind::CebPress),
            _ => None,
        }
    }

    pub fn as_resource(self) -> Option<ResourceKind> {
        match self {
            Kind::Soil => Some(ResourceKind::Soil),
            Kind::Sand => Some(ResourceKind::Sand),
            Kind::Clay => Some(ResourceKind::Clay),
            Kind::Wood => Some(ResourceKind::Wood),
            Kind::ScrapMetal => Some(ResourceKind::ScrapMetal),
            Kind::Water => Some(ResourceKind::Water),
            _ => None,
        }
    }
}

impl From<ResourceKind> for Kind {
    fn from(r: ResourceKind) -> Self {
        match r {
            ResourceKind::Soil => Kind::Soil,
            ResourceKind::Sand => Kind::Sand,
            ResourceKind::Clay => Kind::Clay,
            ResourceKind::Wood => Kind::Wood,
            ResourceKind::ScrapMetal => Kind::ScrapMetal,
            ResourceKind::Water => Kind::Water,
        }
    }
}

impl From<MachineKind> for Kind {
    fn from(m: MachineKind) -> Self {
        match m {
            MachineKind::PowerCube => Kind::PowerCube,
            MachineKind::CebPress => Kind::CebPress,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Kind::from(*self).fmt(f)
    }
}

impl std::fmt::Display for MachineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Kind::from(*self).fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_pool_weights() {
        let pool = ResourceKind::generation_pool();
        assert_eq!(pool.len(), 14);
        let soil = pool.iter().filter(|k| **k == ResourceKind::Soil).count();
        let water = pool.iter().filter(|k| **k == ResourceKind::Water).count();
        assert!(soil > water);
    }

    #[test]
    fn test_id_roundtrip() {
        for kind in Kind::ALL {
            assert_eq!(Kind::from_id(kind.id()), Some(kind));
        }
        assert_eq!(Kind::from_id("unobtainium"), None);
    }

    #[test]
    fn test_serde_id_matches_save_key() {
        let json = serde_json::to_string(&Kind::ScrapMetal).unwrap();
        assert_eq!(json, "\"scrap_metal\"");
        let json = serde_json::to_string(&Kind::BrickCeb).unwrap();
        assert_eq!(json, "\"brick_ceb\"");
    }

    #[test]
    fn test_machine_roles() {
        assert!(MachineKind::PowerCube.is_power_source());
        assert!(!MachineKind::CebPress.is_power_source());
        assert_eq!(MachineKind::PowerCube.production(), None);
        let (out, interval) = MachineKind::CebPress.production().unwrap();
        assert_eq!(out, Kind::BrickCeb);
        assert!((interval - 1.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_kind_conversions() {
        for r in ResourceKind::ALL {
            assert_eq!(Kind::from(r).as_resource(), Some(r));
        }
        for m in MachineKind::ALL {
            assert_eq!(Kind::from(m).as_machine(), Some(m));
        }
        assert_eq!(Kind::BrickCeb.as_machine(), None);
    }
}
