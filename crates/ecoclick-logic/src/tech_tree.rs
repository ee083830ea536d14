//! Static tech-tree tiers shown by the tech-tree panel.

/// A labelled list of items inside a tier.
#[derive(Debug, Clone, Copy)]
pub struct TechSection {
    pub label: &'static str,
    pub items: &'static [&'static str],
}

/// A labelled note (goal, loop) inside a tier.
#[derive(Debug, Clone, Copy)]
pub struct TechNote {
    pub label: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct TechTier {
    pub id: &'static str,
    pub tier: &'static str,
    pub name: &'static str,
    pub tagline: Option<&'static str>,
    pub sections: &'static [TechSection],
    pub notes: &'static [TechNote],
}

pub static TECH_TREE: &[TechTier] = &[
    TechTier {
        id: "tier0",
        tier: "Tier 0",
        name: "Hand tools & camp",
        tagline: Some("Bootstrap essentials for your first camp."),
        sections: &[
            TechSection { label: "Buildings", items: &["Workbench (hand crafting)", "Drying Rack"] },
            TechSection {
                label: "Base resources",
                items: &["Soil", "Sand", "Clay", "Wood", "Scrap Metal", "Water"],
            },
            TechSection { label: "Parts unlocked", items: &["Fastener Pack", "Frame Beam (basic)"] },
        ],
        notes: &[TechNote { label: "Goal", text: "Craft enough parts to place the first real shop." }],
    },
    TechTier {
        id: "tier1",
        tier: "Tier 1",
        name: "Workshop",
        tagline: Some("Fabrication bootstrap."),
        sections: &[
            TechSection {
                label: "Buildings",
                items: &["Machine Shop (cuts/holes)", "Kiln (low-temp firing)"],
            },
            TechSection {
                label: "Sub-components unlocked",
                items: &[
                    "Fastener Pack (bolts, nuts, washers)",
                    "Frame Beam + Gusset Plate",
                    "Bearing Unit (bearing + housing)",
                    "Shaft Unit (cut shaft + keyway)",
                ],
            },
        ],
        notes: &[TechNote { label: "Goal", text: "Assemble Power Cube (your first energy hub)." }],
    },
    TechTier {
        id: "tier2",
        tier: "Tier 2",
        name: "Power & Hydraulics",
        tagline: None,
        sections: &[
            TechSection {
                label: "Buildings",
                items: &["Hydraulics Bench (hoses/fittings)", "Fuel Station"],
            },
            TechSection { label: "Machines", items: &["Power Cube (hydraulic power producer)"] },
            TechSection {
                label: "Sub-components unlocked",
                items: &[
                    "Hydraulic Pack (pump, reservoir, hoses)",
                    "Quick-Attach Plate (universal mount)",
                    "Control Box (basic) (switches/relays)",
                ],
            },
        ],
        notes: &[TechNote { label: "Goal loop", text: "Route hydraulic power to consumers." }],
    },
    TechTier {
        id: "tier3",
        tier: "Tier 3",
        name: "Earth & Habitat",
        tagline: Some("First product loop."),
        sections: &[
            TechSection {
                label: "Buildings",
                items: &["Soil Processor (sieve + moisture mix)", "Drying Yard"],
            },
            TechSection { label: "Machines", items: &["CEB Press (The Liberator)"] },
            TechSection { label: "Products", items: &["Compressed Earth Bricks (CEB)"] },
        ],
        notes: &[TechNote {
            label: "Loop",
            text: "Soil + water → CEB; place walls → progression unlocks.",
        }],
    },
    TechTier {
        id: "tier4",
        tier: "Tier 4",
        name: "Mobility & Handling",
        tagline: None,
        sections: &[
            TechSection { label: "Buildings", items: &["Wheel Shop (rims/tires)", "Welding Bay"] },
            TechSection { label: "Machines", items: &["LifeTrac (tractor)", "Loader Frame"] },
            TechSection {
                label: "Sub-components",
                items: &[
                    "Wheel Unit (hub + tire)",
                    "Hydraulic Cylinder (assembled from seals + tube)",
                ],
            },
        ],
        notes: &[TechNote {
            label: "Loop",
            text: "LifeTrac moves materials faster; can power attachments via Power Cube bay.",
        }],
    },
    TechTier {
        id: "tier5",
        tier: "Tier 5",
        name: "Metal Fabrication",
        tagline: Some("Faster parts."),
        sections: &[
            TechSection {
                label: "Buildings",
                items: &["CNC Torch Table", "Foundry (basic) (ingot → plate/rod)"],
            },
            TechSection { label: "Products", items: &["Steel Plate", "Angle Iron", "Cut Parts"] },
        ],
        notes: &[TechNote {
            label: "Loop",
            text: "Unlocks cheaper/faster Frame Beams, Gussets, Quick-Attach.",
        }],
    },
    TechTier {
        id: "tier6",
        tier: "Tier 6",
        name: "Sawmill & Seed Eco-Home Starter",
        tagline: None,
        sections: &[
            TechSection { label: "Buildings / Machines", items: &["Sawmill", "Seed Eco-Home Kit"] },
            TechSection { label: "Products", items: &["Lumber sets", "Panels", "Doors/Frames"] },
        ],
        notes: &[TechNote { label: "Loop", text: "Bricks + lumber → livable starter house." }],
    },
];

pub fn tier(id: &str) -> Option<&'static TechTier> {
    TECH_TREE.iter().find(|t| t.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_in_order() {
        assert_eq!(TECH_TREE.len(), 7);
        for (i, t) in TECH_TREE.iter().enumerate() {
            assert_eq!(t.id, format!("tier{}", i));
            assert!(!t.sections.is_empty());
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(tier("tier3").map(|t| t.name), Some("Earth & Habitat"));
        assert!(tier("tier9").is_none());
    }

    #[test]
    fn test_base_resources_listed() {
        let t0 = tier("tier0").unwrap();
        let base = t0.sections.iter().find(|s| s.label == "Base resources").unwrap();
        assert_eq!(base.items.len(), crate::kinds::ResourceKind::ALL.len());
    }
}
