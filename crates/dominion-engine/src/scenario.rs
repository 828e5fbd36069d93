//! Seeded starting scenario for the engine.
//!
//! Builds realms, cities, religions, cultures, population groups, buildings
//! and a few starting contracts from the `scenario` section of
//! `dominion-config.yaml` and the world seed. The same seed always yields
//! the same world.

use std::collections::BTreeMap;

use dominion_core::SimulationState;
use dominion_society::{
    ContractDuration, ContractSubject, ContractTerms, CultureData, GovernanceRestrictions, Pillar,
    ProgressionConfig, TechNode,
};
use dominion_types::{
    Archetype, BuildingDefId, CityId, CultureId, ModifierSet, PillarId, RealmId, ReligionId,
    ResourceKind, TechNodeId, TreeType,
};
use dominion_world::{BuildingDefinition, City, NewGroup, Realm, Religion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::info;

use crate::error::EngineError;

// -----------------------------------------------------------------------
// Configuration
// -----------------------------------------------------------------------

/// Configuration for scenario seeding, loaded from `dominion-config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioConfig {
    /// Number of realms.
    #[serde(default = "default_realm_count")]
    pub realm_count: u32,

    /// Cities founded per realm.
    #[serde(default = "default_cities_per_realm")]
    pub cities_per_realm: u32,

    /// Number of cultures.
    #[serde(default = "default_culture_count")]
    pub culture_count: u32,

    /// Number of religions.
    #[serde(default = "default_religion_count")]
    pub religion_count: u32,

    /// Population groups registered per city.
    #[serde(default = "default_groups_per_city")]
    pub groups_per_city: u32,

    /// Largest head count of a seeded group.
    #[serde(default = "default_max_group_size")]
    pub max_group_size: u32,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            realm_count: default_realm_count(),
            cities_per_realm: default_cities_per_realm(),
            culture_count: default_culture_count(),
            religion_count: default_religion_count(),
            groups_per_city: default_groups_per_city(),
            max_group_size: default_max_group_size(),
        }
    }
}

const fn default_realm_count() -> u32 {
    3
}

const fn default_cities_per_realm() -> u32 {
    2
}

const fn default_culture_count() -> u32 {
    4
}

const fn default_religion_count() -> u32 {
    2
}

const fn default_groups_per_city() -> u32 {
    4
}

const fn default_max_group_size() -> u32 {
    500
}

// -----------------------------------------------------------------------
// Name pools
// -----------------------------------------------------------------------

const REALM_NAMES: &[&str] = &["Latium", "Etruria", "Samnium", "Campania", "Apulia", "Lucania"];

const CITY_NAMES: &[&str] = &[
    "Roma", "Ostia", "Veii", "Tarquinii", "Bovianum", "Aesernia", "Capua", "Cumae", "Tarentum",
    "Luceria", "Paestum", "Grumentum",
];

const CULTURE_NAMES: &[&str] = &["Latin", "Etruscan", "Oscan", "Greek", "Umbrian", "Messapian"];

const RELIGION_NAMES: &[&str] = &["Sol Invictus", "Luna", "Mithras", "Olympian"];

fn pick(pool: &[&str], index: u32, fallback: &str) -> String {
    usize::try_from(index)
        .ok()
        .and_then(|i| pool.get(i))
        .map_or_else(|| format!("{fallback} {index}"), |name| (*name).to_owned())
}

// -----------------------------------------------------------------------
// Content
// -----------------------------------------------------------------------

/// One building per tree type: name, monthly base XP, construction days.
const BUILDINGS: [(TreeType, &str, f64, u32); 5] = [
    (TreeType::Economics, "Market", 40.0, 20),
    (TreeType::Warfare, "Barracks", 30.0, 25),
    (TreeType::Religion, "Temple", 35.0, 30),
    (TreeType::Politics, "Forum", 30.0, 40),
    (TreeType::Science, "Library", 25.0, 45),
];

const fn building_id(tree_type: TreeType) -> BuildingDefId {
    BuildingDefId(match tree_type {
        TreeType::Economics => 1,
        TreeType::Warfare => 2,
        TreeType::Religion => 3,
        TreeType::Politics => 4,
        TreeType::Science => 5,
    })
}

/// A three-node chain per tree. The first node unlocks the tree's building.
fn tech_nodes(tree_type: TreeType) -> Vec<TechNode> {
    let base = building_id(tree_type).into_inner().saturating_mul(10);
    let first = TechNodeId(base);
    let second = TechNodeId(base.saturating_add(1));
    let third = TechNodeId(base.saturating_add(2));
    vec![
        TechNode::new(first, &format!("{tree_type} I")).with_buildings(&[building_id(tree_type)]),
        TechNode::new(second, &format!("{tree_type} II"))
            .with_prerequisites(&[first])
            .with_modifiers(ModifierSet::new().with(&format!("{tree_type}_output"), 0.1)),
        TechNode::new(third, &format!("{tree_type} III"))
            .with_prerequisites(&[second])
            .with_modifiers(ModifierSet::new().with(&format!("{tree_type}_output"), 0.2)),
    ]
}

// -----------------------------------------------------------------------
// Seeding
// -----------------------------------------------------------------------

/// Counts of what was seeded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScenarioSummary {
    /// Realms created.
    pub realms: u32,
    /// Cities founded.
    pub cities: u32,
    /// Population groups registered.
    pub groups: u32,
    /// Total people seeded.
    pub people: u64,
    /// Contracts signed.
    pub contracts: u32,
}

/// Populate `state` with a seeded starting world.
///
/// # Errors
///
/// Returns [`EngineError`] if any registry rejects the generated content,
/// or [`EngineError::Scenario`] when the config asks for nothing to seed.
pub fn seed_world(
    state: &mut SimulationState,
    scenario: &ScenarioConfig,
    progression: &ProgressionConfig,
    seed: u64,
) -> Result<ScenarioSummary, EngineError> {
    if scenario.realm_count == 0 || scenario.culture_count == 0 || scenario.religion_count == 0 {
        return Err(EngineError::Scenario {
            message: "realm_count, culture_count and religion_count must be positive".to_owned(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut summary = ScenarioSummary::default();

    for r in 1..=scenario.religion_count {
        let resistance = rng.random_range(0.0..0.5);
        state.world.religions.insert(Religion::new(
            ReligionId(r),
            &pick(RELIGION_NAMES, r.saturating_sub(1), "Faith"),
            resistance,
        ))?;
    }

    for c in 1..=scenario.culture_count {
        let name = pick(CULTURE_NAMES, c.saturating_sub(1), "Culture");
        let mut culture = CultureData::new(CultureId(c), &name, progression);
        for tree_type in TreeType::ALL {
            for node in tech_nodes(tree_type) {
                culture.add_node(tree_type, node);
            }
        }
        culture.adopt_pillar(Pillar {
            id: PillarId(c),
            name: format!("{name} tradition"),
            modifiers: ModifierSet::new().with("stability", 0.05),
        });
        state.cultures.insert(culture)?;
    }

    for (tree_type, name, xp, days) in BUILDINGS {
        state.world.buildings.define(BuildingDefinition {
            id: building_id(tree_type),
            name: name.to_owned(),
            tree_type,
            base_monthly_xp: xp,
            xp_per_worker: 0.5,
            worker_efficiency: BTreeMap::from([
                (Archetype::Artisan, 1.2),
                (Archetype::Clergy, 1.5),
                (Archetype::Slave, 0.6),
            ]),
            construction_days: days,
        })?;
    }

    let mut next_city = 1_u32;
    for r in 1..=scenario.realm_count {
        let realm = RealmId(r);
        state
            .world
            .realms
            .insert(Realm::new(realm, &pick(REALM_NAMES, r.saturating_sub(1), "Realm")))?;
        let leader = CultureId(rng.random_range(1..=scenario.culture_count));
        let faith = ReligionId(rng.random_range(1..=scenario.religion_count));
        state.world.realms.set_leader_culture(realm, Some(leader))?;
        state.world.realms.set_state_religion(realm, Some(faith))?;
        summary.realms = summary.realms.saturating_add(1);

        for _ in 0..scenario.cities_per_realm {
            let city = CityId(next_city);
            next_city = next_city.saturating_add(1);
            let name = pick(CITY_NAMES, city.into_inner().saturating_sub(1), "City");
            state.world.cities.insert(City::new(city, &name, Some(realm)))?;
            summary.cities = summary.cities.saturating_add(1);
            seed_city(state, scenario, city, &mut rng, &mut summary)?;
        }
    }

    for r in 2..=scenario.realm_count {
        let terms = ContractTerms {
            obligations: BTreeMap::from([
                (ResourceKind::Gold, Decimal::from(rng.random_range(5..=30_i64))),
                (ResourceKind::Food, Decimal::from(rng.random_range(0..=20_i64))),
            ]),
            manpower: Decimal::from(rng.random_range(0..=25_i64)),
            restrictions: GovernanceRestrictions {
                foreign_policy: true,
                ..GovernanceRestrictions::default()
            },
            duration: ContractDuration::Months(rng.random_range(6..=36)),
        };
        state
            .contracts
            .create(RealmId(1), ContractSubject::Realm(RealmId(r)), terms)?;
        summary.contracts = summary.contracts.saturating_add(1);
    }

    state.world.refresh_all_dominance();

    info!(
        realms = summary.realms,
        cities = summary.cities,
        groups = summary.groups,
        people = summary.people,
        contracts = summary.contracts,
        "Scenario seeded"
    );
    Ok(summary)
}

fn seed_city(
    state: &mut SimulationState,
    scenario: &ScenarioConfig,
    city: CityId,
    rng: &mut StdRng,
    summary: &mut ScenarioSummary,
) -> Result<(), EngineError> {
    let max_size = scenario.max_group_size.max(1);
    for _ in 0..scenario.groups_per_city {
        let archetype = Archetype::ALL
            .get(rng.random_range(0..Archetype::ALL.len()))
            .copied()
            .unwrap_or(Archetype::Laborer);
        let count = rng.random_range(1..=max_size);
        state.world.population.register_population(NewGroup {
            city,
            archetype,
            count,
            culture: Some(CultureId(rng.random_range(1..=scenario.culture_count))),
            religion: Some(ReligionId(rng.random_range(1..=scenario.religion_count))),
            average_age: rng.random_range(18.0..45.0),
        });
        summary.groups = summary.groups.saturating_add(1);
        summary.people = summary.people.saturating_add(u64::from(count));
    }

    let tree_type = TreeType::ALL
        .get(rng.random_range(0..TreeType::ALL.len()))
        .copied()
        .unwrap_or(TreeType::Economics);
    let building = state.world.buildings.place(building_id(tree_type), city)?;
    state
        .world
        .buildings
        .assign_workers(building, Archetype::Artisan, rng.random_range(0..=20))?;
    Ok(())
}
