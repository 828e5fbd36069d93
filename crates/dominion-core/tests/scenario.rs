//! End-to-end scenarios driven through [`Simulation`].
//!
//! A small two-realm world is stepped day by day and the combined effect of
//! the culture, religion and economy managers is checked against hand
//! computed numbers.

#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;

use dominion_core::{NoOpCallback, RunBounds, RunEndReason, Simulation, SimulationConfig, run_until};
use dominion_society::{CultureData, TechNode};
use dominion_types::{
    Archetype, BuildingDefId, CityId, CultureId, RealmId, ReligionId, TechNodeId, TreeType, Year,
};
use dominion_world::{BuildingDefinition, City, NewGroup, Realm, Religion};

const LATIUM: RealmId = RealmId(1);
const ETRURIA: RealmId = RealmId(2);
const ROMA: CityId = CityId(1);
const VEII: CityId = CityId(2);
const ITALIC: CultureId = CultureId(1);
const LATIN: CultureId = CultureId(2);
const SUN: ReligionId = ReligionId(1);
const MOON: ReligionId = ReligionId(2);
const LIBRARY: BuildingDefId = BuildingDefId(1);
const ACADEMY: BuildingDefId = BuildingDefId(2);
const WRITING: TechNodeId = TechNodeId(1);

const CONFIG: &str = r"
world:
  name: Latium
  start_year: -500
time:
  days_per_season: 30
culture:
  xp_tick_interval_days: 30
assimilation:
  base_rate: 0.02
religion:
  base_conversion_rate: 0.5
";

fn group(city: CityId, count: u32, culture: CultureId, religion: ReligionId) -> NewGroup {
    NewGroup {
        city,
        archetype: Archetype::Laborer,
        count,
        culture: Some(culture),
        religion: Some(religion),
        average_age: 28.0,
    }
}

/// Roma (Latium, Latin leader, Sun state religion): 100 Italic/Moon and
/// 50 Latin/Sun. Veii (Etruria, no leader): 30 Italic/Moon. A library in
/// Roma yields 150 Science XP per month.
fn simulation(library_xp: f64) -> Simulation {
    let config = SimulationConfig::parse(CONFIG).unwrap();
    let progression = config.progression();
    let mut sim = Simulation::new(config).unwrap();
    let state = sim.state_mut();

    state.world.realms.insert(Realm::new(LATIUM, "Latium")).unwrap();
    state.world.realms.insert(Realm::new(ETRURIA, "Etruria")).unwrap();
    state.world.realms.set_leader_culture(LATIUM, Some(LATIN)).unwrap();
    state.world.realms.set_state_religion(LATIUM, Some(SUN)).unwrap();
    state.world.religions.insert(Religion::new(SUN, "Sol", 0.0)).unwrap();
    state.world.religions.insert(Religion::new(MOON, "Luna", 0.0)).unwrap();
    state.world.cities.insert(City::new(ROMA, "Roma", Some(LATIUM))).unwrap();
    state.world.cities.insert(City::new(VEII, "Veii", Some(ETRURIA))).unwrap();

    state.world.population.register_population(group(ROMA, 100, ITALIC, MOON));
    state.world.population.register_population(group(ROMA, 50, LATIN, SUN));
    state.world.population.register_population(group(VEII, 30, ITALIC, MOON));
    state.world.refresh_all_dominance();

    let mut italic = CultureData::new(ITALIC, "Italic", &progression);
    italic.add_node(
        TreeType::Science,
        TechNode::new(WRITING, "Writing").with_buildings(&[ACADEMY]),
    );
    state.cultures.insert(italic).unwrap();
    state.cultures.insert(CultureData::new(LATIN, "Latin", &progression)).unwrap();

    state
        .world
        .buildings
        .define(BuildingDefinition {
            id: LIBRARY,
            name: "Library".to_owned(),
            tree_type: TreeType::Science,
            base_monthly_xp: library_xp,
            xp_per_worker: 0.0,
            worker_efficiency: BTreeMap::new(),
            construction_days: 0,
        })
        .unwrap();
    state.world.buildings.place(LIBRARY, ROMA).unwrap();
    sim
}

fn culture_in(sim: &Simulation, city: CityId, culture: CultureId) -> u64 {
    sim.state()
        .world
        .population
        .culture_population_in_city(city, culture)
}

fn science_xp(sim: &Simulation, culture: CultureId) -> f64 {
    sim.state()
        .cultures
        .get(culture)
        .unwrap()
        .tree(TreeType::Science)
        .unwrap()
        .accumulated_xp()
}

#[test]
fn first_year_assimilates_converts_and_credits_xp() {
    let mut sim = simulation(150.0);
    let summary = sim.step_days(120);
    assert_eq!(summary.years, 1);

    // Two percent of 100 Italic move to Latin; Veii has no leader culture.
    assert_eq!(culture_in(&sim, ROMA, ITALIC), 98);
    assert_eq!(culture_in(&sim, ROMA, LATIN), 52);
    assert_eq!(culture_in(&sim, VEII, ITALIC), 30);
    let roma = sim.state().world.cities.get(ROMA).unwrap();
    assert_eq!(roma.dominant_culture, Some(ITALIC));

    // Half of each Moon group in Roma turns to Sun: 49 of 98, 1 of 2.
    let totals = sim.state().world.population.religion_totals_in_city(ROMA);
    assert_eq!(totals.get(&SUN).copied(), Some(100));
    assert_eq!(totals.get(&MOON).copied(), Some(50));
    assert_eq!(sim.state().stats.people_assimilated, 2);
    assert_eq!(sim.state().stats.people_converted, 50);

    // Three ticks at 100/50 before the year, one at 98/52 after it.
    assert!((science_xp(&sim, ITALIC) - 398.0).abs() < 1e-9);
    assert!((science_xp(&sim, LATIN) - 202.0).abs() < 1e-9);

    assert_eq!(sim.state().world.population.total_population(), 180);
}

#[test]
fn ownership_follows_population_when_a_city_changes_hands() {
    let mut sim = simulation(150.0);
    sim.step_days(30);

    let owner = |sim: &Simulation, culture| {
        sim.state()
            .cultures
            .get(culture)
            .unwrap()
            .tree(TreeType::Economics)
            .unwrap()
            .owner_realm()
    };
    // Italic: 100 in Latium against 30 in Etruria.
    assert_eq!(owner(&sim, ITALIC), Some(LATIUM));
    assert_eq!(owner(&sim, LATIN), Some(LATIUM));

    sim.state_mut()
        .world
        .cities
        .set_controller(ROMA, Some(ETRURIA))
        .unwrap();
    sim.step_days(30);
    assert_eq!(owner(&sim, ITALIC), Some(ETRURIA));
    assert_eq!(owner(&sim, LATIN), Some(ETRURIA));
    assert_eq!(sim.state().stats.ownership_changes, 20);
}

#[test]
fn accumulated_xp_unlocks_a_node_and_its_building() {
    let mut sim = simulation(1500.0);
    sim.step_days(30);
    assert!((science_xp(&sim, ITALIC) - 1000.0).abs() < 1e-9);

    let outcome = sim
        .state_mut()
        .cultures
        .unlock_node(ITALIC, TreeType::Science, WRITING)
        .unwrap();
    assert_eq!(outcome.unlocked_buildings, vec![ACADEMY]);

    let italic = sim.state().cultures.get(ITALIC).unwrap();
    assert!(italic.is_building_unlocked(ACADEMY));
    let tree = italic.tree(TreeType::Science).unwrap();
    assert!(tree.accumulated_xp().abs() < 1e-9);
    assert!((tree.total_xp_earned() - 1000.0).abs() < 1e-9);
    assert!((tree.next_node_cost() - 1500.0).abs() < 1e-9);
}

#[test]
fn multi_year_run_conserves_population() {
    let mut sim = simulation(150.0);
    let bounds = RunBounds {
        max_days: 0,
        until_year: Year::new(-495),
    };
    let summary = run_until(&mut sim, bounds, &mut NoOpCallback).unwrap();
    assert_eq!(summary.end_reason, RunEndReason::TargetYearReached);
    assert_eq!(summary.years, 5);

    let population = &sim.state().world.population;
    assert_eq!(population.total_population(), 180);
    assert_eq!(
        population.culture_population_in_city(ROMA, ITALIC)
            + population.culture_population_in_city(ROMA, LATIN),
        150
    );
    // After the first year's religious split each Italic group holds 49,
    // and two percent of 49 floors to nobody.
    assert_eq!(population.culture_population_in_city(ROMA, ITALIC), 98);
    assert_eq!(summary.stats.people_assimilated, 2);
    assert_eq!(population.culture_population_in_city(VEII, ITALIC), 30);
    assert!(
        population
            .all_groups()
            .all(|g| (g.demographics().total() - f64::from(g.count())).abs() < 1e-6)
    );
}
