//! Yearly religious conversion toward each realm's state religion.
//!
//! Each group whose religion differs from the state religion of the realm
//! controlling its city loses `floor(count * rate * (1 - resistance))`
//! members to the state religion. Resistance is that of the group's current
//! faith; groups without a religion offer none. Culture is untouched.

use dominion_types::{CityId, ReligionId};
use dominion_world::WorldState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::assimilation::share_of;

/// Outcome of one conversion pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionReport {
    /// Groups that lost members.
    pub groups_split: u32,
    /// People who changed religion.
    pub people_converted: u64,
}

/// Run one year of religious conversion over every city.
pub fn process_religious_conversion(world: &mut WorldState, base_rate: f64) -> ConversionReport {
    let mut report = ConversionReport::default();
    for city in world.cities.ids() {
        let Some(state_religion) = world
            .cities
            .controlling_realm(city)
            .and_then(|realm| world.realms.state_religion(realm))
        else {
            continue;
        };
        convert_city(world, city, state_religion, base_rate, &mut report);
        world.refresh_city_dominance(city);
    }
    if report.people_converted > 0 {
        info!(
            groups = report.groups_split,
            people = report.people_converted,
            "Religious conversion applied"
        );
    }
    report
}

fn convert_city(
    world: &mut WorldState,
    city: CityId,
    target: ReligionId,
    base_rate: f64,
    report: &mut ConversionReport,
) {
    for id in world.population.group_ids_in_city(city) {
        let Some(group) = world.population.group(id) else {
            continue;
        };
        if group.is_empty() || group.religion() == Some(target) {
            continue;
        }
        let resistance = group
            .religion()
            .map_or(0.0, |r| world.religions.resistance(r));
        let moved = share_of(group.count(), base_rate * (1.0 - resistance));
        if moved == 0 {
            continue;
        }
        let culture = group.culture();
        match world.population.split_group(id, moved, culture, Some(target)) {
            Ok(new_group) => {
                debug!(
                    city = %city,
                    source = %id,
                    new_group = %new_group,
                    religion = %target,
                    moved,
                    "Group converted"
                );
                report.groups_split = report.groups_split.saturating_add(1);
                report.people_converted = report.people_converted.saturating_add(u64::from(moved));
            }
            Err(e) => warn!(city = %city, group = %id, error = %e, "Conversion split failed"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use dominion_types::{Archetype, CultureId, RealmId};
    use dominion_world::{City, NewGroup, Realm, Religion};

    use super::*;

    const SUN: ReligionId = ReligionId(1);
    const MOON: ReligionId = ReligionId(2);

    fn fixture(state_religion: Option<ReligionId>) -> WorldState {
        let mut world = WorldState::new();
        world.cities.insert(City::new(CityId(1), "Ur", Some(RealmId(1)))).unwrap();
        world.realms.insert(Realm::new(RealmId(1), "Sumer")).unwrap();
        world.realms.set_state_religion(RealmId(1), state_religion).unwrap();
        world.religions.insert(Religion::new(SUN, "Sun", 0.0)).unwrap();
        world.religions.insert(Religion::new(MOON, "Moon", 0.5)).unwrap();
        for (count, religion) in [(1000, Some(MOON)), (1000, None), (300, Some(SUN))] {
            world.population.register_population(NewGroup {
                city: CityId(1),
                archetype: Archetype::Laborer,
                count,
                culture: Some(CultureId(1)),
                religion,
                average_age: 30.0,
            });
        }
        world
    }

    #[test]
    fn resistance_slows_conversion() {
        let mut world = fixture(Some(SUN));
        let report = process_religious_conversion(&mut world, 0.1);
        // Moon: 1000 * 0.1 * 0.5 = 50; unaffiliated: 1000 * 0.1 = 100.
        assert_eq!(report.people_converted, 150);
        assert_eq!(report.groups_split, 2);
        let totals = world.population.religion_totals_in_city(CityId(1));
        assert_eq!(totals.get(&SUN), Some(&450));
        assert_eq!(totals.get(&MOON), Some(&950));
        assert_eq!(world.population.culture_population_in_city(CityId(1), CultureId(1)), 2300);
        assert_eq!(world.cities.get(CityId(1)).unwrap().dominant_religion, Some(MOON));
    }

    #[test]
    fn no_state_religion_means_no_conversion() {
        let mut world = fixture(None);
        assert_eq!(process_religious_conversion(&mut world, 0.1), ConversionReport::default());
    }
}
