//! Yearly cultural assimilation.
//!
//! Every city whose dominant culture differs from its controlling realm's
//! leader culture loses a fixed fraction of each non-matching group to the
//! leader's culture. Conversion splits groups rather than relabeling them,
//! so the converts keep their archetype, age and standing.

use dominion_types::{CityId, CultureId};
use dominion_world::WorldState;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Outcome of one assimilation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssimilationReport {
    /// Cities where assimilation pressure applied.
    pub cities_affected: u32,
    /// Groups that lost members.
    pub groups_split: u32,
    /// People who changed culture.
    pub people_converted: u64,
}

/// `floor(count * rate)` with `rate` clamped to `[0, 1]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // result is within 0..=count
pub(crate) fn share_of(count: u32, rate: f64) -> u32 {
    let rate = if rate.is_finite() { rate.clamp(0.0, 1.0) } else { 0.0 };
    let moved = (f64::from(count) * rate).floor();
    (moved as u32).min(count)
}

/// Run one year of assimilation over every city.
pub fn process_culture_assimilation(world: &mut WorldState, rate: f64) -> AssimilationReport {
    let mut report = AssimilationReport::default();
    for city in world.cities.ids() {
        let Some(leader) = assimilation_target(world, city) else {
            continue;
        };
        let converted = assimilate_city(world, city, leader, rate);
        if converted.0 > 0 {
            report.cities_affected = report.cities_affected.saturating_add(1);
            report.groups_split = report.groups_split.saturating_add(converted.0);
            report.people_converted = report.people_converted.saturating_add(converted.1);
        }
        world.refresh_city_dominance(city);
    }
    if report.people_converted > 0 {
        info!(
            cities = report.cities_affected,
            groups = report.groups_split,
            people = report.people_converted,
            "Cultural assimilation applied"
        );
    }
    report
}

/// Leader culture of the realm controlling `city`, if it differs from the
/// city's dominant culture.
fn assimilation_target(world: &WorldState, city: CityId) -> Option<CultureId> {
    let realm = world.cities.controlling_realm(city)?;
    let leader = world.realms.leader_culture(realm)?;
    let dominant = world.population.dominant_culture(city);
    if dominant == Some(leader) {
        return None;
    }
    Some(leader)
}

/// Split every non-matching group of `city` toward `leader`.
///
/// Returns `(groups split, people moved)`.
fn assimilate_city(world: &mut WorldState, city: CityId, leader: CultureId, rate: f64) -> (u32, u64) {
    let mut groups_split = 0_u32;
    let mut people = 0_u64;
    for id in world.population.group_ids_in_city(city) {
        let Some(group) = world.population.group(id) else {
            continue;
        };
        let Some(culture) = group.culture() else {
            continue;
        };
        if culture == leader {
            continue;
        }
        let moved = share_of(group.count(), rate);
        if moved == 0 {
            continue;
        }
        match world.population.split_group(id, moved, Some(leader), None) {
            Ok(new_group) => {
                debug!(
                    city = %city,
                    source = %id,
                    new_group = %new_group,
                    from = %culture,
                    to = %leader,
                    moved,
                    "Group assimilated"
                );
                groups_split = groups_split.saturating_add(1);
                people = people.saturating_add(u64::from(moved));
            }
            Err(e) => warn!(city = %city, group = %id, error = %e, "Assimilation split failed"),
        }
    }
    (groups_split, people)
}
