//! Monthly distribution of building output to culture tech trees.
//!
//! Each productive building produces its definition's monthly XP. That XP
//! goes to the definition's tree type and is split among the cultures living
//! in the building's city in proportion to their head counts. XP from a
//! city with no cultured population is discarded.

use dominion_world::{BuildingSource, WorldState};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::culture::CultureRegistry;

/// Outcome of one distribution pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct XpReport {
    /// Productive buildings that generated XP.
    pub buildings_counted: u32,
    /// XP credited to culture trees.
    pub xp_distributed: f64,
    /// XP lost because nobody with a culture lived in the city.
    pub xp_discarded: f64,
}

#[allow(clippy::cast_precision_loss)] // head counts stay far below 2^52
const fn head_count(n: u64) -> f64 {
    n as f64
}

/// Credit one month of building output to culture trees.
pub fn distribute_building_xp(world: &WorldState, cultures: &mut CultureRegistry) -> XpReport {
    let mut report = XpReport::default();
    for instance in world.buildings.building_instances() {
        if !instance.is_productive() {
            continue;
        }
        let Some(definition) = world.buildings.definition(instance.definition) else {
            warn!(building = %instance.id, definition = %instance.definition, "Building with unknown definition skipped");
            continue;
        };
        let xp = definition.monthly_xp(&instance.workers);
        report.buildings_counted = report.buildings_counted.saturating_add(1);

        let shares = world.population.culture_totals_in_city(instance.city);
        let total: u64 = shares.values().sum();
        if total == 0 {
            debug!(building = %instance.id, city = %instance.city, xp, "No culture to credit, XP discarded");
            report.xp_discarded += xp;
            continue;
        }

        for (culture, count) in shares {
            let amount = xp * head_count(count) / head_count(total);
            if cultures.add_xp(culture, definition.tree_type, amount) {
                report.xp_distributed += amount;
            } else {
                report.xp_discarded += amount;
            }
        }
    }
    debug!(
        buildings = report.buildings_counted,
        distributed = report.xp_distributed,
        discarded = report.xp_discarded,
        "Building XP distributed"
    );
    report
}
