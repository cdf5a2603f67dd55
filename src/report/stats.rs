//! Population statistics.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::registry::FrameRegistry;

/// Aggregate counts over every frame in a registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryStats {
    pub total_frames: usize,
    pub total_slots: usize,
    pub total_facets: usize,
    pub avg_slots_per_frame: f64,
    /// Occurrence count per facet name, behavior facets included.
    pub facet_counts: BTreeMap<String, usize>,
}

/// Walk the whole population and count frames, slots, and facets.
pub fn registry_stats(registry: &FrameRegistry) -> RegistryStats {
    let names = registry.names();
    let mut total_slots = 0;
    let mut total_facets = 0;
    let mut facet_counts: BTreeMap<String, usize> = BTreeMap::new();

    for name in &names {
        let Some(frame) = registry.lookup(name) else {
            continue;
        };
        let snapshot = frame.snapshot();
        total_slots += snapshot.len();
        for slot in snapshot.values() {
            total_facets += slot.len();
            for (facet_name, _) in slot.iter() {
                *facet_counts.entry(facet_name.clone()).or_insert(0) += 1;
            }
        }
    }

    let total_frames = names.len();
    RegistryStats {
        total_frames,
        total_slots,
        total_facets,
        avg_slots_per_frame: if total_frames > 0 {
            total_slots as f64 / total_frames as f64
        } else {
            0.0
        },
        facet_counts,
    }
}
