//! Read-only reporting over frame populations.
//!
//! Everything here consumes frames through their public read surface:
//! diagram generation, CSV export, slot search, and population statistics.
//! Nothing in this module mutates slots, with one deliberate exception:
//! resolving an inheritance edge reads `prototype`/`instance_of` through the
//! access protocol, which may run and cache an attached computation.

mod csv;
mod dot;
mod mermaid;
mod stats;

pub use csv::{export_csv, frames_to_csv};
pub use dot::frames_to_dot;
pub use mermaid::frame_to_mermaid;
pub use stats::{registry_stats, RegistryStats};

use crate::facet::Datum;
use crate::registry::FrameRegistry;

/// Slot naming a frame's prototype parent.
pub const SLOT_PROTOTYPE: &str = "prototype";
/// Alternative slot naming a frame's parent.
pub const SLOT_INSTANCE_OF: &str = "instance_of";

/// Find all frames that have a specific slot, in sorted name order.
///
/// With `facet_name`, only frames whose slot carries that facet match;
/// behavior facets count.
pub fn frames_with_slot(
    registry: &FrameRegistry,
    slot: &str,
    facet_name: Option<&str>,
) -> Vec<String> {
    registry
        .names()
        .into_iter()
        .filter(|name| {
            registry.lookup(name).is_some_and(|frame| match facet_name {
                Some(f) => frame.facet(slot, f).is_some(),
                None => frame.has_slot(slot),
            })
        })
        .collect()
}

/// Render a datum for human-facing output: strings bare, everything else as
/// compact JSON.
pub(crate) fn datum_label(datum: &Datum) -> String {
    match datum {
        Datum::String(s) => s.clone(),
        other => other.to_string(),
    }
}
