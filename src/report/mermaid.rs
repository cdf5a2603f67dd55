//! Mermaid diagram generation for a single frame.

use crate::facet::{self, Datum, FacetValue, Slot};
use crate::registry::FrameRegistry;

use super::{datum_label, SLOT_INSTANCE_OF, SLOT_PROTOTYPE};

/// Facets drawn as their own leaf nodes under a slot.
const LEAF_FACETS: [&str; 3] = ["units", "min", "max"];

/// Generate Mermaid diagram code for one frame.
///
/// The function:
/// 1. Emits a styled root node for the frame (or a stub graph when the frame
///    is unknown)
/// 2. Emits one node per slot, labeled with its plain `value` (or `default`)
///    datum when one is present
/// 3. Hangs `units`/`min`/`max` facets off their slot as leaf nodes
/// 4. With `max_depth > 1`, draws a dashed edge from the parent frame named
///    by a `prototype` or `instance_of` slot
pub fn frame_to_mermaid(registry: &FrameRegistry, frame_name: &str, max_depth: usize) -> String {
    let Some(frame) = registry.lookup(frame_name) else {
        return format!("graph LR\n    {frame_name}[Frame not found]");
    };

    let mut lines = vec!["graph TD".to_string()];
    lines.push(format!("    {frame_name}[\"{frame_name}<br/>Frame\"]"));
    lines.push(format!(
        "    style {frame_name} fill:#f9f,stroke:#333,stroke-width:4px"
    ));

    // Step 1: one node per slot, with leaf nodes for display facets
    for (slot_name, slot) in frame.snapshot() {
        let slot_id = format!("{frame_name}_{slot_name}");
        let mut slot_label = slot_name.clone();
        if let Some(shown) = display_value(&slot) {
            slot_label.push_str(&format!("<br/>= {shown}"));
        }

        lines.push(format!("    {slot_id}[\"{slot_label}\"]"));
        lines.push(format!("    {frame_name} --> {slot_id}"));

        for facet_name in LEAF_FACETS {
            if let Some(datum) = slot.datum(facet_name) {
                let facet_id = format!("{slot_id}_{facet_name}");
                lines.push(format!(
                    "    {facet_id}[\"{facet_name}: {}\"]",
                    datum_label(datum)
                ));
                lines.push(format!("    {slot_id} --> {facet_id}"));
                lines.push(format!(
                    "    style {facet_id} fill:#ffd,stroke:#333,stroke-width:1px"
                ));
            }
        }
    }

    // Step 2: dashed inheritance edge from the parent frame
    if max_depth > 1 && (frame.has_slot(SLOT_PROTOTYPE) || frame.has_slot(SLOT_INSTANCE_OF)) {
        let parent = frame
            .get(SLOT_PROTOTYPE)
            .or_else(|| frame.get(SLOT_INSTANCE_OF));
        if let Some(parent) = parent.as_ref().and_then(Datum::as_str) {
            lines.push(format!("    {parent}[\"{parent}<br/>Parent Frame\"]"));
            lines.push(format!("    {parent} -.-> {frame_name}"));
            lines.push(format!(
                "    style {parent} fill:#9ff,stroke:#333,stroke-width:2px"
            ));
        }
    }

    lines.join("\n")
}

/// The datum shown on a slot's node: a present `value` wins, an absent one
/// falls back to `default`. Null and behavior read as nothing to show.
fn display_value(slot: &Slot) -> Option<String> {
    match slot.get(facet::VALUE) {
        Some(FacetValue::Datum(d)) if !d.is_null() => Some(datum_label(d)),
        Some(_) => None,
        None => match slot.get(facet::DEFAULT) {
            Some(FacetValue::Datum(d)) if !d.is_null() => Some(datum_label(d)),
            _ => None,
        },
    }
}
