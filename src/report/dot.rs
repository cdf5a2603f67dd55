//! Graphviz DOT generation for a set of frames.

use crate::facet::{self, FacetValue, Slot};
use crate::registry::FrameRegistry;

use super::{datum_label, SLOT_INSTANCE_OF, SLOT_PROTOTYPE};

/// Slot rows shown per frame node before eliding the rest.
const MAX_SLOT_ROWS: usize = 5;

/// Generate Graphviz DOT code for frame visualization.
///
/// The function:
/// 1. Emits one record node per frame, its label listing up to five
///    slot/value rows with an overflow marker
/// 2. Skips slots whose shown facet holds behavior; slots with neither
///    `value` nor `default` show `?`
/// 3. Draws a dashed edge from each parent named by `prototype` or
///    `instance_of`
///
/// With `names`, only the named frames are drawn; unknown names are skipped.
pub fn frames_to_dot(registry: &FrameRegistry, names: Option<&[&str]>) -> String {
    let names: Vec<String> = match names {
        Some(names) => names.iter().map(|n| n.to_string()).collect(),
        None => registry.names(),
    };

    let mut lines = vec![
        "digraph FrameSystem {".to_string(),
        "    rankdir=LR;".to_string(),
        "    node [shape=record];".to_string(),
    ];

    for frame_name in &names {
        let Some(frame) = registry.lookup(frame_name) else {
            continue;
        };

        // Step 1: build the record label from slot/value rows
        let mut rows = Vec::new();
        for (slot_name, slot) in frame.snapshot() {
            if let Some(shown) = row_value(&slot) {
                rows.push(format!("{slot_name}: {shown}"));
            }
        }

        let mut label = format!("{frame_name}|{}", rows[..rows.len().min(MAX_SLOT_ROWS)].join("\\n"));
        if rows.len() > MAX_SLOT_ROWS {
            label.push_str(&format!("\\n... +{} more", rows.len() - MAX_SLOT_ROWS));
        }
        lines.push(format!("    \"{frame_name}\" [label=\"{label}\"];"));

        // Step 2: dashed inheritance edges
        for slot in [SLOT_PROTOTYPE, SLOT_INSTANCE_OF] {
            if frame.has_slot(slot) {
                if let Some(parent) = frame.get(slot) {
                    lines.push(format!(
                        "    \"{}\" -> \"{frame_name}\" [style=dashed];",
                        datum_label(&parent)
                    ));
                }
            }
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// The datum shown on a slot's row. Behavior rows are skipped; a slot with
/// neither `value` nor `default` shows a `?` placeholder.
fn row_value(slot: &Slot) -> Option<String> {
    match slot.get(facet::VALUE) {
        Some(FacetValue::Datum(d)) => Some(datum_label(d)),
        Some(_) => None,
        None => match slot.get(facet::DEFAULT) {
            Some(FacetValue::Datum(d)) => Some(datum_label(d)),
            Some(_) => None,
            None => Some("?".to_string()),
        },
    }
}
