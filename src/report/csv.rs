//! CSV export of frame populations.

use std::path::Path;

use tracing::info;

use crate::error::FrameError;
use crate::persist::write_atomic;
use crate::registry::FrameRegistry;

use super::datum_label;

const HEADER: &str = "Frame,Slot,Facet,Value";

/// Render frames as CSV text, one row per datum facet.
///
/// Rows are sorted by frame, then slot, then facet. Behavior facets are
/// skipped. With `names`, only the named frames are exported; unknown names
/// are skipped.
pub fn frames_to_csv(registry: &FrameRegistry, names: Option<&[&str]>) -> String {
    let names: Vec<String> = match names {
        Some(names) => {
            let mut names: Vec<String> = names.iter().map(|n| n.to_string()).collect();
            names.sort();
            names
        }
        None => registry.names(),
    };

    let mut lines = vec![HEADER.to_string()];
    for frame_name in &names {
        let Some(frame) = registry.lookup(frame_name) else {
            continue;
        };
        for (slot_name, slot) in frame.snapshot() {
            for (facet_name, value) in slot.iter() {
                let Some(datum) = value.as_datum() else {
                    continue;
                };
                lines.push(
                    [
                        frame_name.as_str(),
                        slot_name.as_str(),
                        facet_name.as_str(),
                        &datum_label(datum),
                    ]
                    .map(csv_field)
                    .join(","),
                );
            }
        }
    }

    lines.join("\n") + "\n"
}

/// Export frames to a CSV file. Returns the number of data rows written.
///
/// The write is atomic, the same temp-then-rename discipline the frame
/// document save uses.
pub fn export_csv(
    registry: &FrameRegistry,
    path: impl AsRef<Path>,
    names: Option<&[&str]>,
) -> Result<usize, FrameError> {
    let path = path.as_ref();
    let csv = frames_to_csv(registry, names);
    write_atomic(path, &csv)?;

    let rows = csv.lines().count().saturating_sub(1);
    info!(rows, path = %path.display(), "exported frames to CSV");
    Ok(rows)
}

/// Quote a field when it contains a comma, quote, or newline; embedded
/// quotes double.
fn csv_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
