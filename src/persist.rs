//! Persistence codec: JSON round-trip for frame populations.
//!
//! Frames serialize to a single JSON document keyed by frame name. Behavior
//! facets do not survive the round trip: they are omitted on save (or written
//! as opaque `"<function ...>"` placeholder strings on request) and stripped
//! on load. Loading replays no triggers and runs no computations; it restores
//! plain datums only. Callers re-attach behavior after loading.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::FrameError;
use crate::facet::{Datum, FacetValue, Slot};
use crate::frame::Frame;
use crate::registry::FrameRegistry;

/// Prefix marking a serialized behavior placeholder. Any string facet
/// starting with this is dropped on load.
pub const FUNCTION_PLACEHOLDER: &str = "<function";

/// Serialized form of a single frame: name plus slot/facet/datum nesting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameDoc {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, BTreeMap<String, Datum>>,
}

/// Serialized frame population, keyed by frame name.
///
/// The outer key is authoritative on load; each entry's inner `name` field is
/// informational only.
pub type Document = BTreeMap<String, FrameDoc>;

/// What a load did: frames restored and behavior placeholders dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub frames: usize,
    pub dropped_facets: usize,
}

/// Render one frame as a document entry.
///
/// Behavior facets are omitted unless `include_behavior`, in which case they
/// appear as `"<function if_needed>"`-style placeholder strings.
pub fn frame_doc(frame: &Frame, include_behavior: bool) -> FrameDoc {
    let mut slots = BTreeMap::new();
    for (slot_name, slot) in frame.snapshot() {
        let mut facets = BTreeMap::new();
        for (facet_name, value) in slot.iter() {
            match value {
                FacetValue::Datum(datum) => {
                    facets.insert(facet_name.clone(), datum.clone());
                }
                behavior => {
                    if include_behavior {
                        if let Some(kind) = behavior.behavior_kind() {
                            facets.insert(
                                facet_name.clone(),
                                Datum::String(format!("{FUNCTION_PLACEHOLDER} {kind}>")),
                            );
                        }
                    }
                }
            }
        }
        slots.insert(slot_name, facets);
    }
    FrameDoc {
        name: frame.name().to_string(),
        slots,
    }
}

/// Render a registry's frames as a document, behavior omitted.
///
/// With `names`, only the named frames are included; unknown names are
/// skipped. Without, the whole population is included.
pub fn to_document(registry: &FrameRegistry, names: Option<&[&str]>) -> Document {
    let selected: Vec<Frame> = match names {
        Some(names) => names.iter().filter_map(|n| registry.lookup(n)).collect(),
        None => registry
            .names()
            .iter()
            .filter_map(|n| registry.lookup(n))
            .collect(),
    };

    selected
        .iter()
        .map(|frame| (frame.name().to_string(), frame_doc(frame, false)))
        .collect()
}

/// Restore a document's frames into the registry.
///
/// Each entry becomes a fresh frame registered under its document key,
/// replacing any same-named frame. String facets that look like serialized
/// behavior placeholders are dropped and counted; a slot left with no facets
/// still exists, empty.
pub fn from_document(registry: &FrameRegistry, document: &Document) -> LoadReport {
    let mut dropped = 0;
    for (name, doc) in document {
        let frame = registry.assert_frame(name.clone());
        for (slot_name, facets) in &doc.slots {
            let mut slot = Slot::new();
            for (facet_name, datum) in facets {
                if is_placeholder(datum) {
                    dropped += 1;
                    continue;
                }
                slot = slot.facet(facet_name.clone(), datum.clone());
            }
            frame.add_slot(slot_name.clone(), slot);
        }
    }

    if dropped > 0 {
        warn!(
            dropped_facets = dropped,
            "dropped serialized behavior placeholders; re-attach computations and triggers"
        );
    }

    LoadReport {
        frames: document.len(),
        dropped_facets: dropped,
    }
}

/// Save frames to a JSON file, whole population or a named subset.
///
/// The write is atomic: content lands in a sibling `.tmp` file first, then
/// renames over the destination. Returns the number of frames written.
pub fn save_frames(
    registry: &FrameRegistry,
    path: impl AsRef<Path>,
    names: Option<&[&str]>,
) -> Result<usize, FrameError> {
    let path = path.as_ref();
    let document = to_document(registry, names);
    let json = serde_json::to_string_pretty(&document)?;
    write_atomic(path, &json)?;

    info!(frames = document.len(), path = %path.display(), "saved frame population");
    Ok(document.len())
}

/// Write a file atomically: temp sibling first, then rename over the target.
pub(crate) fn write_atomic(path: &Path, contents: &str) -> Result<(), FrameError> {
    let temp_path = sibling_temp_path(path);
    fs::write(&temp_path, contents)?;
    if let Err(e) = fs::rename(&temp_path, path) {
        // Clean up temp file on error
        let _ = fs::remove_file(&temp_path);
        return Err(e.into());
    }
    Ok(())
}

/// Load frames from a JSON file into the registry.
///
/// Missing files and malformed documents are errors; placeholder facets are
/// dropped and reported, never fatal.
pub fn load_frames(
    registry: &FrameRegistry,
    path: impl AsRef<Path>,
) -> Result<LoadReport, FrameError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let document: Document = serde_json::from_str(&raw)?;
    let report = from_document(registry, &document);

    info!(frames = report.frames, path = %path.display(), "loaded frame population");
    Ok(report)
}

fn is_placeholder(datum: &Datum) -> bool {
    matches!(datum, Datum::String(s) if s.starts_with(FUNCTION_PLACEHOLDER))
}

fn sibling_temp_path(path: &Path) -> PathBuf {
    let mut temp: OsString = path.as_os_str().to_owned();
    temp.push(".tmp");
    PathBuf::from(temp)
}
