//! Schema validation for frames.
//!
//! A schema is a map of slot name to [`SlotRule`]. Validation walks the
//! rules against a frame's raw facets and returns human-readable findings,
//! empty when the frame conforms. Rules look at stored datums only: no
//! computation runs and no default substitutes during validation.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::facet::{self, Datum};
use crate::registry::FrameRegistry;

/// JSON datum kinds for `expected_kind` checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    pub fn of(datum: &Datum) -> ValueKind {
        match datum {
            Datum::Null => ValueKind::Null,
            Datum::Bool(_) => ValueKind::Bool,
            Datum::Number(_) => ValueKind::Number,
            Datum::String(_) => ValueKind::String,
            Datum::Array(_) => ValueKind::Array,
            Datum::Object(_) => ValueKind::Object,
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "bool",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

/// Requirements for one slot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlotRule {
    /// The slot must exist on the frame.
    #[serde(default)]
    pub required: bool,

    /// Facet names the slot must carry; behavior facets count.
    #[serde(default)]
    pub required_facets: Vec<String>,

    /// Kind the stored `value` datum must have, checked only when a non-null
    /// datum is present.
    #[serde(default)]
    pub expected_kind: Option<ValueKind>,
}

impl SlotRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_facets<I, S>(mut self, facets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_facets = facets.into_iter().map(Into::into).collect();
        self
    }

    pub fn of_kind(mut self, kind: ValueKind) -> Self {
        self.expected_kind = Some(kind);
        self
    }
}

/// Schema: requirements keyed by slot name.
pub type FrameSchema = BTreeMap<String, SlotRule>;

/// Validate a frame against a schema.
///
/// Returns one finding per violation, empty when the frame conforms. An
/// unknown frame is itself the single finding.
pub fn validate_frame(
    registry: &FrameRegistry,
    frame_name: &str,
    schema: &FrameSchema,
) -> Vec<String> {
    let Some(frame) = registry.lookup(frame_name) else {
        return vec![format!("Frame '{frame_name}' not found")];
    };

    let snapshot = frame.snapshot();
    let mut findings = Vec::new();

    for (slot_name, rule) in schema {
        let Some(slot) = snapshot.get(slot_name) else {
            if rule.required {
                findings.push(format!("Missing required slot: {slot_name}"));
            }
            continue;
        };

        for facet_name in &rule.required_facets {
            if !slot.contains(facet_name) {
                findings.push(format!(
                    "Slot '{slot_name}' missing required facet: {facet_name}"
                ));
            }
        }

        if let Some(expected) = rule.expected_kind {
            if let Some(datum) = slot.datum(facet::VALUE) {
                let actual = ValueKind::of(datum);
                if actual != ValueKind::Null && actual != expected {
                    findings.push(format!(
                        "Slot '{slot_name}' value has wrong kind: expected {expected}, got {actual}"
                    ));
                }
            }
        }
    }

    findings
}
