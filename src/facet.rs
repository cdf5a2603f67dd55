//! Slot facets: plain datums, descriptive metadata, and attached behavior.
//!
//! A slot is a small named map of facets. Five facet names are recognized by
//! the access protocol (`value`, `default`, `if_needed`, `if_added`,
//! `if_removed`); every other name is inert metadata carried alongside the
//! value, such as `units` or numeric bounds. There is no fixed schema.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::frame::Frame;

/// JSON datum carried by a facet.
pub type Datum = serde_json::Value;

/// Facet holding the slot's current datum.
pub const VALUE: &str = "value";
/// Fallback facet consulted when `value` resolves to nothing.
pub const DEFAULT: &str = "default";
/// Lazy computation facet. Its result is cached into `value` on first read.
pub const IF_NEEDED: &str = "if_needed";
/// Trigger facet fired after `value` is written to a non-null datum.
pub const IF_ADDED: &str = "if_added";
/// Trigger facet fired after `value` is written to null.
pub const IF_REMOVED: &str = "if_removed";

/// Computation attached via `if_needed`. Receives the owning frame.
pub type IfNeededFn = Arc<dyn Fn(&Frame) -> Datum + Send + Sync>;
/// Trigger attached via `if_added`: (frame, previous datum, new datum).
pub type IfAddedFn = Arc<dyn Fn(&Frame, Option<&Datum>, &Datum) + Send + Sync>;
/// Trigger attached via `if_removed`: (frame, previous datum).
pub type IfRemovedFn = Arc<dyn Fn(&Frame, Option<&Datum>) + Send + Sync>;

/// A single facet value: a plain JSON datum or attached behavior.
///
/// Behavior variants are invisible to the datum read path and to the
/// persistence codec; only the access protocol invokes them.
#[derive(Clone)]
pub enum FacetValue {
    /// Plain JSON datum (`value`, `default`, `units`, bounds, ...).
    Datum(Datum),
    /// Lazy computation invoked when `value` is read while absent.
    IfNeeded(IfNeededFn),
    /// Trigger invoked after a non-null `value` write.
    IfAdded(IfAddedFn),
    /// Trigger invoked after a null `value` write.
    IfRemoved(IfRemovedFn),
}

impl FacetValue {
    /// The plain datum, if this facet holds one.
    pub fn as_datum(&self) -> Option<&Datum> {
        match self {
            FacetValue::Datum(d) => Some(d),
            _ => None,
        }
    }

    /// Whether this facet holds attached behavior rather than a datum.
    pub fn is_behavior(&self) -> bool {
        !matches!(self, FacetValue::Datum(_))
    }

    /// Behavior kind name, for diagnostics and serialized placeholders.
    pub fn behavior_kind(&self) -> Option<&'static str> {
        match self {
            FacetValue::Datum(_) => None,
            FacetValue::IfNeeded(_) => Some(IF_NEEDED),
            FacetValue::IfAdded(_) => Some(IF_ADDED),
            FacetValue::IfRemoved(_) => Some(IF_REMOVED),
        }
    }
}

impl From<Datum> for FacetValue {
    fn from(datum: Datum) -> Self {
        FacetValue::Datum(datum)
    }
}

impl fmt::Display for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Datum(Datum::String(s)) => f.write_str(s),
            FacetValue::Datum(d) => write!(f, "{d}"),
            _ => f.write_str("<function>"),
        }
    }
}

impl fmt::Debug for FacetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacetValue::Datum(d) => write!(f, "Datum({d})"),
            FacetValue::IfNeeded(_) => f.write_str("<function if_needed>"),
            FacetValue::IfAdded(_) => f.write_str("<function if_added>"),
            FacetValue::IfRemoved(_) => f.write_str("<function if_removed>"),
        }
    }
}

/// Ordered facet map for one slot.
#[derive(Clone, Default)]
pub struct Slot {
    facets: BTreeMap<String, FacetValue>,
}

impl Slot {
    /// Empty slot with no facets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot carrying just a `value` facet.
    pub fn value(datum: impl Into<Datum>) -> Self {
        Self::new().facet(VALUE, datum)
    }

    /// Slot carrying just an `if_needed` computation.
    pub fn computed(compute: impl Fn(&Frame) -> Datum + Send + Sync + 'static) -> Self {
        Self::new().if_needed(compute)
    }

    /// Set a datum facet, replacing any existing facet of that name.
    pub fn facet(mut self, name: impl Into<String>, datum: impl Into<Datum>) -> Self {
        self.facets
            .insert(name.into(), FacetValue::Datum(datum.into()));
        self
    }

    /// Set the `default` fallback facet.
    pub fn default_to(self, datum: impl Into<Datum>) -> Self {
        self.facet(DEFAULT, datum)
    }

    /// Attach an `if_needed` computation.
    pub fn if_needed(mut self, compute: impl Fn(&Frame) -> Datum + Send + Sync + 'static) -> Self {
        self.facets
            .insert(IF_NEEDED.to_string(), FacetValue::IfNeeded(Arc::new(compute)));
        self
    }

    /// Attach an `if_added` trigger.
    pub fn if_added(
        mut self,
        trigger: impl Fn(&Frame, Option<&Datum>, &Datum) + Send + Sync + 'static,
    ) -> Self {
        self.facets
            .insert(IF_ADDED.to_string(), FacetValue::IfAdded(Arc::new(trigger)));
        self
    }

    /// Attach an `if_removed` trigger.
    pub fn if_removed(
        mut self,
        trigger: impl Fn(&Frame, Option<&Datum>) + Send + Sync + 'static,
    ) -> Self {
        self.facets
            .insert(IF_REMOVED.to_string(), FacetValue::IfRemoved(Arc::new(trigger)));
        self
    }

    /// Raw facet lookup, behavior included.
    pub fn get(&self, name: &str) -> Option<&FacetValue> {
        self.facets.get(name)
    }

    /// Plain-datum facet lookup. Behavior facets read as absent.
    pub fn datum(&self, name: &str) -> Option<&Datum> {
        self.facets.get(name).and_then(FacetValue::as_datum)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.facets.contains_key(name)
    }

    /// Insert one facet, replacing any existing facet of that name.
    pub fn insert(&mut self, name: impl Into<String>, value: FacetValue) -> Option<FacetValue> {
        self.facets.insert(name.into(), value)
    }

    /// Remove one facet.
    pub fn remove(&mut self, name: &str) -> Option<FacetValue> {
        self.facets.remove(name)
    }

    /// Fold another slot's facets into this one. Facets present in `other`
    /// replace same-named facets here; the rest are kept unchanged.
    pub fn merge(&mut self, other: Slot) {
        self.facets.extend(other.facets);
    }

    /// Facets in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FacetValue)> {
        self.facets.iter()
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }
}

impl<'a> IntoIterator for &'a Slot {
    type Item = (&'a String, &'a FacetValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FacetValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.facets.iter()
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.facets.iter()).finish()
    }
}
