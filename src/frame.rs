//! Frames: named records of slots with facet-level behavior.
//!
//! A `Frame` is a cheap-clone handle over shared slot state. Reads and writes
//! go through the access protocol: reads resolve `value` with lazy
//! `if_needed` computation and `default` fallback, writes to `value` fire at
//! most one attached trigger. No lock is held while caller code runs, so
//! computations and triggers may freely read or write frames, including the
//! one that invoked them.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::facet::{self, Datum, FacetValue, IfAddedFn, IfNeededFn, IfRemovedFn, Slot};

/// Named record of slots.
///
/// Clones share state: writes through any handle are visible to all.
#[derive(Clone)]
pub struct Frame {
    inner: Arc<FrameInner>,
}

struct FrameInner {
    name: String,
    slots: RwLock<BTreeMap<String, Slot>>,
}

/// Outcome of the locked phase of a read.
enum Fetch {
    Done(Option<Datum>),
    Compute(IfNeededFn),
}

/// Trigger selected during the locked phase of a write, invoked after the
/// lock is released.
enum Dispatch {
    Added(IfAddedFn, Option<Datum>),
    Removed(IfRemovedFn, Option<Datum>),
}

impl Frame {
    /// Create a detached frame with no slots.
    ///
    /// The frame is not known to any registry until registered; see
    /// [`FrameRegistry::assert_frame`](crate::registry::FrameRegistry::assert_frame)
    /// for the registered constructor.
    pub fn new(name: impl Into<String>) -> Self {
        Frame {
            inner: Arc::new(FrameInner {
                name: name.into(),
                slots: RwLock::new(BTreeMap::new()),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Add a slot, or fold facets into an existing slot of the same name.
    ///
    /// Facets named in `facets` replace same-named facets on the slot; facets
    /// not named are kept unchanged. Returns `&Self` for chaining.
    pub fn add_slot(&self, slot: impl Into<String>, facets: Slot) -> &Self {
        let mut slots = self.inner.slots.write();
        slots.entry(slot.into()).or_default().merge(facets);
        drop(slots);
        self
    }

    /// Read a slot's resolved `value` datum.
    ///
    /// Shorthand for [`get_facet`](Self::get_facet) with the `value` facet.
    pub fn get(&self, slot: &str) -> Option<Datum> {
        self.get_facet(slot, facet::VALUE)
    }

    /// Read one facet of a slot.
    ///
    /// Absent slots and absent facets read as `None`; so do null datums. For
    /// the `value` facet two extra rules apply:
    ///
    /// - If the `value` facet is absent (not merely null) and the slot
    ///   carries an `if_needed` computation, the computation runs with the
    ///   lock released, its result is cached into `value`, and that result is
    ///   the read's answer. A cached result, null included, is never
    ///   recomputed.
    /// - On the plain lookup path, a null or absent `value` falls back to the
    ///   `default` facet. The fallback is never cached.
    ///
    /// Behavior facets read as `None`; they are reachable through
    /// [`facet`](Self::facet) and [`snapshot`](Self::snapshot).
    pub fn get_facet(&self, slot: &str, facet_name: &str) -> Option<Datum> {
        let fetch = {
            let slots = self.inner.slots.read();
            let entry = slots.get(slot)?;
            if facet_name == facet::VALUE && !entry.contains(facet::VALUE) {
                match entry.get(facet::IF_NEEDED) {
                    Some(FacetValue::IfNeeded(compute)) => Fetch::Compute(compute.clone()),
                    _ => Fetch::Done(resolve(entry, facet_name)),
                }
            } else {
                Fetch::Done(resolve(entry, facet_name))
            }
        };

        match fetch {
            Fetch::Done(datum) => datum,
            Fetch::Compute(compute) => {
                let computed = compute(self);
                let mut slots = self.inner.slots.write();
                if let Some(entry) = slots.get_mut(slot) {
                    entry.insert(facet::VALUE, FacetValue::Datum(computed.clone()));
                }
                (!computed.is_null()).then_some(computed)
            }
        }
    }

    /// Write a slot's `value` facet.
    ///
    /// Shorthand for [`put_facet`](Self::put_facet) with the `value` facet.
    pub fn put(&self, slot: &str, datum: impl Into<Datum>) {
        self.put_facet(slot, facet::VALUE, datum)
    }

    /// Write one facet of a slot, creating the slot if absent.
    ///
    /// Writes to the `value` facet fire at most one trigger after the lock is
    /// released: `if_added` when the new datum is non-null, `if_removed` when
    /// it is null. Both receive the facet's previous datum, `None` when there
    /// was none. Writes to any other facet never fire triggers.
    pub fn put_facet(&self, slot: &str, facet_name: &str, datum: impl Into<Datum>) {
        let datum = datum.into();
        let dispatch = {
            let mut slots = self.inner.slots.write();
            let entry = slots.entry(slot.to_string()).or_default();
            let previous = entry.datum(facet_name).cloned();
            entry.insert(facet_name, FacetValue::Datum(datum.clone()));
            if facet_name != facet::VALUE {
                None
            } else if !datum.is_null() {
                match entry.get(facet::IF_ADDED) {
                    Some(FacetValue::IfAdded(trigger)) => {
                        Some(Dispatch::Added(trigger.clone(), previous))
                    }
                    _ => None,
                }
            } else {
                match entry.get(facet::IF_REMOVED) {
                    Some(FacetValue::IfRemoved(trigger)) => {
                        Some(Dispatch::Removed(trigger.clone(), previous))
                    }
                    _ => None,
                }
            }
        };

        match dispatch {
            Some(Dispatch::Added(run, previous)) => run(self, previous.as_ref(), &datum),
            Some(Dispatch::Removed(run, previous)) => run(self, previous.as_ref()),
            None => {}
        }
    }

    /// Remove a whole slot. Returns whether it existed. No triggers fire.
    pub fn remove_slot(&self, slot: &str) -> bool {
        self.inner.slots.write().remove(slot).is_some()
    }

    /// Remove one facet from a slot. Returns whether it existed.
    ///
    /// Clearing `value` is the cache-invalidation path for computed slots:
    /// the next read runs `if_needed` again. Deletion is not a write, so no
    /// trigger fires.
    pub fn clear_facet(&self, slot: &str, facet_name: &str) -> bool {
        let mut slots = self.inner.slots.write();
        match slots.get_mut(slot) {
            Some(entry) => entry.remove(facet_name).is_some(),
            None => false,
        }
    }

    pub fn has_slot(&self, slot: &str) -> bool {
        self.inner.slots.read().contains_key(slot)
    }

    /// Slot names in sorted order.
    pub fn slot_names(&self) -> Vec<String> {
        self.inner.slots.read().keys().cloned().collect()
    }

    pub fn slot_count(&self) -> usize {
        self.inner.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slots.read().is_empty()
    }

    /// Raw facet lookup, behavior included. Bypasses the access protocol:
    /// no computation, no default fallback, no null filtering.
    pub fn facet(&self, slot: &str, facet_name: &str) -> Option<FacetValue> {
        self.inner.slots.read().get(slot)?.get(facet_name).cloned()
    }

    /// Point-in-time copy of all slots, behavior facets included.
    pub fn snapshot(&self) -> BTreeMap<String, Slot> {
        self.inner.slots.read().clone()
    }

    /// Human-readable listing of every slot and facet.
    ///
    /// Behavior facets render as an opaque `<function>` marker.
    pub fn describe(&self) -> String {
        let slots = self.inner.slots.read();
        let mut lines = vec![
            format!("Frame: {}", self.inner.name),
            "=".repeat(self.inner.name.len() + 7),
        ];
        for (slot_name, slot) in slots.iter() {
            lines.push(format!("\n  {slot_name}:"));
            for (facet_name, value) in slot.iter() {
                lines.push(format!("    {facet_name}: {value}"));
            }
        }
        lines.join("\n")
    }
}

/// Resolve a facet read against one slot: datums only, nulls read as absent,
/// `value` falls back to `default`.
fn resolve(entry: &Slot, facet_name: &str) -> Option<Datum> {
    let mut found = entry.datum(facet_name).filter(|d| !d.is_null());
    if found.is_none() && facet_name == facet::VALUE {
        found = entry.datum(facet::DEFAULT).filter(|d| !d.is_null());
    }
    found.cloned()
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frame({:?}, {} slots)",
            self.inner.name,
            self.inner.slots.read().len()
        )
    }
}
