//! Frame registry: in-memory aggregate of named frames.
//!
//! The registry is a cheap-clone handle; clones share the same frame table.
//! Computations and triggers that need cross-frame reads capture a clone of
//! the registry they were built against. No registry lock is held while any
//! frame's caller code runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::facet::Datum;
use crate::frame::Frame;

/// Registry of frames, keyed by frame name.
#[derive(Clone, Default)]
pub struct FrameRegistry {
    inner: Arc<RwLock<HashMap<String, Frame>>>,
}

impl FrameRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a frame, register it under its name, and return its handle.
    ///
    /// An existing frame of the same name is replaced; outstanding handles to
    /// the old frame keep working but are no longer reachable by name.
    pub fn assert_frame(&self, name: impl Into<String>) -> Frame {
        let frame = Frame::new(name);
        self.register(frame.clone());
        frame
    }

    /// Register a frame under its own name, replacing any previous holder.
    pub fn register(&self, frame: Frame) {
        self.inner
            .write()
            .insert(frame.name().to_string(), frame);
    }

    /// Look up a frame by name.
    pub fn lookup(&self, name: &str) -> Option<Frame> {
        self.inner.read().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.read().contains_key(name)
    }

    /// Registered frame names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Remove a frame. Returns whether it existed.
    pub fn remove(&self, name: &str) -> bool {
        self.inner.write().remove(name).is_some()
    }

    /// Drop every frame.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Read a slot's resolved `value` through the registry.
    ///
    /// Unknown frames read as `None`, the same soft miss as unknown slots.
    pub fn get(&self, frame: &str, slot: &str) -> Option<Datum> {
        self.lookup(frame)?.get(slot)
    }

    /// Read one facet of a slot through the registry.
    pub fn get_facet(&self, frame: &str, slot: &str, facet_name: &str) -> Option<Datum> {
        self.lookup(frame)?.get_facet(slot, facet_name)
    }

    /// Write a slot's `value` through the registry.
    ///
    /// Returns whether the frame existed; writes to unknown frames are
    /// dropped. Triggers fire exactly as they do for direct frame writes.
    pub fn put(&self, frame: &str, slot: &str, datum: impl Into<Datum>) -> bool {
        match self.lookup(frame) {
            Some(f) => {
                f.put(slot, datum);
                true
            }
            None => false,
        }
    }

    /// Write one facet of a slot through the registry.
    pub fn put_facet(
        &self,
        frame: &str,
        slot: &str,
        facet_name: &str,
        datum: impl Into<Datum>,
    ) -> bool {
        match self.lookup(frame) {
            Some(f) => {
                f.put_facet(slot, facet_name, datum);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for FrameRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FrameRegistry({} frames)", self.inner.read().len())
    }
}
