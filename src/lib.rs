//! Framekit: Frame-Based Knowledge Representation
//!
//! Named frames hold named slots; each slot carries a small map of facets: a
//! current value, a default, descriptive metadata like units and bounds, and
//! optionally attached behavior. Reads resolve values on demand through
//! `if_needed` computations with memoization; writes fire `if_added` and
//! `if_removed` triggers. A registry aggregates the frame population, which
//! round-trips to JSON documents minus the attached behavior.
//!
//! ```
//! use framekit::{FrameRegistry, Slot};
//! use serde_json::json;
//!
//! let registry = FrameRegistry::new();
//! let rect = registry.assert_frame("rect");
//! rect.add_slot("width", Slot::value(10))
//!     .add_slot("height", Slot::value(5))
//!     .add_slot(
//!         "area",
//!         Slot::computed(|f| {
//!             let w = f.get("width").and_then(|d| d.as_i64()).unwrap_or(0);
//!             let h = f.get("height").and_then(|d| d.as_i64()).unwrap_or(0);
//!             json!(w * h)
//!         }),
//!     );
//!
//! assert_eq!(rect.get("area"), Some(json!(50)));
//! ```

pub mod error;
pub mod facet;
pub mod frame;
pub mod logging;
pub mod persist;
pub mod registry;
pub mod report;
pub mod schema;

pub use error::FrameError;
pub use facet::{Datum, FacetValue, Slot};
pub use frame::Frame;
pub use registry::FrameRegistry;
