//! Integration tests for the slot/facet access protocol.

use std::sync::Arc;

use framekit::{facet, Datum, FrameRegistry, Slot};
use parking_lot::Mutex;
use serde_json::json;

/// Test basic frame operations through the registry
#[test]
fn test_basic_operations() {
    let registry = FrameRegistry::new();
    let robot = registry.assert_frame("test-robot");
    robot
        .add_slot("color", Slot::value("blue"))
        .add_slot("height", Slot::value(1.5));

    assert_eq!(registry.get("test-robot", "color"), Some(json!("blue")));
    assert_eq!(registry.get("test-robot", "height"), Some(json!(1.5)));

    // Update value
    registry.put("test-robot", "color", "red");
    assert_eq!(registry.get("test-robot", "color"), Some(json!("red")));

    // Non-existent frame/slot
    assert_eq!(registry.get("no-such-frame", "anything"), None);
    assert_eq!(registry.get("test-robot", "no-such-slot"), None);

    // Frame registry
    assert!(registry.names().contains(&"test-robot".to_string()));

    // Delete frame
    assert!(registry.remove("test-robot"));
    assert!(!registry.contains("test-robot"));
}

/// Test the facet system: metadata facets and default fallback
#[test]
fn test_facets() {
    let registry = FrameRegistry::new();
    let sensor = registry.assert_frame("sensor");
    sensor.add_slot(
        "temperature",
        Slot::value(22.5)
            .facet("units", "celsius")
            .facet("min", -50)
            .facet("max", 100)
            .default_to(20),
    );

    assert_eq!(registry.get("sensor", "temperature"), Some(json!(22.5)));
    assert_eq!(
        registry.get_facet("sensor", "temperature", "units"),
        Some(json!("celsius"))
    );
    assert_eq!(
        registry.get_facet("sensor", "temperature", "min"),
        Some(json!(-50))
    );

    // Remove the value; reads fall back to the default
    assert!(sensor.clear_facet("temperature", facet::VALUE));
    assert_eq!(registry.get("sensor", "temperature"), Some(json!(20)));
}

/// Test if_needed computation and memoization
#[test]
fn test_computed_values() {
    let registry = FrameRegistry::new();
    let compute_count = Arc::new(Mutex::new(0));

    let counter = compute_count.clone();
    let rect = registry.assert_frame("rectangle");
    rect.add_slot("width", Slot::value(10))
        .add_slot("height", Slot::value(5))
        .add_slot(
            "area",
            Slot::computed(move |f| {
                *counter.lock() += 1;
                match (
                    f.get("width").and_then(|d| d.as_i64()),
                    f.get("height").and_then(|d| d.as_i64()),
                ) {
                    (Some(w), Some(h)) => json!(w * h),
                    _ => json!(null),
                }
            }),
        );

    // First access computes
    assert_eq!(registry.get("rectangle", "area"), Some(json!(50)));
    assert_eq!(*compute_count.lock(), 1);

    // Second access uses the cached value
    assert_eq!(registry.get("rectangle", "area"), Some(json!(50)));
    assert_eq!(*compute_count.lock(), 1);
}

/// Test triggers: if_added and if_removed fire with previous values
#[test]
fn test_triggers() {
    let registry = FrameRegistry::new();
    let changes: Arc<Mutex<Vec<(String, Option<Datum>, Option<Datum>)>>> =
        Arc::new(Mutex::new(Vec::new()));

    let added_log = changes.clone();
    let removed_log = changes.clone();
    let device = registry.assert_frame("device");
    device.add_slot(
        "status",
        Slot::value("online")
            .if_added(move |f, old, new| {
                added_log
                    .lock()
                    .push((f.name().to_string(), old.cloned(), Some(new.clone())));
            })
            .if_removed(move |f, old| {
                removed_log.lock().push((f.name().to_string(), old.cloned(), None));
            }),
    );

    // A non-null write fires if_added with the previous value
    registry.put("device", "status", "offline");
    {
        let changes = changes.lock();
        assert_eq!(changes.len(), 1);
        assert_eq!(
            changes[0],
            (
                "device".to_string(),
                Some(json!("online")),
                Some(json!("offline"))
            )
        );
    }

    // A null write fires if_removed only
    registry.put("device", "status", json!(null));
    {
        let changes = changes.lock();
        assert_eq!(changes.len(), 2);
        assert_eq!(
            changes[1],
            ("device".to_string(), Some(json!("offline")), None)
        );
    }

    // Writes to slots without triggers stay silent
    registry.put("device", "label", "lab-3");
    assert_eq!(changes.lock().len(), 2);

    // Writes to non-value facets never fire triggers
    registry.put_facet("device", "status", "units", "state");
    assert_eq!(changes.lock().len(), 2);
}

/// Test that a trigger writing into its own frame does not deadlock
#[test]
fn test_reentrant_trigger_writes() {
    let registry = FrameRegistry::new();
    let device = registry.assert_frame("device");
    device.add_slot(
        "data",
        Slot::value(json!([])).if_added(|f, _, _| {
            f.put("write_count", f.get("write_count").and_then(|d| d.as_i64()).unwrap_or(0) + 1);
        }),
    );

    registry.put("device", "data", json!([1]));
    registry.put("device", "data", json!([1, 2]));
    assert_eq!(registry.get("device", "write_count"), Some(json!(2)));
}

/// Test that a computation reading its own frame does not deadlock
#[test]
fn test_reentrant_computed_reads() {
    let registry = FrameRegistry::new();
    let frame = registry.assert_frame("self-reader");
    frame.add_slot("base", Slot::value(40)).add_slot(
        "doubled",
        Slot::computed(|f| json!(f.get("base").and_then(|d| d.as_i64()).unwrap_or(0) * 2)),
    );

    assert_eq!(frame.get("doubled"), Some(json!(80)));
}

/// Test a smart-home scenario: cross-frame computation plus alert trigger
#[test]
fn test_smart_home_scenario() {
    let registry = FrameRegistry::new();
    let alerts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    // Rooms with a high-temperature alert trigger
    for (room, temp) in [("living-room", 22), ("bedroom", 20), ("kitchen", 25)] {
        let alert_log = alerts.clone();
        registry.assert_frame(room).add_slot(
            "temperature",
            Slot::value(temp).if_added(move |f, _, new| {
                if new.as_i64().is_some_and(|t| t > 30) {
                    alert_log
                        .lock()
                        .push(format!("High temp in {}: {}°C", f.name(), new));
                }
            }),
        );
    }

    // House with a computed average over the rooms
    let rooms = registry.clone();
    registry
        .assert_frame("smart-house")
        .add_slot(
            "average_temp",
            Slot::computed(move |_| {
                let mut total = 0.0;
                let mut count = 0;
                for room in ["living-room", "bedroom", "kitchen"] {
                    if let Some(temp) =
                        rooms.get(room, "temperature").and_then(|d| d.as_f64())
                    {
                        total += temp;
                        count += 1;
                    }
                }
                if count > 0 {
                    json!(total / count as f64)
                } else {
                    json!(null)
                }
            }),
        )
        .add_slot(
            "rooms",
            Slot::value(json!(["living-room", "bedroom", "kitchen"])),
        );

    let avg = registry
        .get("smart-house", "average_temp")
        .and_then(|d| d.as_f64())
        .unwrap();
    assert!((avg - 22.333).abs() < 0.01);

    // Trigger an alert
    registry.put("kitchen", "temperature", 35);
    let alerts = alerts.lock();
    assert_eq!(alerts.len(), 1);
    assert!(alerts[0].contains("High temp in kitchen"));
}

/// Test clearing the registry mid-session
#[test]
fn test_clear_registry() {
    let registry = FrameRegistry::new();
    registry.assert_frame("a").put("n", 1);
    registry.assert_frame("b").put("n", 2);

    registry.clear();
    assert!(registry.is_empty());
    assert_eq!(registry.get("a", "n"), None);
}

/// Test that computed slots recompute after invalidation, per write
#[test]
fn test_invalidation_cycle() {
    let registry = FrameRegistry::new();
    let sensor = registry.assert_frame("temp-sensor");
    sensor.add_slot("celsius", Slot::value(22)).add_slot(
        "fahrenheit",
        Slot::computed(|f| match f.get("celsius").and_then(|d| d.as_f64()) {
            Some(c) => json!(c * 9.0 / 5.0 + 32.0),
            None => json!(null),
        }),
    );

    assert_eq!(sensor.get("fahrenheit"), Some(json!(71.6)));

    // A stale cache survives the celsius write until invalidated
    sensor.put("celsius", 30);
    assert_eq!(sensor.get("fahrenheit"), Some(json!(71.6)));

    sensor.clear_facet("fahrenheit", facet::VALUE);
    assert_eq!(sensor.get("fahrenheit"), Some(json!(86.0)));
}
