//! Integration tests for saving and loading frame populations.

use framekit::persist::{load_frames, save_frames};
use framekit::{FrameError, FrameRegistry, Slot};
use serde_json::json;
use tempfile::TempDir;

fn populated_registry() -> FrameRegistry {
    let registry = FrameRegistry::new();
    registry
        .assert_frame("config")
        .add_slot("app_name", Slot::value("TestApp"))
        .add_slot("version", Slot::value("1.0").facet("released", true))
        .add_slot("features", Slot::value(json!(["search", "export"])));
    registry
        .assert_frame("user")
        .add_slot("name", Slot::value("alice"))
        .add_slot("theme", Slot::new().default_to("dark"));
    registry
}

/// Test save and reload round-trips datums, defaults, and metadata facets
#[test]
fn test_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");

    let registry = populated_registry();
    let saved = save_frames(&registry, &path, None).unwrap();
    assert_eq!(saved, 2);

    // Verify the on-disk document shape directly
    let raw = std::fs::read_to_string(&path).unwrap();
    let data: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(data["config"]["name"], json!("config"));
    assert_eq!(data["config"]["slots"]["app_name"]["value"], json!("TestApp"));
    assert_eq!(
        data["config"]["slots"]["version"]["released"],
        json!(true)
    );

    // Reload into a fresh registry
    let fresh = FrameRegistry::new();
    let report = load_frames(&fresh, &path).unwrap();
    assert_eq!(report.frames, 2);
    assert_eq!(report.dropped_facets, 0);

    assert_eq!(fresh.get("config", "app_name"), Some(json!("TestApp")));
    assert_eq!(
        fresh.get("config", "features"),
        Some(json!(["search", "export"]))
    );
    assert_eq!(
        fresh.get_facet("config", "version", "released"),
        Some(json!(true))
    );
    // Defaults survive and keep working
    assert_eq!(fresh.get("user", "theme"), Some(json!("dark")));
}

/// Test loading replaces same-named frames instead of merging into them
#[test]
fn test_load_replaces_existing_frames() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");

    let registry = populated_registry();
    save_frames(&registry, &path, None).unwrap();

    // Mutate after saving; a stale slot should not survive the reload
    registry.put("config", "app_name", "Renamed");
    registry.put("config", "debug", true);

    load_frames(&registry, &path).unwrap();
    assert_eq!(registry.get("config", "app_name"), Some(json!("TestApp")));
    assert_eq!(registry.get("config", "debug"), None);
}

/// Test behavior facets are omitted on save and the slot still round-trips
#[test]
fn test_behavior_omitted_on_save() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");

    let registry = FrameRegistry::new();
    registry
        .assert_frame("rect")
        .add_slot("width", Slot::value(10))
        .add_slot(
            "area",
            Slot::computed(|f| {
                json!(f.get("width").and_then(|d| d.as_i64()).unwrap_or(0) * 2)
            })
            .facet("units", "cm2"),
        );

    // Cache the computed value before saving
    assert_eq!(registry.get("rect", "area"), Some(json!(20)));
    save_frames(&registry, &path, None).unwrap();

    let fresh = FrameRegistry::new();
    load_frames(&fresh, &path).unwrap();

    // The cached datum survives; the computation does not
    assert_eq!(fresh.get("rect", "area"), Some(json!(20)));
    let frame = fresh.lookup("rect").unwrap();
    assert!(frame.facet("area", "if_needed").is_none());
    assert_eq!(fresh.get_facet("rect", "area", "units"), Some(json!("cm2")));

    // Behavior can be re-attached after loading
    frame.add_slot(
        "area",
        Slot::computed(|f| {
            json!(f.get("width").and_then(|d| d.as_i64()).unwrap_or(0) * 3)
        }),
    );
    frame.clear_facet("area", "value");
    assert_eq!(fresh.get("rect", "area"), Some(json!(30)));
}

/// Test function placeholders in a document are dropped and counted
#[test]
fn test_placeholders_dropped_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");
    std::fs::write(
        &path,
        r#"{
            "sensor": {
                "name": "sensor",
                "slots": {
                    "reading": {
                        "value": 42,
                        "if_needed": "<function if_needed>"
                    },
                    "alarm": {
                        "if_added": "<function if_added>"
                    }
                }
            }
        }"#,
    )
    .unwrap();

    let registry = FrameRegistry::new();
    let report = load_frames(&registry, &path).unwrap();
    assert_eq!(report.frames, 1);
    assert_eq!(report.dropped_facets, 2);

    assert_eq!(registry.get("sensor", "reading"), Some(json!(42)));
    // A slot emptied by stripping still exists
    let frame = registry.lookup("sensor").unwrap();
    assert!(frame.has_slot("alarm"));
    assert_eq!(registry.get("sensor", "alarm"), None);
}

/// Test documents without a slots field load as empty frames
#[test]
fn test_missing_slots_field_tolerated() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");
    std::fs::write(&path, r#"{"bare": {"name": "bare"}}"#).unwrap();

    let registry = FrameRegistry::new();
    let report = load_frames(&registry, &path).unwrap();
    assert_eq!(report.frames, 1);

    let frame = registry.lookup("bare").unwrap();
    assert!(frame.is_empty());
}

/// Test saving a named subset of the population
#[test]
fn test_save_named_subset() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("subset.json");

    let registry = populated_registry();
    let saved = save_frames(&registry, &path, Some(&["config", "missing"])).unwrap();
    assert_eq!(saved, 1);

    let fresh = FrameRegistry::new();
    load_frames(&fresh, &path).unwrap();
    assert!(fresh.contains("config"));
    assert!(!fresh.contains("user"));
}

/// Test float datums reload with their exact bit pattern
#[test]
fn test_float_precision_survives_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");

    let samples = [
        -913193932.1830959_f64,
        0.1,
        1.0 / 3.0,
        2.2250738585072014e-308,
        1.7976931348623157e308,
    ];

    let registry = FrameRegistry::new();
    let sensor = registry.assert_frame("sensor");
    for (i, v) in samples.iter().enumerate() {
        sensor.add_slot(format!("reading_{i}"), Slot::value(*v));
    }
    save_frames(&registry, &path, None).unwrap();

    let fresh = FrameRegistry::new();
    load_frames(&fresh, &path).unwrap();
    for (i, v) in samples.iter().enumerate() {
        let restored = fresh
            .get("sensor", &format!("reading_{i}"))
            .and_then(|d| d.as_f64())
            .unwrap();
        assert_eq!(restored.to_bits(), v.to_bits());
    }
}

/// Test loading a missing file surfaces an I/O error
#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let registry = FrameRegistry::new();
    let err = load_frames(&registry, dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, FrameError::Io(_)));
}

/// Test loading malformed JSON surfaces a document error
#[test]
fn test_load_malformed_document() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();

    let registry = FrameRegistry::new();
    let err = load_frames(&registry, &path).unwrap_err();
    assert!(matches!(err, FrameError::Malformed(_)));
}

/// Test the atomic write leaves no temp file beside the destination
#[test]
fn test_no_temp_file_left_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.json");

    save_frames(&populated_registry(), &path, None).unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(entries, vec![std::ffi::OsString::from("frames.json")]);
}
