//! Guided tour of the frame engine: plain slots, computed values, triggers,
//! prototype inheritance, and persistence.
//!
//! Run with `cargo run --example tour`.

use std::sync::Arc;

use anyhow::Result;
use framekit::{logging, persist, FrameRegistry, Slot};
use parking_lot::Mutex;
use serde_json::json;

fn main() -> Result<()> {
    logging::init_logging(None)?;

    let registry = FrameRegistry::new();

    basic(&registry);
    registry.clear();

    computed_values(&registry);
    registry.clear();

    triggers(&registry);
    registry.clear();

    inheritance(&registry);
    registry.clear();

    persistence(&registry)?;
    Ok(())
}

/// Basic frame creation and access.
fn basic(registry: &FrameRegistry) {
    println!("\n=== Basic Frames ===");

    let robot = registry.assert_frame("robot");
    robot
        .add_slot("type", Slot::value("service-robot"))
        .add_slot("manufacturer", Slot::value("Acme Robotics"))
        .add_slot("model", Slot::value("ServoBot 3000"))
        .add_slot("height", Slot::value(1.5).facet("units", "meters"))
        .add_slot("weight", Slot::value(45).facet("units", "kg"))
        .add_slot(
            "color",
            Slot::value("silver").facet("options", json!(["silver", "white", "black"])),
        )
        .add_slot(
            "battery",
            Slot::value(85).facet("units", "percent").facet("min", 0).facet("max", 100),
        );

    println!("{robot}");
    println!(
        "\nRobot height: {} {}",
        render(registry.get("robot", "height")),
        render(registry.get_facet("robot", "height", "units"))
    );
    println!("Battery level: {}%", render(registry.get("robot", "battery")));
}

/// Computed values with `if_needed`, and cache invalidation.
fn computed_values(registry: &FrameRegistry) {
    println!("\n=== Computed Values ===");

    let sensor = registry.assert_frame("temp-sensor");
    sensor
        .add_slot("location", Slot::value("living-room"))
        .add_slot("celsius", Slot::value(22))
        .add_slot(
            "fahrenheit",
            Slot::computed(|f| match f.get("celsius").and_then(|d| d.as_f64()) {
                Some(celsius) => json!(celsius * 9.0 / 5.0 + 32.0),
                None => json!(null),
            }),
        );

    println!("Temperature: {}°C", render(sensor.get("celsius")));
    println!("Temperature: {}°F (computed)", render(sensor.get("fahrenheit")));

    // Update Celsius, then drop the cached Fahrenheit so it recomputes
    sensor.put("celsius", 30);
    sensor.clear_facet("fahrenheit", "value");
    println!("After update: {}°F", render(sensor.get("fahrenheit")));
}

/// Triggers reacting to value writes.
fn triggers(registry: &FrameRegistry) {
    println!("\n=== Triggers (Active Values) ===");

    let alerts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let log = alerts.clone();
    let monitor = move |_: &framekit::Frame,
                        previous: Option<&framekit::Datum>,
                        new: &framekit::Datum| {
        let new_level = new.as_i64().unwrap_or(0);
        let old_level = previous.and_then(|d| d.as_i64());
        if new_level < 20 {
            let alert = format!("LOW BATTERY: {new_level}%");
            println!("{alert}");
            log.lock().push(alert);
        } else if old_level.is_some_and(|old| old < 20) {
            let alert = "Battery level restored".to_string();
            println!("{alert}");
            log.lock().push(alert);
        }
    };

    let history = alerts.clone();
    let laptop = registry.assert_frame("laptop");
    laptop
        .add_slot("model", Slot::value("ThinkPad X1"))
        .add_slot(
            "battery",
            Slot::value(100).facet("units", "percent").if_added(monitor),
        )
        .add_slot(
            "alerts",
            Slot::computed(move |_| json!(history.lock().clone())),
        );

    println!("Simulating battery drain...");
    for level in [80, 50, 19, 15, 10, 25, 90] {
        laptop.put("battery", level);
    }

    println!("\nAll alerts: {}", render(laptop.get("alerts")));
}

/// Prototype-based inheritance through computed slots.
fn inheritance(registry: &FrameRegistry) {
    println!("\n=== Inheritance ===");

    let prototype = registry.assert_frame("robot-prototype");
    prototype
        .add_slot("category", Slot::value("prototype"))
        .add_slot("default_height", Slot::value(1.5))
        .add_slot("default_weight", Slot::value(50))
        .add_slot(
            "default_sensors",
            Slot::value(json!(["camera", "lidar", "ultrasonic"])),
        )
        .add_slot(
            "capabilities",
            Slot::value(json!(["navigation", "object-recognition"])),
        );

    // A computed slot that pulls `default_<slot>` from a parent frame
    let inherit = |registry: &FrameRegistry, parent: &str, slot: &str| {
        let registry = registry.clone();
        let parent = parent.to_string();
        let slot = format!("default_{slot}");
        move |_: &framekit::Frame| registry.get(&parent, &slot).unwrap_or(json!(null))
    };

    let rosie = registry.assert_frame("rosie");
    rosie
        .add_slot("prototype", Slot::value("robot-prototype"))
        .add_slot("name", Slot::value("Rosie"))
        .add_slot("height", Slot::computed(inherit(registry, "robot-prototype", "height")))
        .add_slot("weight", Slot::value(45))
        .add_slot("color", Slot::value("red"))
        .add_slot("sensors", Slot::computed(inherit(registry, "robot-prototype", "sensors")));

    let c3po = registry.assert_frame("c3po");
    c3po.add_slot("prototype", Slot::value("robot-prototype"))
        .add_slot("name", Slot::value("C-3PO"))
        .add_slot("height", Slot::value(1.7))
        .add_slot("weight", Slot::computed(inherit(registry, "robot-prototype", "weight")))
        .add_slot("color", Slot::value("gold"))
        .add_slot("languages", Slot::value(6_000_000));

    println!("Rosie:");
    println!("  Height: {} (inherited)", render(rosie.get("height")));
    println!("  Weight: {} (overridden)", render(rosie.get("weight")));
    println!("  Sensors: {} (inherited)", render(rosie.get("sensors")));

    println!("\nC-3PO:");
    println!("  Height: {} (overridden)", render(c3po.get("height")));
    println!("  Weight: {} (inherited)", render(c3po.get("weight")));
    println!("  Languages: {} (unique)", render(c3po.get("languages")));
}

/// Saving and loading the frame population.
fn persistence(registry: &FrameRegistry) -> Result<()> {
    println!("\n=== Persistence ===");

    registry
        .assert_frame("app-config")
        .add_slot("name", Slot::value("Framekit"))
        .add_slot("version", Slot::value("1.0"))
        .add_slot("debug", Slot::value(true))
        .add_slot("max_frames", Slot::value(1000));

    registry
        .assert_frame("current-user")
        .add_slot("username", Slot::value("ada"))
        .add_slot("role", Slot::value("admin"))
        .add_slot(
            "preferences",
            Slot::value(json!({ "theme": "dark", "notifications": true })),
        );

    println!("Original frames:");
    println!(
        "  Config: {} v{}",
        render(registry.get("app-config", "name")),
        render(registry.get("app-config", "version"))
    );
    println!(
        "  User: {} ({})",
        render(registry.get("current-user", "username")),
        render(registry.get("current-user", "role"))
    );

    let path = std::env::temp_dir().join("framekit-tour.json");
    persist::save_frames(registry, &path, None)?;

    registry.clear();
    println!("\nCleared all frames. Count: {}", registry.len());

    persist::load_frames(registry, &path)?;
    println!("\nAfter loading:");
    println!(
        "  Config: {} v{}",
        render(registry.get("app-config", "name")),
        render(registry.get("app-config", "version"))
    );
    println!(
        "  User: {} ({})",
        render(registry.get("current-user", "username")),
        render(registry.get("current-user", "role"))
    );

    Ok(())
}

fn render(datum: Option<framekit::Datum>) -> String {
    match datum {
        Some(framekit::Datum::String(s)) => s,
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}
