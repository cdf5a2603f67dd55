//! Device fleet monitoring: computed health, touch-on-write triggers, and a
//! status report over the population.
//!
//! Run with `cargo run --example devices`.

use anyhow::Result;
use chrono::Utc;
use framekit::report::{frames_to_dot, registry_stats};
use framekit::{logging, Datum, Frame, FrameRegistry, Slot};
use serde_json::json;

/// Readings are stale after this many seconds without a write.
const STALE_AFTER_SECS: i64 = 300;

fn main() -> Result<()> {
    logging::init_logging(None)?;

    let registry = FrameRegistry::new();
    let names = provision(&registry);

    // Simulate some issues
    registry.put("sensor-0", "battery", 15);
    registry.put("sensor-1", "temperature", 85);

    println!("Device Status:");
    println!("{}", "-".repeat(40));
    for name in &names {
        let health = render(registry.get(name, "health"));
        let battery = render(registry.get(name, "battery"));
        let temp = render(registry.get(name, "temperature"));
        let location = render(registry.get(name, "location"));
        println!("{name} ({location}): Battery={battery}%, Temp={temp}°C, Status={health}");
    }

    let stats = registry_stats(&registry);
    println!(
        "\nPopulation: {} frames, {} slots, {:.1} slots/frame",
        stats.total_frames, stats.total_slots, stats.avg_slots_per_frame
    );

    println!("\nGraphviz view:\n{}", frames_to_dot(&registry, None));
    Ok(())
}

/// Create three environmental sensors with computed health and a trigger
/// that touches `last_seen` on every data write.
fn provision(registry: &FrameRegistry) -> Vec<String> {
    let readings = [(92, 21, 40), (67, 24, 55), (38, 28, 61)];
    let mut names = Vec::new();

    for (i, (battery, temperature, humidity)) in readings.into_iter().enumerate() {
        let name = format!("sensor-{i}");
        let device = registry.assert_frame(&name);
        device
            .add_slot("device_type", Slot::value("environmental-sensor"))
            .add_slot("location", Slot::value(format!("room-{}", i + 1)))
            .add_slot("battery", Slot::value(battery).facet("units", "percent"))
            .add_slot("temperature", Slot::value(temperature).facet("units", "celsius"))
            .add_slot("humidity", Slot::value(humidity).facet("units", "percent"))
            .add_slot("last_seen", Slot::value(Utc::now().timestamp()))
            .add_slot("health", Slot::computed(device_health))
            .add_slot(
                "data",
                Slot::value(json!([])).if_added(|frame, _, _| {
                    frame.put("last_seen", Utc::now().timestamp());
                }),
            );
        names.push(name);
    }

    names
}

/// Health rolls up battery, temperature, and staleness checks.
fn device_health(frame: &Frame) -> Datum {
    let battery = frame.get("battery").and_then(|d| d.as_i64());
    let temperature = frame.get("temperature").and_then(|d| d.as_i64());
    let last_seen = frame.get("last_seen").and_then(|d| d.as_i64());

    if battery.is_some_and(|b| b < 20) {
        json!("critical")
    } else if temperature.is_some_and(|t| t > 80) {
        json!("warning")
    } else if last_seen.is_some_and(|t| Utc::now().timestamp() - t > STALE_AFTER_SECS) {
        json!("offline")
    } else {
        json!("healthy")
    }
}

fn render(datum: Option<Datum>) -> String {
    match datum {
        Some(Datum::String(s)) => s,
        Some(other) => other.to_string(),
        None => "-".to_string(),
    }
}
