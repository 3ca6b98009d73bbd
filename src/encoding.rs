//! encoding.rs — the visual encoding core.
//!
//! Deterministic mapping from a raw event to marker visuals:
//!   magnitude → radius (meters), depth → band color, event → popup.
//!
//! `DEPTH_BANDS` is the single source of truth for depth coloring;
//! the legend builds itself from the same table so the two can never
//! diverge.

use chrono::{DateTime, Utc};

use crate::feed::Event;

/// Opaque color identifier (hex string); identity only.
pub type ColorToken = &'static str;

/// Meters of marker radius per unit √magnitude.
pub const RADIUS_SCALE: f64 = 15_000.0;

/// One depth interval `[lower, upper)` bound to a color. The last
/// band is open above (`upper == None`).
#[derive(Debug)]
pub struct DepthBand {
    pub lower: f64,
    pub upper: Option<f64>,
    pub color: ColorToken,
}

/// Depth bands in ascending order: contiguous and non-overlapping.
pub const DEPTH_BANDS: [DepthBand; 6] = [
    DepthBand { lower: 0.0, upper: Some(10.0), color: "#7FFF00" }, // light green
    DepthBand { lower: 10.0, upper: Some(30.0), color: "#FFD700" }, // gold
    DepthBand { lower: 30.0, upper: Some(50.0), color: "#FFA500" }, // orange
    DepthBand { lower: 50.0, upper: Some(70.0), color: "#FF4500" }, // orange-red
    DepthBand { lower: 70.0, upper: Some(90.0), color: "#DC143C" }, // crimson
    DepthBand { lower: 90.0, upper: None, color: "#8B0000" },       // dark red
];

/// Per-event visuals, computed fresh from an `Event`; never cached.
#[derive(Debug)]
pub struct VisualEncoding {
    pub radius_m: f64,
    pub fill: ColorToken,
    pub popup: String,
}

/// Marker radius in meters: `sqrt(magnitude) * RADIUS_SCALE`.
///
/// Strictly monotonic for magnitude ≥ 0. Negative magnitudes are real
/// in the feed (microquakes) and clamp to radius 0 rather than
/// producing NaN. NaN itself never reaches this function; the
/// orchestrator rejects non-numeric magnitudes upstream.
pub fn radius_for(magnitude: f64) -> f64 {
    magnitude.max(0.0).sqrt() * RADIUS_SCALE
}

/// Depth → band color. Total over all reals: depths below the first
/// bound share the shallowest band, the last band is unbounded above.
pub fn color_for(depth_km: f64) -> ColorToken {
    for band in DEPTH_BANDS.iter().rev() {
        if depth_km >= band.lower {
            return band.color;
        }
    }
    DEPTH_BANDS[0].color
}

/// Popup text for a marker: place, magnitude, depth, UTC time.
/// Presentation only; no validation happens here.
pub fn popup_for(event: &Event) -> String {
    format!(
        "{}\nMagnitude: {}\nDepth: {} km\nTime: {}",
        event.place,
        event.magnitude,
        event.depth_km,
        format_time(event.time_ms)
    )
}

pub fn encode(event: &Event) -> VisualEncoding {
    VisualEncoding {
        radius_m: radius_for(event.magnitude),
        fill: color_for(event.depth_km),
        popup: popup_for(event),
    }
}

fn format_time(time_ms: Option<i64>) -> String {
    time_ms
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
