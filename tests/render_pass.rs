//! End-to-end render pass against a recording map surface.

use serde_json::Value;

use quake_map::feed::{FeedDocument, FeedFetchError};
use quake_map::map::{ControlPosition, MapSurface, MarkerStyle, Overlay};
use quake_map::render::{self, RenderOutcome};

/// Records every surface call instead of drawing.
#[derive(Default)]
struct RecordingSurface {
    markers: Vec<(f64, f64, MarkerStyle, String)>,
    controls: Vec<ControlPosition>,
}

impl MapSurface for RecordingSurface {
    fn set_view(&mut self, _lat: f64, _lon: f64, _zoom: u32) {}

    fn add_base_layer(&mut self, _geojson: &Value) {}

    fn add_control(&mut self, position: ControlPosition, _overlay: Overlay) {
        self.controls.push(position);
    }

    fn add_circle_marker(&mut self, lat: f64, lon: f64, style: &MarkerStyle, popup: &str) {
        self.markers.push((lat, lon, style.clone(), popup.to_string()));
    }
}

const MIXED_FEED: &str = r#"{
    "type": "FeatureCollection",
    "features": [
        {"geometry": {"coordinates": [-122.8, 38.8, 2.7]},
         "properties": {"mag": 4.0, "place": "The Geysers, CA", "time": 1700000000000}},
        {"geometry": {"coordinates": [140.5, 36.1, 45.0]},
         "properties": {"mag": null, "place": "near Mito, Japan", "time": 1700000100000}},
        {"geometry": {"coordinates": [-66.9, 18.2, 95.0]},
         "properties": {"mag": 2.1, "place": "Puerto Rico region", "time": 1700000200000}},
        {"geometry": {"coordinates": [25.0, -5.0]},
         "properties": {"mag": 5.5, "place": "short coords", "time": 1700000300000}},
        {"geometry": {"coordinates": [178.4, 51.9, 25.0]},
         "properties": {"mag": -0.3, "place": "Rat Islands, Alaska", "time": 1700000400000}}
    ]
}"#;

fn mixed_features() -> FeedDocument {
    serde_json::from_str(MIXED_FEED).unwrap()
}

#[test]
fn bad_records_are_skipped_without_blocking_the_rest() {
    let mut surface = RecordingSurface::default();
    let outcome = render::complete(&mut surface, Ok(mixed_features().features));

    // 5 events, 2 invalid (null magnitude, 2-element coordinates)
    let report = match outcome {
        RenderOutcome::Rendered(report) => report,
        other => panic!("expected Rendered, got {other:?}"),
    };
    assert_eq!(report.markers_placed, 3);
    assert_eq!(report.skipped.len(), 2);
    assert_eq!(surface.markers.len(), 3);

    // Skip diagnostics identify the offending records.
    let skipped: Vec<usize> = report.skipped.iter().map(|s| s.index).collect();
    assert_eq!(skipped, [1, 3]);
}

#[test]
fn surviving_markers_keep_feed_order() {
    let mut surface = RecordingSurface::default();
    render::complete(&mut surface, Ok(mixed_features().features));

    let popups: Vec<&str> = surface.markers.iter().map(|(_, _, _, p)| p.as_str()).collect();
    assert!(popups[0].starts_with("The Geysers, CA"));
    assert!(popups[1].starts_with("Puerto Rico region"));
    assert!(popups[2].starts_with("Rat Islands, Alaska"));
}

#[test]
fn markers_carry_the_visual_encoding() {
    let mut surface = RecordingSurface::default();
    render::complete(&mut surface, Ok(mixed_features().features));

    // mag 4.0 → sqrt(4) * 15000 m; depth 2.7 → shallowest band
    let (lat, lon, style, popup) = &surface.markers[0];
    assert_eq!(*lat, 38.8);
    assert_eq!(*lon, -122.8);
    assert_eq!(style.radius_m, 30_000.0);
    assert_eq!(style.fill, "#7FFF00");
    assert!(popup.contains("Magnitude: 4"));

    // depth 95 → deepest band
    assert_eq!(surface.markers[1].2.fill, "#8B0000");

    // negative magnitude clamps to radius 0, still rendered
    assert_eq!(surface.markers[2].2.radius_m, 0.0);
}

#[test]
fn failed_fetch_places_no_markers_but_keeps_the_legend() {
    let mut surface = RecordingSurface::default();
    let parse_err = serde_json::from_str::<FeedDocument>("not json").unwrap_err();

    // run() installs the legend before the fetch resolves; mirror that here.
    quake_map::legend::install(&mut surface);
    let outcome = render::complete(&mut surface, Err(FeedFetchError::Parse(parse_err)));

    assert!(matches!(outcome, RenderOutcome::FetchFailed(FeedFetchError::Parse(_))));
    assert!(surface.markers.is_empty());
    assert_eq!(surface.controls, [ControlPosition::BottomRight]);
}

#[test]
fn empty_feed_renders_nothing_and_succeeds() {
    let mut surface = RecordingSurface::default();
    let outcome = render::complete(&mut surface, Ok(Vec::new()));
    match outcome {
        RenderOutcome::Rendered(report) => {
            assert_eq!(report.markers_placed, 0);
            assert!(report.skipped.is_empty());
        }
        other => panic!("expected Rendered, got {other:?}"),
    }
}
