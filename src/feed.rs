//! feed.rs — USGS earthquake feed: wire model, one-shot fetch, and
//! per-event validation.
//!
//! The feed is a GeoJSON `FeatureCollection`; each feature carries
//! `geometry.coordinates = [longitude, latitude, depth_km]` plus
//! `properties.mag` / `properties.place` / `properties.time`
//! (epoch milliseconds). We only model the fields we read; everything
//! else in the document is ignored.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// The feed request failed or the document was unparsable. Fatal to
/// the render pass: no markers are placed.
#[derive(Debug, Error)]
pub enum FeedFetchError {
    #[error("feed request failed: {0}")]
    Transport(#[from] Box<ureq::Error>),
    #[error("malformed feed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One record failed validation. Never fatal: the orchestrator logs
/// it and moves on to the next event.
#[derive(Debug, Error)]
#[error("skipping event {index}: {reason}")]
pub struct InvalidEventRecord {
    pub index: usize,
    pub reason: String,
}

// ---------------------------------------------------------------------------
// Wire model
// ---------------------------------------------------------------------------

/// The top-level JSON object returned by the USGS feed.
/// We only care about the `features` array; everything else is ignored.
#[derive(Debug, Deserialize)]
pub struct FeedDocument {
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    pub geometry: Geometry,
    pub properties: Properties,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude, depth_km]`
    pub coordinates: Vec<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Properties {
    /// Kept as raw JSON: the feed occasionally carries `null` or junk
    /// here, and one bad magnitude must not abort the whole document.
    #[serde(default)]
    pub mag: Option<Value>,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub time: Option<i64>,
}

/// Fetch and parse the event feed. The render pass's single
/// suspension point: one GET, no retry, no timeout, no cancellation.
pub fn fetch(url: &str) -> Result<Vec<Feature>, FeedFetchError> {
    let resp = ureq::get(url).call().map_err(Box::new)?;
    let doc: FeedDocument = serde_json::from_reader(resp.into_reader())?;
    Ok(doc.features)
}

// ---------------------------------------------------------------------------
// Validated event
// ---------------------------------------------------------------------------

/// One earthquake occurrence, validated out of a raw feature. Built
/// fresh per render pass, never mutated.
#[derive(Debug, Clone)]
pub struct Event {
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
    pub magnitude: f64,
    pub place: String,
    pub time_ms: Option<i64>,
}

impl Event {
    /// Validate a raw feature into an `Event`.
    ///
    /// Rejects short or non-finite coordinate arrays and missing or
    /// non-numeric magnitudes. A missing `place` is not an error; it
    /// becomes a presentation default.
    pub fn from_feature(index: usize, feature: &Feature) -> Result<Event, InvalidEventRecord> {
        let bad = |reason: String| InvalidEventRecord { index, reason };

        let coords = &feature.geometry.coordinates;
        if coords.len() < 3 {
            return Err(bad(format!(
                "expected [lon, lat, depth] coordinates, got {}",
                coords.len()
            )));
        }
        let (longitude, latitude, depth_km) = (coords[0], coords[1], coords[2]);
        if !longitude.is_finite() || !latitude.is_finite() || !depth_km.is_finite() {
            return Err(bad("non-finite coordinates".to_string()));
        }

        let magnitude = feature
            .properties
            .mag
            .as_ref()
            .and_then(Value::as_f64)
            .filter(|m| m.is_finite())
            .ok_or_else(|| {
                bad(format!(
                    "invalid magnitude: {}",
                    feature
                        .properties
                        .mag
                        .as_ref()
                        .map_or_else(|| "missing".to_string(), Value::to_string)
                ))
            })?;

        Ok(Event {
            longitude,
            latitude,
            depth_km,
            magnitude,
            place: feature
                .properties
                .place
                .clone()
                .unwrap_or_else(|| "Unknown location".to_string()),
            time_ms: feature.properties.time,
        })
    }
}
