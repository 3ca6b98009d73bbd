//! render.rs — the one-shot render pass.
//!
//! Idle (legend built, independent of the fetch) → Loading (single
//! feed fetch, the only suspension point) → Rendered or FetchFailed.
//! A bad record skips that one event; a bad fetch drops all markers
//! but leaves the legend in place.

use crate::encoding;
use crate::feed::{self, Event, Feature, FeedFetchError, InvalidEventRecord};
use crate::legend;
use crate::map::{MapSurface, MarkerStyle};

/// Terminal state of a render pass.
#[derive(Debug)]
pub enum RenderOutcome {
    Rendered(RenderReport),
    FetchFailed(FeedFetchError),
}

/// What the success path did: one marker per valid event, one skip
/// record per invalid one.
#[derive(Debug, Default)]
pub struct RenderReport {
    pub markers_placed: usize,
    pub skipped: Vec<InvalidEventRecord>,
}

/// Run the whole pass against `map`: install the legend, fetch the
/// feed once, place markers. Re-running re-fetches and re-renders
/// from scratch; there is no incremental update.
pub fn run<M: MapSurface>(map: &mut M, feed_url: &str) -> RenderOutcome {
    legend::install(map);

    eprintln!("[feed] Fetching earthquake feed…");
    complete(map, feed::fetch(feed_url))
}

/// Resume from the fetch's two outcomes. Split from `run` so the
/// post-fetch path is drivable without a network.
pub fn complete<M: MapSurface>(
    map: &mut M,
    fetched: Result<Vec<Feature>, FeedFetchError>,
) -> RenderOutcome {
    let features = match fetched {
        Ok(features) => features,
        Err(e) => {
            eprintln!("[feed] ✗ {e}");
            return RenderOutcome::FetchFailed(e);
        }
    };
    eprintln!("[feed] Got {} events.", features.len());

    let mut report = RenderReport::default();
    for (index, feature) in features.iter().enumerate() {
        // One malformed record must not block the rest.
        match Event::from_feature(index, feature) {
            Ok(event) => {
                let enc = encoding::encode(&event);
                let style = MarkerStyle::quake(enc.radius_m, enc.fill);
                map.add_circle_marker(event.latitude, event.longitude, &style, &enc.popup);
                report.markers_placed += 1;
            }
            Err(bad) => {
                eprintln!("[render] {bad}");
                report.skipped.push(bad);
            }
        }
    }

    eprintln!(
        "[render] Placed {} markers ({} skipped).",
        report.markers_placed,
        report.skipped.len()
    );
    RenderOutcome::Rendered(report)
}
