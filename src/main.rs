//! quake-map — one render pass: fetch the USGS earthquake feed, draw
//! magnitude-sized, depth-colored markers on an SVG world map with a
//! legend, write the result to `quakes.svg`.

use std::fs;

use serde_json::Value;

use quake_map::map::{MapSurface, SvgMap};
use quake_map::render::{self, RenderOutcome};

const FEED_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_month.geojson";

const BASEMAP_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/world.geojson");
const BASEMAP_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";

const OUT_SVG: &str = "quakes.svg";

// Initial view: continental United States.
const VIEW_CENTER: (f64, f64) = (37.09, -95.71);
const VIEW_ZOOM: u32 = 4;

fn main() -> anyhow::Result<()> {
    let mut map = SvgMap::new();
    map.set_view(VIEW_CENTER.0, VIEW_CENTER.1, VIEW_ZOOM);

    match load_basemap() {
        Some(geojson) => map.add_base_layer(&geojson),
        None => eprintln!("[map] Rendering without country polygons."),
    }

    let outcome = render::run(&mut map, FEED_URL);
    if let RenderOutcome::FetchFailed(_) = outcome {
        eprintln!("[map] Feed unavailable — the map will carry the legend only.");
    }

    let svg = map.to_svg();
    fs::write(OUT_SVG, &svg)?;
    eprintln!("[map] Written {OUT_SVG} ({} bytes)", svg.len());
    Ok(())
}

/// Load the base-map GeoJSON: the build-time asset first, then a
/// runtime fetch. Returns `None` when both fail; the map still
/// renders, just without country polygons.
fn load_basemap() -> Option<Value> {
    match fs::read(BASEMAP_PATH) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(geojson) => return Some(geojson),
            Err(e) => eprintln!("[map] {BASEMAP_PATH} is not valid JSON: {e}"),
        },
        Err(_) => eprintln!("[map] world.geojson not found at {BASEMAP_PATH}, fetching…"),
    }

    match ureq::get(BASEMAP_URL).call() {
        Ok(resp) => match serde_json::from_reader(resp.into_reader()) {
            Ok(geojson) => Some(geojson),
            Err(e) => {
                eprintln!("[map] Failed to parse fetched base map: {e}");
                None
            }
        },
        Err(e) => {
            eprintln!("[map] Failed to fetch base map: {e}");
            None
        }
    }
}
