//! build.rs — download the base-map asset once.
//!
//! Fetches the world country GeoJSON → assets/world.geojson.
//! The binary reads it at runtime for the base layer; if the download
//! fails the map still renders, just without country polygons.

use std::{env, fs, io::Read, path::Path};

const GEOJSON_URL: &str =
    "https://raw.githubusercontent.com/datasets/geo-countries/master/data/countries.geojson";
const GEOJSON_PATH: &str = "assets/world.geojson";

fn main() {
    // Re-run when the asset file changes or appears.
    println!("cargo:rerun-if-changed={GEOJSON_PATH}");

    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let assets = Path::new(&manifest_dir).join("assets");
    fs::create_dir_all(&assets).expect("could not create assets/ directory");

    let geojson_dest = assets.join("world.geojson");
    if geojson_dest.exists() {
        eprintln!("[build] world.geojson already present, skipping.");
        return;
    }

    eprintln!("[build] Downloading world.geojson ...");
    match fetch(GEOJSON_URL) {
        Ok(body) => {
            fs::write(&geojson_dest, &body).expect("failed to write world.geojson");
            eprintln!("[build] Saved {} bytes → {GEOJSON_PATH}", body.len());
        }
        Err(e) => {
            eprintln!("[build] ✗ Failed to download world.geojson: {e}");
            eprintln!("[build]   The map will render without country polygons.");
        }
    }
}

fn fetch(url: &str) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let resp = ureq::get(url).set("Accept-Encoding", "identity").call()?;
    let mut buf = Vec::new();
    resp.into_reader().read_to_end(&mut buf)?;
    Ok(buf)
}
