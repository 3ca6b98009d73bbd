//! map.rs — the map surface: a trait with the four operations the
//! render pass needs, and `SvgMap`, a self-contained SVG world map
//! (equirectangular / plate carrée projection) implementing it.
//!
//! The surface is an explicit object owned by the caller and passed
//! down; nothing in this crate holds a global map instance.

use serde_json::Value;

use crate::encoding::ColorToken;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Output viewport in pixels.
const VIEW_W: f64 = 1200.0;
const VIEW_H: f64 = 600.0;

/// Slippy-map scale: pixels per 360° of longitude at zoom z is
/// `TILE_SIZE * 2^z`.
const TILE_SIZE: f64 = 256.0;

/// Length of one degree of longitude at the equator, meters.
const METERS_PER_DEGREE: f64 = 111_320.0;

/// Gap between a corner control and the viewport edge, pixels.
const CONTROL_MARGIN: f64 = 16.0;

// ---------------------------------------------------------------------------
// Surface contract
// ---------------------------------------------------------------------------

/// Corner anchor for an overlay control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// A screen-fixed overlay: an SVG fragment drawn at its local origin,
/// anchored to a viewport corner.
#[derive(Debug, Clone)]
pub struct Overlay {
    pub width: f64,
    pub height: f64,
    pub body: String,
}

/// Visual parameters for one circle marker. Radius is in meters on
/// the ground; the surface converts it to pixels at its own scale.
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    pub radius_m: f64,
    pub fill: ColorToken,
    pub fill_opacity: f64,
    pub stroke: &'static str,
    pub stroke_width: f64,
    pub stroke_opacity: f64,
}

impl MarkerStyle {
    /// The earthquake marker look: depth-colored translucent fill,
    /// thin translucent black outline.
    pub fn quake(radius_m: f64, fill: ColorToken) -> Self {
        MarkerStyle {
            radius_m,
            fill,
            fill_opacity: 0.7,
            stroke: "black",
            stroke_width: 0.5,
            stroke_opacity: 0.5,
        }
    }
}

/// The four operations the render pass depends on. `SvgMap` is the
/// real surface; tests substitute a recording one.
pub trait MapSurface {
    /// Center the viewport on `(lat, lon)` at the given zoom level.
    fn set_view(&mut self, lat: f64, lon: f64, zoom: u32);

    /// Install the base layer: a GeoJSON document of country polygons.
    fn add_base_layer(&mut self, geojson: &Value);

    /// Anchor a screen-fixed overlay to a viewport corner.
    fn add_control(&mut self, position: ControlPosition, overlay: Overlay);

    /// Place one circle marker with an attached popup text.
    fn add_circle_marker(&mut self, lat: f64, lon: f64, style: &MarkerStyle, popup: &str);
}

// ---------------------------------------------------------------------------
// SVG implementation
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct PlacedMarker {
    lat: f64,
    lon: f64,
    style: MarkerStyle,
    popup: String,
}

/// Accumulates view, base layer, markers, and controls, then emits a
/// single SVG document with `to_svg`. Markers render in insertion
/// order.
#[derive(Debug)]
pub struct SvgMap {
    center: (f64, f64), // (lat, lon)
    zoom: u32,
    base_paths: Vec<String>,
    markers: Vec<PlacedMarker>,
    controls: Vec<(ControlPosition, Overlay)>,
}

impl SvgMap {
    pub fn new() -> Self {
        SvgMap {
            center: (0.0, 0.0),
            zoom: 2,
            base_paths: Vec::new(),
            markers: Vec::new(),
            controls: Vec::new(),
        }
    }

    /// Pixels per degree of longitude at the current zoom.
    fn scale(&self) -> f64 {
        TILE_SIZE * f64::powi(2.0, self.zoom as i32) / 360.0
    }

    /// Project `(lon, lat)` to world pixel coordinates.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let s = self.scale();
        ((lon + 180.0) * s, (90.0 - lat) * s)
    }

    /// Top-left corner of the viewport in world pixels.
    fn view_origin(&self) -> (f64, f64) {
        let (cx, cy) = self.project(self.center.1, self.center.0);
        (cx - VIEW_W / 2.0, cy - VIEW_H / 2.0)
    }

    /// Render the accumulated map as a complete SVG document.
    pub fn to_svg(&self) -> String {
        let s = self.scale();
        let (world_w, world_h) = (360.0 * s, 180.0 * s);
        let (min_x, min_y) = self.view_origin();

        let mut out = String::with_capacity(4 << 20);

        // header
        out.push_str(&format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{VIEW_W}" height="{VIEW_H}" viewBox="{min_x:.1} {min_y:.1} {VIEW_W} {VIEW_H}">
  <title>Earthquake Map</title>
  <desc>Earthquake markers sized by magnitude and colored by depth.</desc>
"#
        ));

        // background (ocean) — covers the viewport even past the world edge
        out.push_str(&format!(
            "  <rect x='{min_x:.1}' y='{min_y:.1}' width='{VIEW_W}' height='{VIEW_H}' fill='#aad3df'/>\n"
        ));

        // graticule
        out.push_str("  <g stroke='#c9e2ea' stroke-width='0.5'>\n");
        for lon in (-180..=180).step_by(30) {
            let (x, _) = self.project(lon as f64, 0.0);
            out.push_str(&format!(
                "    <line x1='{x:.1}' y1='0' x2='{x:.1}' y2='{world_h:.1}'/>\n"
            ));
        }
        for lat in (-90..=90).step_by(30) {
            let (_, y) = self.project(0.0, lat as f64);
            out.push_str(&format!(
                "    <line x1='0' y1='{y:.1}' x2='{world_w:.1}' y2='{y:.1}'/>\n"
            ));
        }
        out.push_str("  </g>\n");

        // country polygons
        if !self.base_paths.is_empty() {
            out.push_str("  <g fill='#f2efe9' stroke='#b5aca0' stroke-width='0.5'>\n");
            for d in &self.base_paths {
                out.push_str(&format!("    <path d='{d}'/>\n"));
            }
            out.push_str("  </g>\n");
        }

        // markers, in insertion order
        out.push_str("  <g>\n");
        for m in &self.markers {
            let (x, y) = self.project(m.lon, m.lat);
            let r = m.style.radius_m / METERS_PER_DEGREE * s;
            out.push_str(&format!(
                "    <circle cx='{x:.1}' cy='{y:.1}' r='{r:.2}' fill='{}' fill-opacity='{}' stroke='{}' stroke-width='{}' stroke-opacity='{}'>\n",
                m.style.fill,
                m.style.fill_opacity,
                m.style.stroke,
                m.style.stroke_width,
                m.style.stroke_opacity,
            ));
            out.push_str(&format!("      <title>{}</title>\n", xml_escape(&m.popup)));
            out.push_str("    </circle>\n");
        }
        out.push_str("  </g>\n");

        // screen-fixed controls
        for (position, overlay) in &self.controls {
            let (x, y) = control_origin(*position, overlay, min_x, min_y);
            out.push_str(&format!("  <g transform='translate({x:.1},{y:.1})'>\n"));
            out.push_str(&overlay.body);
            out.push_str("  </g>\n");
        }

        out.push_str("</svg>\n");
        out
    }

    fn ring_to_path(&self, coords: &[Value]) -> String {
        let mut d = String::new();
        for (i, pt) in coords.iter().enumerate() {
            let arr = match pt.as_array() {
                Some(a) => a,
                None => continue,
            };
            let lon = match arr.first().and_then(|v| v.as_f64()) {
                Some(v) => v,
                None => continue,
            };
            let lat = match arr.get(1).and_then(|v| v.as_f64()) {
                Some(v) => v,
                None => continue,
            };
            let (x, y) = self.project(lon, lat);
            if i == 0 {
                d.push_str(&format!("M{x:.2},{y:.2}"));
            } else {
                d.push_str(&format!("L{x:.2},{y:.2}"));
            }
        }
        d.push('Z');
        d
    }

    fn geometry_paths(&self, geom: &Value) -> Vec<String> {
        let mut paths = Vec::new();
        match geom["type"].as_str().unwrap_or("") {
            "Polygon" => {
                if let Some(rings) = geom["coordinates"].as_array() {
                    for ring in rings {
                        if let Some(pts) = ring.as_array() {
                            paths.push(self.ring_to_path(pts));
                        }
                    }
                }
            }
            "MultiPolygon" => {
                if let Some(polys) = geom["coordinates"].as_array() {
                    for poly in polys {
                        if let Some(rings) = poly.as_array() {
                            for ring in rings {
                                if let Some(pts) = ring.as_array() {
                                    paths.push(self.ring_to_path(pts));
                                }
                            }
                        }
                    }
                }
            }
            _ => {}
        }
        paths
    }
}

impl Default for SvgMap {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface for SvgMap {
    fn set_view(&mut self, lat: f64, lon: f64, zoom: u32) {
        self.center = (lat, lon);
        self.zoom = zoom;
    }

    fn add_base_layer(&mut self, geojson: &Value) {
        let mut paths = Vec::new();
        if let Some(features) = geojson["features"].as_array() {
            for feature in features {
                paths.extend(self.geometry_paths(&feature["geometry"]));
            }
        }
        eprintln!("[map] Base layer: {} polygon paths.", paths.len());
        self.base_paths.extend(paths);
    }

    fn add_control(&mut self, position: ControlPosition, overlay: Overlay) {
        self.controls.push((position, overlay));
    }

    fn add_circle_marker(&mut self, lat: f64, lon: f64, style: &MarkerStyle, popup: &str) {
        self.markers.push(PlacedMarker {
            lat,
            lon,
            style: style.clone(),
            popup: popup.to_string(),
        });
    }
}

fn control_origin(
    position: ControlPosition,
    overlay: &Overlay,
    min_x: f64,
    min_y: f64,
) -> (f64, f64) {
    let x = match position {
        ControlPosition::TopLeft | ControlPosition::BottomLeft => min_x + CONTROL_MARGIN,
        ControlPosition::TopRight | ControlPosition::BottomRight => {
            min_x + VIEW_W - overlay.width - CONTROL_MARGIN
        }
    };
    let y = match position {
        ControlPosition::TopLeft | ControlPosition::TopRight => min_y + CONTROL_MARGIN,
        ControlPosition::BottomLeft | ControlPosition::BottomRight => {
            min_y + VIEW_H - overlay.height - CONTROL_MARGIN
        }
    };
    (x, y)
}

/// Escape text for SVG element content and attribute values.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
