//! quake-map — fetch the USGS earthquake GeoJSON feed and render a
//! self-contained SVG world map: one circle per event, sized by
//! magnitude and colored by depth, with a static depth legend.

pub mod encoding;
pub mod feed;
pub mod legend;
pub mod map;
pub mod render;
