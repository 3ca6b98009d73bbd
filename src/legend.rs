//! legend.rs — the depth legend overlay.
//!
//! Built once per page from `DEPTH_BANDS`, with each swatch colored
//! by calling `color_for` on the band's lower bound — the same lookup
//! the markers use, so legend and markers cannot drift apart.

use crate::encoding::{color_for, DepthBand, DEPTH_BANDS};
use crate::map::{xml_escape, ControlPosition, MapSurface, Overlay};

pub const LEGEND_TITLE: &str = "Earthquake depth in KM";

const PAD: f64 = 10.0;
const TITLE_H: f64 = 22.0;
const ROW_H: f64 = 22.0;
const SWATCH_W: f64 = 26.0;
const SWATCH_H: f64 = 16.0;
const WIDTH: f64 = 170.0;

/// Label for one band: `"0 - 10 km"`, or `"90+ km"` for the open
/// last band.
pub fn band_label(band: &DepthBand) -> String {
    match band.upper {
        Some(upper) => format!("{} - {} km", band.lower, upper),
        None => format!("{}+ km", band.lower),
    }
}

/// Build the legend as a screen-fixed overlay: white backing box,
/// title, one swatch + label row per depth band in ascending order.
pub fn build() -> Overlay {
    let height = PAD + TITLE_H + DEPTH_BANDS.len() as f64 * ROW_H + PAD;
    let mut body = String::new();

    body.push_str(&format!(
        "    <rect width='{WIDTH}' height='{height}' rx='6' fill='white' stroke='#999'/>\n"
    ));
    body.push_str(&format!(
        "    <text x='{:.1}' y='{:.1}' text-anchor='middle' font-family='sans-serif' font-size='13' font-weight='bold'>{}</text>\n",
        WIDTH / 2.0,
        PAD + 10.0,
        xml_escape(LEGEND_TITLE)
    ));

    for (i, band) in DEPTH_BANDS.iter().enumerate() {
        let color = color_for(band.lower);
        let y = PAD + TITLE_H + i as f64 * ROW_H;
        body.push_str(&format!(
            "    <rect x='{PAD}' y='{y:.1}' width='{SWATCH_W}' height='{SWATCH_H}' fill='{color}' stroke='#666' stroke-width='0.5'/>\n"
        ));
        body.push_str(&format!(
            "    <text x='{:.1}' y='{:.1}' font-family='sans-serif' font-size='12'>{}</text>\n",
            PAD + SWATCH_W + 8.0,
            y + SWATCH_H - 3.0,
            xml_escape(&band_label(band))
        ));
    }

    Overlay {
        width: WIDTH,
        height,
        body,
    }
}

/// Attach the legend to the map's bottom-right corner. Calling this
/// twice stacks two legends; nothing deduplicates them.
pub fn install(map: &mut impl MapSurface) {
    map.add_control(ControlPosition::BottomRight, build());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swatch_colors_match_the_encoder_exactly() {
        let expected = [
            color_for(0.0),
            color_for(10.0),
            color_for(30.0),
            color_for(50.0),
            color_for(70.0),
            color_for(90.0),
        ];
        let overlay = build();
        // Swatches appear in band order; assert each color shows up
        // after the previous one.
        let mut cursor = 0;
        for color in expected {
            let at = overlay.body[cursor..]
                .find(color)
                .unwrap_or_else(|| panic!("legend is missing swatch {color}"));
            cursor += at + color.len();
        }
    }

    #[test]
    fn labels_follow_the_band_bounds() {
        let labels: Vec<String> = DEPTH_BANDS.iter().map(band_label).collect();
        assert_eq!(
            labels,
            [
                "0 - 10 km",
                "10 - 30 km",
                "30 - 50 km",
                "50 - 70 km",
                "70 - 90 km",
                "90+ km"
            ]
        );
        let overlay = build();
        for label in &labels {
            assert!(overlay.body.contains(label.as_str()));
        }
    }

    #[test]
    fn legend_carries_its_title() {
        assert!(build().body.contains(LEGEND_TITLE));
    }
}
