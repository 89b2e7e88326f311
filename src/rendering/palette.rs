// src/rendering/palette.rs

use plotters::style::colors::colormaps::ViridisRGB;
use plotters::style::RGBColor;

/// Spectral4: blue, green, orange, red
pub const SPECTRAL4: [(f64, f64, f64); 4] = [
    (0x2b as f64 / 255.0, 0x83 as f64 / 255.0, 0xba as f64 / 255.0),
    (0xab as f64 / 255.0, 0xdd as f64 / 255.0, 0xa4 as f64 / 255.0),
    (0xfd as f64 / 255.0, 0xae as f64 / 255.0, 0x61 as f64 / 255.0),
    (0xd7 as f64 / 255.0, 0x19 as f64 / 255.0, 0x1c as f64 / 255.0),
];

pub const EDGE_GREY: (f64, f64, f64) = (0.8, 0.8, 0.8);
pub const FIREBRICK: (f64, f64, f64) = (0.698, 0.133, 0.133);

/// Viridis colour for `t` in [0, 1] (clamped; NaN maps to the low end).
pub fn viridis(t: f64) -> (f64, f64, f64) {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let RGBColor(r, g, b) = ViridisRGB::get_color(t);
    (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0)
}

/// Linear colour mapping of `value` over `[low, high]`.
pub fn map_linear(value: f64, low: f64, high: f64) -> (f64, f64, f64) {
    let span = high - low;
    if span.abs() < f64::EPSILON {
        return viridis(0.5);
    }
    viridis((value - low) / span)
}

pub fn to_rgb8(c: (f64, f64, f64)) -> (u8, u8, u8) {
    let q = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    (q(c.0), q(c.1), q(c.2))
}
