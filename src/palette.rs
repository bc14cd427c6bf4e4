//! Diverging "coolwarm" color scale and annotation contrast.
use plotters::style::RGBColor;

/// Control points of the cool-to-warm diverging map, evenly spaced on `[0, 1]`.
const COOLWARM: [(u8, u8, u8); 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 221, 221),
    (244, 152, 122),
    (180, 4, 38),
];

/// Neutral color used for undefined (NaN) coefficients.
pub const UNDEFINED: RGBColor = RGBColor(255, 255, 255);

/// Samples the diverging scale at `t` in `[0, 1]`. Values outside are clamped.
///
/// `0.0` is the cool extreme, `0.5` the neutral grey, `1.0` the warm extreme.
pub fn coolwarm(t: f64) -> RGBColor {
    if t.is_nan() {
        return UNDEFINED;
    }
    let t = t.clamp(0.0, 1.0);
    let segments = (COOLWARM.len() - 1) as f64;
    let pos = t * segments;
    let idx = (pos.floor() as usize).min(COOLWARM.len() - 2);
    let frac = pos - idx as f64;

    let (r0, g0, b0) = COOLWARM[idx];
    let (r1, g1, b1) = COOLWARM[idx + 1];
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * frac).round() as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}

/// Maps `value` in `range` onto the scale.
pub fn color_for_value(value: f64, range: (f64, f64)) -> RGBColor {
    let (lo, hi) = range;
    if hi <= lo {
        return coolwarm(0.5);
    }
    coolwarm((value - lo) / (hi - lo))
}

/// Relative luminance of an sRGB color, in `[0, 1]`.
pub fn relative_luminance(color: RGBColor) -> f64 {
    let channel = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * channel(color.0) + 0.7152 * channel(color.1) + 0.0722 * channel(color.2)
}

/// Text color that stays readable on top of `background`.
pub fn annotation_color(background: RGBColor) -> RGBColor {
    if relative_luminance(background) > 0.408 {
        RGBColor(38, 38, 38)
    } else {
        RGBColor(255, 255, 255)
    }
}
