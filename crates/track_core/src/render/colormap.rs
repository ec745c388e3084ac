//! Movement-intensity color ramp.

use image::Rgb;

/// `(position, color)` stops, black → blue → green → yellow → orange → red.
pub const INTENSITY_STOPS: [(f64, [u8; 3]); 6] = [
    (0.0, [0, 0, 0]),
    (0.2, [0, 0, 255]),
    (0.4, [0, 128, 0]),
    (0.6, [255, 255, 0]),
    (0.8, [255, 165, 0]),
    (1.0, [255, 0, 0]),
];

/// Linear interpolation over [`INTENSITY_STOPS`]; `t` is clamped to `[0, 1]`.
pub fn intensity_color(t: f64) -> Rgb<u8> {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    for pair in INTENSITY_STOPS.windows(2) {
        let (t0, c0) = pair[0];
        let (t1, c1) = pair[1];
        if t <= t1 {
            let f = (t - t0) / (t1 - t0);
            return Rgb([
                lerp(c0[0], c1[0], f),
                lerp(c0[1], c1[1], f),
                lerp(c0[2], c1[2], f),
            ]);
        }
    }

    Rgb(INTENSITY_STOPS[INTENSITY_STOPS.len() - 1].1)
}

fn lerp(a: u8, b: u8, f: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * f).round().clamp(0.0, 255.0) as u8
}

/// `alpha * top + (1 - alpha) * bottom`, per channel.
pub fn blend(bottom: Rgb<u8>, top: Rgb<u8>, alpha: f64) -> Rgb<u8> {
    let mix = |b: u8, t: u8| (t as f64 * alpha + b as f64 * (1.0 - alpha)).round() as u8;
    Rgb([
        mix(bottom[0], top[0]),
        mix(bottom[1], top[1]),
        mix(bottom[2], top[2]),
    ])
}
