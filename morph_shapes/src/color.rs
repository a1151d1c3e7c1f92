//! HSL colours and conversion to RGB / packed ARGB.

/// Linear-ish RGB, each channel in `[0, 1]`.
pub type Rgb = [f32; 3];

/// Hue/saturation/lightness, all in `[0, 1]` (hue wraps).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Hsl { h, s, l }
    }

    pub fn to_rgb(self) -> Rgb {
        let h = self.h.rem_euclid(1.0);
        let s = self.s.clamp(0.0, 1.0);
        let l = self.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return [l, l, l];
        }

        let hi = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let lo = 2.0 * l - hi;
        [
            hue_channel(lo, hi, h + 1.0 / 3.0),
            hue_channel(lo, hi, h),
            hue_channel(lo, hi, h - 1.0 / 3.0),
        ]
    }
}

fn hue_channel(lo: f32, hi: f32, mut t: f32) -> f32 {
    if t < 0.0 { t += 1.0; }
    if t > 1.0 { t -= 1.0; }
    if t < 1.0 / 6.0 { return lo + (hi - lo) * 6.0 * t; }
    if t < 0.5       { return hi; }
    if t < 2.0 / 3.0 { return lo + (hi - lo) * 6.0 * (2.0 / 3.0 - t); }
    lo
}

/// Pack an RGB triple into `0xAARRGGBB` with opaque alpha.
pub fn pack_argb(rgb: Rgb) -> u32 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0) as u32;
    0xFF000000 | (c(rgb[0]) << 16) | (c(rgb[1]) << 8) | c(rgb[2])
}
