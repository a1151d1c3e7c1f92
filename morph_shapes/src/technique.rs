//! Composable placement primitives shared by the shape catalogue.
//!
//! Everything here is a plain function of its inputs (plus an explicit
//! [`RandomSource`] where sampling is needed), so shapes are built by
//! composition instead of by copying formulas.

use std::f32::consts::TAU;

use glam::{Mat3, Vec3};

use crate::random::RandomSource;

// ════════════════════════════════════════════════════════════════════════════
// Surface and volume sampling
// ════════════════════════════════════════════════════════════════════════════

/// Map `(u, v)` to a point on a sphere of radius `r` with uniform area
/// density (`θ = 2πu`, `φ = acos(2v − 1)`).
pub fn sphere_point(u: f32, v: f32, r: f32) -> Vec3 {
    let theta = TAU * u;
    let phi = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

/// Uniform point inside a ball of radius `r`.
pub fn ball_point(rng: &mut dyn RandomSource, r: f32) -> Vec3 {
    let (u, v) = (rng.unit(), rng.unit());
    sphere_point(u, v, r * rng.unit().cbrt())
}

/// Uniform point inside an axis-aligned box with the given half extents.
pub fn box_point(rng: &mut dyn RandomSource, half: Vec3) -> Vec3 {
    Vec3::new(
        rng.centered() * 2.0 * half.x,
        rng.centered() * 2.0 * half.y,
        rng.centered() * 2.0 * half.z,
    )
}

/// Small isotropic offset, each axis uniform in `[-amount/2, amount/2)`.
pub fn jitter(rng: &mut dyn RandomSource, amount: f32) -> Vec3 {
    Vec3::new(rng.centered(), rng.centered(), rng.centered()) * amount
}

// ════════════════════════════════════════════════════════════════════════════
// Parametric surfaces and curves (y is up)
// ════════════════════════════════════════════════════════════════════════════

/// Torus lying in the XZ plane; `u`, `v` in `[0, 1)`.
pub fn torus_point(u: f32, v: f32, major: f32, minor: f32) -> Vec3 {
    let (a, b) = (u * TAU, v * TAU);
    let ring = major + minor * b.cos();
    Vec3::new(ring * a.cos(), minor * b.sin(), ring * a.sin())
}

/// Möbius band of centre radius `radius` and half width `half_width`.
pub fn mobius_point(u: f32, v: f32, radius: f32, half_width: f32) -> Vec3 {
    let t = u * TAU;
    let s = (v - 0.5) * 2.0 * half_width;
    let ring = radius + s * (t / 2.0).cos();
    Vec3::new(ring * t.cos(), ring * t.sin(), s * (t / 2.0).sin())
}

/// Trefoil knot centre line, `t` in radians.
pub fn trefoil_point(t: f32) -> Vec3 {
    Vec3::new(
        t.sin() + 2.0 * (2.0 * t).sin(),
        t.cos() - 2.0 * (2.0 * t).cos(),
        -(3.0 * t).sin(),
    )
}

/// Figure-eight immersion of the Klein bottle; `u`, `v` in radians.
pub fn klein_point(u: f32, v: f32, a: f32) -> Vec3 {
    let (hc, hs) = ((u / 2.0).cos(), (u / 2.0).sin());
    let w = a + hc * v.sin() - hs * (2.0 * v).sin();
    Vec3::new(w * u.cos(), w * u.sin(), hs * v.sin() + hc * (2.0 * v).sin())
}

/// Point on a vertical helix at parameter `t`.
pub fn helix_point(t: f32, radius: f32, rise: f32, phase: f32) -> Vec3 {
    Vec3::new(radius * (t + phase).cos(), t * rise, radius * (t + phase).sin())
}

pub fn rotate_x(p: Vec3, angle: f32) -> Vec3 {
    Mat3::from_rotation_x(angle) * p
}

pub fn rotate_z(p: Vec3, angle: f32) -> Vec3 {
    Mat3::from_rotation_z(angle) * p
}

// ════════════════════════════════════════════════════════════════════════════
// Radial / angular modulation
// ════════════════════════════════════════════════════════════════════════════

/// `base × (1 + depth × sin(count × angle))`, for petals and ripples.
pub fn modulated_radius(base: f32, depth: f32, count: u32, angle: f32) -> f32 {
    base * (1.0 + depth * (count as f32 * angle).sin())
}

/// Square-wave radius: `outer` on the first half of each of `teeth` periods,
/// `inner` on the second half.  Gears, battlements, crowns.
pub fn crenellate(angle: f32, teeth: u32, inner: f32, outer: f32) -> f32 {
    let period = TAU / teeth.max(1) as f32;
    if angle.rem_euclid(period) < period * 0.5 { outer } else { inner }
}

// ════════════════════════════════════════════════════════════════════════════
// Region / strand partitioning
// ════════════════════════════════════════════════════════════════════════════

/// Which region particle `i` of `n` falls in, given ascending cumulative
/// fraction bounds.  `region_of(i, n, &[0.3])` is 0 for the first 30 % and 1
/// afterwards.
pub fn region_of(i: usize, n: usize, bounds: &[f32]) -> usize {
    let fraction = i as f32 / n.max(1) as f32;
    bounds.iter().take_while(|&&b| fraction >= b).count()
}

/// Strand index by modulo, for interleaved multi-strand structures.
pub fn strand_of(i: usize, strands: usize) -> usize {
    i % strands.max(1)
}

/// `+1.0` for even strands, `-1.0` for odd: mirrored pairs.
pub fn parity_sign(i: usize) -> f32 {
    if i % 2 == 0 { 1.0 } else { -1.0 }
}

// ════════════════════════════════════════════════════════════════════════════
// Lattice quantization and masking
// ════════════════════════════════════════════════════════════════════════════

/// Snap every coordinate to the nearest multiple of `step`.
pub fn quantize(p: Vec3, step: f32) -> Vec3 {
    if step <= 0.0 {
        return p;
    }
    (p / step).round() * step
}

/// Collapse `p` to the origin when `field < threshold`.
pub fn subtract(p: Vec3, field: f32, threshold: f32) -> Vec3 {
    if field < threshold { Vec3::ZERO } else { p }
}

/// Gyroid implicit surface value at `p` scaled by `freq`; roughly `[-1.5, 1.5]`.
pub fn gyroid(p: Vec3, freq: f32) -> f32 {
    let q = p * freq;
    q.x.sin() * q.y.cos() + q.y.sin() * q.z.cos() + q.z.sin() * q.x.cos()
}

/// `1.0` if `p` survives `levels` iterations of Menger-sponge carving inside
/// a cube of half extent `half`, else `0.0`.
pub fn menger_field(p: Vec3, half: f32, levels: u32) -> f32 {
    // Map into [0, 1)^3, then test each ternary digit.
    let mut q = ((p / half) + Vec3::ONE) * 0.5;
    for _ in 0..levels {
        q *= 3.0;
        let cell = q.floor();
        let middle = [cell.x, cell.y, cell.z]
            .iter()
            .filter(|&&c| c.rem_euclid(3.0) == 1.0)
            .count();
        if middle >= 2 {
            return 0.0;
        }
        q -= cell;
    }
    1.0
}

// ════════════════════════════════════════════════════════════════════════════
// Symmetry folding
// ════════════════════════════════════════════════════════════════════════════

/// Fold an angle into the fundamental wedge `[0, π/sectors]` of a
/// `sectors`-fold dihedral symmetry.
pub fn fold_angle(angle: f32, sectors: u32) -> f32 {
    let width = TAU / sectors.max(1) as f32;
    let local = angle.rem_euclid(width);
    if local > width * 0.5 { width - local } else { local }
}

/// Inverse of [`fold_angle`]: place a wedge angle back into the sector (and
/// mirror half) that `reference` came from.
pub fn unfold_angle(folded: f32, reference: f32, sectors: u32) -> f32 {
    let width = TAU / sectors.max(1) as f32;
    let r = reference.rem_euclid(TAU);
    let base = (r / width).floor() * width;
    let local = r - base;
    if local > width * 0.5 { base + width - folded } else { base + folded }
}

// ════════════════════════════════════════════════════════════════════════════
// Noise
// ════════════════════════════════════════════════════════════════════════════

fn lattice_hash(x: i32, y: i32, z: i32) -> f32 {
    let mut h = (x as u32).wrapping_mul(0x8da6_b343)
        ^ (y as u32).wrapping_mul(0xd816_3841)
        ^ (z as u32).wrapping_mul(0xcb1a_b31f);
    h ^= h >> 13;
    h = h.wrapping_mul(0x5bd1_e995);
    h ^= h >> 15;
    (h & 0x00ff_ffff) as f32 / 0x0080_0000 as f32 - 1.0
}

/// Smooth value noise in `[-1, 1]`, trilinear with smoothstep fade.
pub fn value_noise(p: Vec3) -> f32 {
    let cell = p.floor();
    let f = p - cell;
    let s = f * f * (Vec3::splat(3.0) - 2.0 * f);
    let (x, y, z) = (cell.x as i32, cell.y as i32, cell.z as i32);

    let lerp = |a: f32, b: f32, t: f32| a + (b - a) * t;
    let corner = |dx: i32, dy: i32, dz: i32| lattice_hash(x + dx, y + dy, z + dz);

    let x00 = lerp(corner(0, 0, 0), corner(1, 0, 0), s.x);
    let x10 = lerp(corner(0, 1, 0), corner(1, 1, 0), s.x);
    let x01 = lerp(corner(0, 0, 1), corner(1, 0, 1), s.x);
    let x11 = lerp(corner(0, 1, 1), corner(1, 1, 1), s.x);
    lerp(lerp(x00, x10, s.y), lerp(x01, x11, s.y), s.z)
}

/// Push `p` radially by `amount × noise(p × freq)`.
pub fn perturb(p: Vec3, freq: f32, amount: f32) -> Vec3 {
    let n = value_noise(p * freq);
    let dir = p.normalize_or_zero();
    p + dir * (n * amount)
}

/// Angle of `(x, y)` in `[0, 2π)`.
pub fn polar_angle(x: f32, y: f32) -> f32 {
    y.atan2(x).rem_euclid(TAU)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;
    use crate::random::{RngSource, SequenceSource};

    #[test]
    fn sphere_point_has_radius() {
        let mut rng = RngSource::seeded(3);
        for _ in 0..500 {
            let p = sphere_point(rng.unit(), rng.unit(), 12.0);
            assert!((p.length() - 12.0).abs() < 1e-3);
        }
    }

    #[test]
    fn sphere_sampling_is_not_pole_heavy() {
        // Uniform area density: |z|/r is uniform on [0,1], so about half the
        // points sit below |z| = r/2.
        let mut rng = RngSource::seeded(9);
        let n = 20_000;
        let low = (0..n)
            .filter(|_| sphere_point(rng.unit(), rng.unit(), 1.0).z.abs() < 0.5)
            .count();
        let frac = low as f32 / n as f32;
        assert!((frac - 0.5).abs() < 0.02, "fraction below |z|=0.5 was {}", frac);
    }

    #[test]
    fn ball_stays_inside() {
        let mut rng = RngSource::seeded(5);
        for _ in 0..1_000 {
            assert!(ball_point(&mut rng, 4.0).length() <= 4.0 + 1e-4);
        }
    }

    #[test]
    fn torus_distance_from_ring() {
        let p = torus_point(0.125, 0.3, 12.0, 4.0);
        let ring = (p.x * p.x + p.z * p.z).sqrt() - 12.0;
        assert!(((ring * ring + p.y * p.y).sqrt() - 4.0).abs() < 1e-3);
    }

    #[test]
    fn quantize_snaps_to_grid() {
        let q = quantize(Vec3::new(1.4, -2.6, 0.74), 0.5);
        assert_eq!(q, Vec3::new(1.5, -2.5, 0.5));
        assert_eq!(quantize(Vec3::new(1.3, 0.0, 0.0), 0.0), Vec3::new(1.3, 0.0, 0.0));
    }

    #[test]
    fn regions_partition_by_fraction() {
        let n = 100;
        let counts = (0..n).fold([0usize; 3], |mut acc, i| {
            acc[region_of(i, n, &[0.2, 0.5])] += 1;
            acc
        });
        assert_eq!(counts, [20, 30, 50]);
    }

    #[test]
    fn strands_and_parity() {
        assert_eq!(strand_of(7, 3), 1);
        assert_eq!(parity_sign(4), 1.0);
        assert_eq!(parity_sign(5), -1.0);
    }

    #[test]
    fn crenellation_alternates() {
        assert_eq!(crenellate(0.1, 4, 1.0, 2.0), 2.0);
        assert_eq!(crenellate(TAU / 8.0 + 0.1, 4, 1.0, 2.0), 1.0);
    }

    #[test]
    fn subtract_collapses_below_threshold() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(subtract(p, 0.1, 0.5), Vec3::ZERO);
        assert_eq!(subtract(p, 0.9, 0.5), p);
    }

    #[test]
    fn menger_centre_is_carved() {
        assert_eq!(menger_field(Vec3::ZERO, 12.0, 1), 0.0);
        assert_eq!(menger_field(Vec3::splat(-11.0), 12.0, 2), 1.0);
    }

    #[test]
    fn fold_lands_in_wedge_and_unfolds() {
        let mut rng = RngSource::seeded(11);
        for _ in 0..1_000 {
            let a = rng.range(-10.0, 10.0);
            let f = fold_angle(a, 6);
            assert!((0.0..=PI / 6.0 + 1e-5).contains(&f));
            let back = unfold_angle(f, a, 6);
            assert!((back - a.rem_euclid(TAU)).abs() < 1e-3, "{} -> {} -> {}", a, f, back);
        }
    }

    #[test]
    fn noise_is_bounded_and_continuous() {
        let mut rng = RngSource::seeded(2);
        for _ in 0..2_000 {
            let p = Vec3::new(rng.range(-50.0, 50.0), rng.range(-50.0, 50.0), rng.range(-50.0, 50.0));
            let n = value_noise(p);
            assert!((-1.0..=1.0).contains(&n));
            let m = value_noise(p + Vec3::splat(1e-3));
            assert!((n - m).abs() < 0.05);
        }
    }

    #[test]
    fn jitter_uses_three_draws() {
        let mut seq = SequenceSource::new(vec![0.0, 0.5, 1.0]);
        let j = jitter(&mut seq, 2.0);
        assert_eq!(j, Vec3::new(-1.0, 0.0, 1.0));
        assert_eq!(seq.drawn(), 3);
    }
}
