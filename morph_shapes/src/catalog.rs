//! The shape catalogue: one generator function per [`ShapeId`].
//!
//! A generator places particle `i` of `n` and picks its colour.  The two
//! primary uniforms `u`, `v` are drawn before the call (every shape gets
//! them, whether it uses them or not); further draws come from
//! [`ParticleDraw::unit`] and friends.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::color::{Hsl, Rgb};
use crate::library::ShapeLibrary;
use crate::random::RandomSource;
use crate::shape_id::ShapeId;
use crate::technique::*;

// ════════════════════════════════════════════════════════════════════════════
// Generator contract
// ════════════════════════════════════════════════════════════════════════════

/// One generated particle: target position (before zoom) and colour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub color:    Rgb,
}

impl Particle {
    pub fn new(position: Vec3, color: Hsl) -> Self {
        Particle { position, color: color.to_rgb() }
    }
}

/// Per-particle inputs handed to a generator.
pub struct ParticleDraw<'a> {
    pub i: usize,
    pub n: usize,
    pub u: f32,
    pub v: f32,
    rng:   &'a mut dyn RandomSource,
}

impl<'a> ParticleDraw<'a> {
    /// Draws `u` and `v` from `rng`, then hands the rest of the stream to the
    /// generator.
    pub fn new(i: usize, n: usize, rng: &'a mut dyn RandomSource) -> Self {
        let u = rng.unit();
        let v = rng.unit();
        ParticleDraw { i, n, u, v, rng }
    }

    pub fn unit(&mut self) -> f32 { self.rng.unit() }
    pub fn centered(&mut self) -> f32 { self.rng.centered() }
    pub fn angle(&mut self) -> f32 { self.rng.angle() }
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 { self.rng.range(lo, hi) }

    /// `i / n`, the particle's position along the index range.
    pub fn fraction(&self) -> f32 {
        self.i as f32 / self.n.max(1) as f32
    }

    pub fn region(&self, bounds: &[f32]) -> usize {
        region_of(self.i, self.n, bounds)
    }

    pub fn strand(&self, strands: usize) -> usize {
        strand_of(self.i, strands)
    }

    pub fn rng(&mut self) -> &mut dyn RandomSource {
        &mut *self.rng
    }
}

/// A shape generator.  Infallible: lookups fail at library construction,
/// never per particle.
pub type Generator = fn(&mut ParticleDraw<'_>) -> Particle;

/// Register every catalogue shape in `library`.
pub fn register_standard(library: &mut ShapeLibrary) {
    library
        .register(ShapeId::Heart,        heart)
        .register(ShapeId::Saturn,       saturn)
        .register(ShapeId::Flower,       flower)
        .register(ShapeId::Fireworks,    fireworks)
        .register(ShapeId::Sphere,       sphere)
        .register(ShapeId::Helix,        helix)
        .register(ShapeId::Spiral,       spiral)
        .register(ShapeId::Cube,         cube)
        .register(ShapeId::Star,         star)
        .register(ShapeId::Torus,        torus)
        .register(ShapeId::Pyramid,      pyramid)
        .register(ShapeId::Hourglass,    hourglass)
        .register(ShapeId::Atom,         atom)
        .register(ShapeId::Tornado,      tornado)
        .register(ShapeId::Ribbon,       ribbon)
        .register(ShapeId::TrefoilKnot,  trefoil_knot)
        .register(ShapeId::KleinBottle,  klein_bottle)
        .register(ShapeId::Spring,       spring)
        .register(ShapeId::Seashell,     seashell)
        .register(ShapeId::Lissajous,    lissajous)
        .register(ShapeId::VoxelSphere,  voxel_sphere)
        .register(ShapeId::Crystal,      crystal)
        .register(ShapeId::Gear,         gear)
        .register(ShapeId::Crown,        crown)
        .register(ShapeId::Snowflake,    snowflake)
        .register(ShapeId::Mushroom,     mushroom)
        .register(ShapeId::Tree,         tree)
        .register(ShapeId::Jellyfish,    jellyfish)
        .register(ShapeId::Butterfly,    butterfly)
        .register(ShapeId::Cloud,        cloud)
        .register(ShapeId::GyroidShell,  gyroid_shell)
        .register(ShapeId::LatticeCube,  lattice_cube)
        .register(ShapeId::Lantern,      lantern)
        .register(ShapeId::Sponge,       sponge)
        .register(ShapeId::Cage,         cage)
        .register(ShapeId::TwinFlames,   twin_flames)
        .register(ShapeId::MirrorPair,   mirror_pair)
        .register(ShapeId::DoubleTorus,  double_torus)
        .register(ShapeId::TripleHelix,  triple_helix)
        .register(ShapeId::BinaryGalaxy, binary_galaxy);
}

// ════════════════════════════════════════════════════════════════════════════
// Default set
// ════════════════════════════════════════════════════════════════════════════

fn heart(d: &mut ParticleDraw<'_>) -> Particle {
    let t   = PI * (d.unit() * 2.0 - 1.0);
    let phi = d.unit() * PI;
    let x = 16.0 * t.sin().powi(3) * phi.sin();
    let y = (13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos())
        * phi.sin();
    let z = 10.0 * phi.cos();
    let hue = 0.9 + d.unit() * 0.1;
    Particle::new(Vec3::new(x, y, z), Hsl::new(hue, 1.0, 0.5))
}

fn saturn(d: &mut ParticleDraw<'_>) -> Particle {
    if d.region(&[0.3]) == 0 {
        return Particle::new(sphere_point(d.u, d.v, 8.0), Hsl::new(0.1, 0.8, 0.5));
    }
    let angle  = d.angle();
    let radius = 12.0 + d.unit() * 8.0;
    let flat = Vec3::new(angle.cos() * radius, d.centered(), angle.sin() * radius);
    let hue = 0.6 + d.unit() * 0.2;
    Particle::new(rotate_x(flat, 0.4), Hsl::new(hue, 0.8, 0.7))
}

fn flower(d: &mut ParticleDraw<'_>) -> Particle {
    let theta = d.angle();
    let phi   = d.unit() * PI;
    let r = 10.0 * (1.0 + 0.5 * (5.0 * theta).sin() * phi.sin());
    let p = Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    );
    let hue = d.unit();
    Particle::new(p, Hsl::new(hue, 1.0, 0.6))
}

fn fireworks(d: &mut ParticleDraw<'_>) -> Particle {
    let theta = d.angle();
    let phi   = (d.unit() * 2.0 - 1.0).acos();
    let r     = d.unit().cbrt() * 15.0;
    let twist = theta + r * 2.0;
    let p = Vec3::new(
        r * phi.sin() * twist.cos(),
        r * phi.sin() * twist.sin(),
        r * phi.cos(),
    );
    Particle::new(p, Hsl::new(0.15, 1.0, 0.6))
}

fn sphere(d: &mut ParticleDraw<'_>) -> Particle {
    Particle::new(sphere_point(d.u, d.v, 12.0), Hsl::new(0.6, 1.0, 0.5))
}

// ════════════════════════════════════════════════════════════════════════════
// Advanced set
// ════════════════════════════════════════════════════════════════════════════

fn helix(d: &mut ParticleDraw<'_>) -> Particle {
    let t = d.fraction() * PI * 10.0 - PI * 5.0;
    let even = d.strand(2) == 0;
    let phase = if even { PI } else { 0.0 };
    let p = helix_point(t, 8.0, 2.0, phase) + jitter(d.rng(), 1.0);
    Particle::new(p, Hsl::new(if even { 0.3 } else { 0.8 }, 1.0, 0.5))
}

fn spiral(d: &mut ParticleDraw<'_>) -> Particle {
    let angle  = d.angle();
    let radius = d.unit().sqrt() * 20.0;
    let swept  = angle + radius * 0.1;
    let bulge  = d.centered() * (20.0 - radius) * 0.2;
    let p = Vec3::new(radius * swept.cos(), bulge, radius * swept.sin());
    Particle::new(p, Hsl::new(0.6 + radius * 0.02, 0.8, 0.6))
}

fn cube(d: &mut ParticleDraw<'_>) -> Particle {
    let p = box_point(d.rng(), Vec3::splat(15.0));
    let hue = d.unit();
    Particle::new(p, Hsl::new(hue, 0.2, 0.8))
}

fn star(d: &mut ParticleDraw<'_>) -> Particle {
    let dir = sphere_point(d.u, d.v, 1.0);
    let spikes = ((d.u * PI * 10.0).sin() * (d.v * PI * 10.0).sin()).powi(2) * 15.0;
    Particle::new(dir * (8.0 + spikes), Hsl::new(0.14, 1.0, 0.6))
}

fn torus(d: &mut ParticleDraw<'_>) -> Particle {
    Particle::new(torus_point(d.u, d.v, 12.0, 4.0), Hsl::new(d.u, 1.0, 0.5))
}

// ════════════════════════════════════════════════════════════════════════════
// Expert set
// ════════════════════════════════════════════════════════════════════════════

fn pyramid(d: &mut ParticleDraw<'_>) -> Particle {
    const H: f32 = 20.0;
    const BASE: f32 = 15.0;
    let y = d.centered() * H;
    let progress = (y + H / 2.0) / H;
    let scale = (1.0 - progress) * BASE;
    let x = d.centered() * 2.0 * scale;
    let z = d.centered() * 2.0 * scale;
    Particle::new(Vec3::new(x, y, z), Hsl::new(0.1, 1.0, 0.5))
}

fn hourglass(d: &mut ParticleDraw<'_>) -> Particle {
    const H: f32 = 20.0;
    const R_MAX: f32 = 10.0;
    let y = d.centered() * H;
    let r_here = (y.abs() / (H / 2.0)) * R_MAX;
    let theta = d.angle();
    let r = d.unit().sqrt() * r_here;
    let p = Vec3::new(r * theta.cos(), y, r * theta.sin());
    Particle::new(p, Hsl::new(0.5 + y / H * 0.5, 0.8, 0.6))
}

fn atom(d: &mut ParticleDraw<'_>) -> Particle {
    if d.region(&[0.2]) == 0 {
        return Particle::new(sphere_point(d.u, d.v, 3.0), Hsl::new(0.1, 1.0, 0.5));
    }
    let orbit = d.strand(3) as f32;
    let theta = d.angle();
    let r = 12.0 + d.centered();
    let flat = Vec3::new(r * theta.cos(), 0.0, r * theta.sin());
    Particle::new(rotate_x(flat, orbit * PI / 3.0), Hsl::new(0.6, 1.0, 0.7))
}

fn tornado(d: &mut ParticleDraw<'_>) -> Particle {
    const H: f32 = 25.0;
    const TURNS: f32 = 5.0;
    let t = d.unit() * TURNS * TAU;
    let y = (t / (TURNS * TAU)) * H - H / 2.0;
    let r = 2.0 + (y + H / 2.0) * 0.5 + d.centered() * 2.0;
    let p = Vec3::new(r * t.cos(), y, r * t.sin());
    Particle::new(p, Hsl::new(0.0, 0.0, 0.4 + (y / H + 0.5) * 0.5))
}

fn ribbon(d: &mut ParticleDraw<'_>) -> Particle {
    Particle::new(mobius_point(d.u, d.v, 10.0, 3.0), Hsl::new(d.u, 1.0, 0.5))
}

// ════════════════════════════════════════════════════════════════════════════
// Knots & surfaces
// ════════════════════════════════════════════════════════════════════════════

fn trefoil_knot(d: &mut ParticleDraw<'_>) -> Particle {
    let centre = trefoil_point(d.u * TAU) * 4.5;
    let tube = ball_point(d.rng(), 1.3);
    Particle::new(centre + tube, Hsl::new(d.u, 0.8, 0.55))
}

fn klein_bottle(d: &mut ParticleDraw<'_>) -> Particle {
    let p = klein_point(d.u * TAU, d.v * TAU, 2.5) * 3.5;
    Particle::new(rotate_x(p, PI / 2.0), Hsl::new(0.55 + d.v * 0.3, 0.8, 0.55))
}

fn spring(d: &mut ParticleDraw<'_>) -> Particle {
    const COILS: f32 = 14.0;
    let p = torus_point(d.u, d.u * COILS, 11.0, 3.0) + jitter(d.rng(), 0.6);
    let shade = 0.5 + 0.15 * (d.u * COILS * TAU).sin();
    Particle::new(p, Hsl::new(0.07, 0.9, shade))
}

fn seashell(d: &mut ParticleDraw<'_>) -> Particle {
    let s = d.u * 3.0 * TAU;
    let grow = (0.1 * s).exp() * 0.6;
    let tube = grow * 0.8;
    let b = d.v * TAU;
    let ring = grow + tube * b.cos();
    let p = Vec3::new(ring * s.cos(), grow * 1.2 + tube * b.sin() - 6.0, ring * s.sin());
    Particle::new(p, Hsl::new(0.07, 0.6, 0.45 + 0.35 * d.v))
}

fn lissajous(d: &mut ParticleDraw<'_>) -> Particle {
    let t = d.fraction() * TAU;
    let curve = Vec3::new(
        12.0 * (3.0 * t + PI / 2.0).sin(),
        12.0 * (2.0 * t).sin(),
        12.0 * (5.0 * t).sin(),
    );
    let p = curve + jitter(d.rng(), 0.8);
    Particle::new(p, Hsl::new(d.fraction(), 0.9, 0.6))
}

// ════════════════════════════════════════════════════════════════════════════
// Crystal
// ════════════════════════════════════════════════════════════════════════════

fn voxel_sphere(d: &mut ParticleDraw<'_>) -> Particle {
    let p = quantize(sphere_point(d.u, d.v, 12.0), 2.0);
    Particle::new(p, Hsl::new(0.33, 0.7, 0.35 + 0.3 * (p.y + 12.0) / 24.0))
}

fn crystal(d: &mut ParticleDraw<'_>) -> Particle {
    // Octahedron surface: rescale a direction onto |x|+|y|+|z| = r.
    let dir = sphere_point(d.u, d.v, 1.0);
    let l1 = dir.x.abs() + dir.y.abs() + dir.z.abs();
    let p = dir * (12.0 / l1.max(1e-6));
    let p = quantize(Vec3::new(p.x, p.y * 1.6, p.z), 1.0);
    let hue = 0.5 + d.unit() * 0.1;
    Particle::new(p, Hsl::new(hue, 0.6, 0.75))
}

fn gear(d: &mut ParticleDraw<'_>) -> Particle {
    const HUB: f32 = 3.0;
    let angle = d.angle();
    let outer = crenellate(angle, 16, 10.0, 12.0);
    let r = HUB + d.unit().sqrt() * (outer - HUB);
    let p = Vec3::new(r * angle.cos(), r * angle.sin(), d.centered() * 3.0);
    let shade = 0.55 + d.unit() * 0.2;
    Particle::new(p, Hsl::new(0.1, 0.15, shade))
}

fn crown(d: &mut ParticleDraw<'_>) -> Particle {
    if d.region(&[0.1]) == 0 {
        // Eight jewels round the band.
        let k = d.strand(8) as f32;
        let a = k * TAU / 8.0;
        let centre = Vec3::new(10.3 * a.cos(), 1.5, 10.3 * a.sin());
        return Particle::new(centre + sphere_point(d.u, d.v, 0.8), Hsl::new(0.95, 1.0, 0.5));
    }
    let angle = d.angle();
    let top = crenellate(angle, 8, 3.0, 7.0);
    let y = d.unit() * top;
    let r = 10.0 + d.centered() * 0.6;
    let p = Vec3::new(r * angle.cos(), y, r * angle.sin());
    Particle::new(p, Hsl::new(0.13, 1.0, 0.5 + 0.2 * y / 7.0))
}

fn snowflake(d: &mut ParticleDraw<'_>) -> Particle {
    const ARM: f32 = 12.0;
    // Motif in the fundamental wedge, spine along +x.
    let (mx, my) = if d.unit() < 0.5 {
        (d.unit() * ARM, d.unit() * 0.4)
    } else {
        let start = [4.0, 7.0, 10.0][d.strand(3)];
        let t = d.unit() * (ARM - start) * 0.55;
        (start + t * 0.5, t * 0.866 + d.centered() * 0.3)
    };
    let r = (mx * mx + my * my).sqrt();
    let wedge = fold_angle(polar_angle(mx, my.abs()), 6);
    let a = unfold_angle(wedge, d.u * TAU, 6);
    let p = Vec3::new(r * a.cos(), r * a.sin(), d.centered() * 0.5);
    Particle::new(p, Hsl::new(0.55, 0.5, 0.85))
}

// ════════════════════════════════════════════════════════════════════════════
// Nature
// ════════════════════════════════════════════════════════════════════════════

fn mushroom(d: &mut ParticleDraw<'_>) -> Particle {
    if d.region(&[0.35]) == 0 {
        let a = d.angle();
        let y = -10.0 + d.unit() * 12.0;
        let p = Vec3::new(2.2 * a.cos(), y, 2.2 * a.sin());
        return Particle::new(p, Hsl::new(0.1, 0.3, 0.8));
    }
    // Upper hemisphere cap.
    let theta = d.u * TAU;
    let phi = d.v.acos();
    let p = Vec3::new(
        9.0 * phi.sin() * theta.cos(),
        2.0 + 9.0 * phi.cos() * 0.7,
        9.0 * phi.sin() * theta.sin(),
    );
    let spot = value_noise(p * 0.45) > 0.3;
    Particle::new(p, Hsl::new(0.0, 0.85, if spot { 0.9 } else { 0.45 }))
}

fn tree(d: &mut ParticleDraw<'_>) -> Particle {
    if d.region(&[0.2]) == 0 {
        let a = d.angle();
        let y = -12.0 + d.unit() * 10.0;
        let p = Vec3::new(1.2 * a.cos(), y, 1.2 * a.sin());
        return Particle::new(p, Hsl::new(0.08, 0.6, 0.3));
    }
    let canopy = perturb(ball_point(d.rng(), 8.0), 0.25, 3.0);
    let hue = 0.28 + d.unit() * 0.08;
    Particle::new(canopy + Vec3::new(0.0, 3.0, 0.0), Hsl::new(hue, 0.7, 0.35))
}

fn jellyfish(d: &mut ParticleDraw<'_>) -> Particle {
    if d.region(&[0.45]) == 0 {
        let theta = d.u * TAU;
        let phi = d.v.acos();
        let r = modulated_radius(9.0, 0.08, 8, theta);
        let p = Vec3::new(
            r * phi.sin() * theta.cos(),
            2.0 + r * phi.cos() * 0.8,
            r * phi.sin() * theta.sin(),
        );
        return Particle::new(p, Hsl::new(0.85, 0.8, 0.65));
    }
    let k = d.strand(8) as f32;
    let a = k * TAU / 8.0;
    let t = d.unit();
    let sway = (t * 8.0 + k).sin() * 1.2;
    let p = Vec3::new((6.0 + sway) * a.cos(), 2.0 - t * 18.0, (6.0 + sway) * a.sin());
    Particle::new(p + jitter(d.rng(), 0.3), Hsl::new(0.75, 0.7, 0.55 + 0.3 * (1.0 - t)))
}

fn butterfly(d: &mut ParticleDraw<'_>) -> Particle {
    const FLAP: f32 = 0.35;
    if d.region(&[0.08]) == 0 {
        let p = Vec3::new(0.0, d.centered() * 10.0, 0.0) + jitter(d.rng(), 0.6);
        return Particle::new(p, Hsl::new(0.08, 0.4, 0.15));
    }
    // Butterfly curve, filled towards its outline; one wing per parity.
    let theta = d.u * TAU;
    let r = theta.sin().exp() - 2.0 * (4.0 * theta).cos();
    let fill = d.v.sqrt();
    let wx = (r * theta.cos() * fill * 3.0).abs();
    let wy = r * theta.sin() * fill * 3.0;
    let side = parity_sign(d.i);
    let p = Vec3::new(side * wx * FLAP.cos(), wy, wx * FLAP.sin());
    Particle::new(p, Hsl::new(0.08 + 0.1 * fill, 1.0, 0.55))
}

fn cloud(d: &mut ParticleDraw<'_>) -> Particle {
    const PUFFS: [(f32, f32, f32, f32); 5] = [
        (0.0, 0.0, 0.0, 7.0),
        (-7.0, -1.5, 1.0, 5.0),
        (7.0, -1.0, -1.0, 5.5),
        (-3.0, 3.5, -2.0, 4.5),
        (3.5, 3.0, 2.0, 4.0),
    ];
    let (cx, cy, cz, r) = PUFFS[d.strand(PUFFS.len())];
    let local = perturb(sphere_point(d.u, d.v, r), 0.35, 1.8);
    let shade = 0.85 + d.unit() * 0.1;
    Particle::new(Vec3::new(cx, cy, cz) + local, Hsl::new(0.6, 0.15, shade))
}

// ════════════════════════════════════════════════════════════════════════════
// Lattice
// ════════════════════════════════════════════════════════════════════════════

fn gyroid_shell(d: &mut ParticleDraw<'_>) -> Particle {
    let p = sphere_point(d.u, d.v, 12.0);
    let field = gyroid(p, 0.6);
    let kept = subtract(p, 0.4 - field.abs(), 0.0);
    Particle::new(kept, Hsl::new(0.45 + 0.1 * field, 0.9, 0.55))
}

fn lattice_cube(d: &mut ParticleDraw<'_>) -> Particle {
    let p = quantize(box_point(d.rng(), Vec3::splat(12.0)), 3.0) + jitter(d.rng(), 0.25);
    Particle::new(p, Hsl::new(0.55 + (p.x + 12.0) / 24.0 * 0.3, 0.8, 0.6))
}

fn lantern(d: &mut ParticleDraw<'_>) -> Particle {
    let theta = d.u * TAU;
    let phi = (2.0 * d.v - 1.0).acos();
    let shell = Vec3::new(
        9.0 * phi.sin() * theta.cos(),
        12.0 * phi.cos(),
        9.0 * phi.sin() * theta.sin(),
    );
    let rib = (8.0 * theta).sin().abs() < 0.25 || (6.0 * phi).sin().abs() < 0.15;
    if rib {
        return Particle::new(shell, Hsl::new(0.05, 0.9, 0.5));
    }
    // Masked-out shell points fall into a glowing core.
    Particle::new(ball_point(d.rng(), 1.5), Hsl::new(0.12, 1.0, 0.75))
}

fn sponge(d: &mut ParticleDraw<'_>) -> Particle {
    let p = box_point(d.rng(), Vec3::splat(12.0));
    let kept = subtract(p, menger_field(p, 12.0, 2), 0.5);
    let hue = 0.6 - 0.2 * (kept.length() / 20.0);
    Particle::new(kept, Hsl::new(hue, 0.7, 0.55))
}

fn cage(d: &mut ParticleDraw<'_>) -> Particle {
    const HALF: f32 = 12.0;
    let edge = d.strand(12);
    let axis = edge / 4;
    let corner = edge % 4;
    let a = if corner & 1 == 0 { -HALF } else { HALF };
    let b = if corner & 2 == 0 { -HALF } else { HALF };
    let t = d.centered() * 2.0 * HALF;
    let p = match axis {
        0 => Vec3::new(t, a, b),
        1 => Vec3::new(a, t, b),
        _ => Vec3::new(a, b, t),
    };
    Particle::new(p + jitter(d.rng(), 0.5), Hsl::new(0.58, 0.3, 0.7))
}

// ════════════════════════════════════════════════════════════════════════════
// Twins
// ════════════════════════════════════════════════════════════════════════════

fn twin_flames(d: &mut ParticleDraw<'_>) -> Particle {
    let side = parity_sign(d.i);
    let rise = d.unit().powf(0.7);
    let y = rise * 20.0 - 8.0;
    let width = (1.0 - rise) * 4.0 * d.unit().sqrt();
    let a = d.angle();
    let base = Vec3::new(side * 6.0 + width * a.cos(), y, width * a.sin());
    let p = base + Vec3::new(value_noise(base * 0.3) * 1.5 * rise, 0.0, 0.0);
    let hue = if side > 0.0 { 0.05 + 0.08 * rise } else { 0.6 + 0.08 * rise };
    Particle::new(p, Hsl::new(hue, 1.0, 0.5 + 0.1 * rise))
}

fn mirror_pair(d: &mut ParticleDraw<'_>) -> Particle {
    let side = parity_sign(d.i);
    let t = d.unit();
    let sweep = side * t * 3.0 * TAU;
    let r = 2.0 + t * 8.0;
    let p = Vec3::new(r * sweep.cos(), side * (2.0 + t * 10.0), r * sweep.sin())
        + jitter(d.rng(), 0.6);
    Particle::new(p, Hsl::new(if side > 0.0 { 0.95 } else { 0.45 }, 0.9, 0.6))
}

fn double_torus(d: &mut ParticleDraw<'_>) -> Particle {
    let side = parity_sign(d.i);
    let ring = torus_point(d.u, d.v, 7.0, 2.2);
    // The second ring stands upright so the pair interlocks like chain links.
    let ring = if side > 0.0 { ring } else { rotate_x(ring, PI / 2.0) };
    let p = ring + Vec3::new(side * 4.5, 0.0, 0.0);
    Particle::new(p, Hsl::new(if side > 0.0 { 0.0 } else { 0.55 }, 0.85, 0.55))
}

fn triple_helix(d: &mut ParticleDraw<'_>) -> Particle {
    let k = d.strand(3) as f32;
    let t = d.fraction() * PI * 8.0 - PI * 4.0;
    let p = helix_point(t, 7.0, 1.6, k * TAU / 3.0) + jitter(d.rng(), 0.8);
    Particle::new(p, Hsl::new(k / 3.0, 1.0, 0.55))
}

fn binary_galaxy(d: &mut ParticleDraw<'_>) -> Particle {
    let side = parity_sign(d.i);
    let radius = d.unit().sqrt() * 9.0;
    let arm = if d.unit() < 0.5 { 0.0 } else { PI };
    let a = arm + radius * 0.35 + d.centered() * 0.4;
    let disc = Vec3::new(radius * a.cos(), d.centered() * (9.0 - radius) * 0.15, radius * a.sin());
    let p = rotate_z(disc, side * 0.5) + Vec3::new(side * 10.0, 0.0, 0.0);
    let hue = if side > 0.0 { 0.6 } else { 0.08 };
    Particle::new(p, Hsl::new(hue, 0.8, 0.8 - radius * 0.04))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{RngSource, SequenceSource};

    fn run(gen: Generator, n: usize, seed: u64) -> Vec<Particle> {
        let mut rng = RngSource::seeded(seed);
        (0..n).map(|i| gen(&mut ParticleDraw::new(i, n, &mut rng))).collect()
    }

    #[test]
    fn draw_consumes_u_v_first() {
        let mut seq = SequenceSource::new(vec![0.1, 0.2, 0.3]);
        let mut draw = ParticleDraw::new(0, 10, &mut seq);
        assert_eq!((draw.u, draw.v), (0.1, 0.2));
        assert_eq!(draw.unit(), 0.3);
    }

    #[test]
    fn saturn_splits_body_and_rings() {
        let pts = run(saturn, 1_000, 1);
        let body: Vec<_> = pts[..300].iter().map(|p| p.position.length()).collect();
        assert!(body.iter().all(|r| (r - 8.0).abs() < 1e-3));
        // Rings sit between radius 12 and 20 (plus a little tilted thickness).
        assert!(pts[300..].iter().all(|p| {
            let r = p.position.length();
            (11.9..=20.1).contains(&r)
        }));
    }

    #[test]
    fn helix_strands_alternate_colour() {
        let pts = run(helix, 10, 2);
        assert_ne!(pts[0].color, pts[1].color);
        assert_eq!(pts[0].color, pts[2].color);
    }

    #[test]
    fn atom_orbits_share_radius() {
        let pts = run(atom, 3_000, 3);
        for p in &pts[600..] {
            let r = p.position.length();
            assert!((11.4..=12.6).contains(&r), "electron at radius {}", r);
        }
    }

    #[test]
    fn pyramid_narrows_towards_tip() {
        for p in run(pyramid, 2_000, 4) {
            let progress = (p.position.y + 10.0) / 20.0;
            let half = (1.0 - progress) * 15.0;
            assert!(p.position.x.abs() <= half + 1e-3);
            assert!(p.position.z.abs() <= half + 1e-3);
        }
    }

    #[test]
    fn voxel_sphere_is_on_grid() {
        for p in run(voxel_sphere, 500, 5) {
            let q = p.position / 2.0;
            assert!((q - q.round()).abs().max_element() < 1e-4);
        }
    }

    #[test]
    fn gyroid_shell_is_perforated() {
        let pts = run(gyroid_shell, 4_000, 6);
        let collapsed = pts.iter().filter(|p| p.position == Vec3::ZERO).count();
        assert!(collapsed > 0 && collapsed < pts.len());
        for p in pts.iter().filter(|p| p.position != Vec3::ZERO) {
            assert!((p.position.length() - 12.0).abs() < 1e-3);
        }
    }

    #[test]
    fn snowflake_has_six_fold_symmetry() {
        // Every point, rotated by 60°, lands near some other point's angle
        // class: check the folded angle distribution instead of matching.
        let pts = run(snowflake, 6_000, 7);
        let mut sectors = [0usize; 6];
        for p in &pts {
            let a = polar_angle(p.position.x, p.position.y);
            sectors[((a / (TAU / 6.0)) as usize).min(5)] += 1;
        }
        for count in sectors {
            assert!((800..=1_200).contains(&count), "sector counts {:?}", sectors);
        }
    }

    #[test]
    fn butterfly_wings_mirror_by_parity() {
        let pts = run(butterfly, 2_000, 8);
        for (i, p) in pts.iter().enumerate().skip(160) {
            if i % 2 == 0 {
                assert!(p.position.x >= 0.0);
            } else {
                assert!(p.position.x <= 0.0);
            }
        }
    }

    #[test]
    fn colours_are_valid_for_every_shape() {
        let mut library = ShapeLibrary::empty();
        register_standard(&mut library);
        let mut rng = RngSource::seeded(9);
        for id in ShapeId::ALL {
            let gen = library.generator(id).unwrap();
            for i in 0..200 {
                let p = gen(&mut ParticleDraw::new(i, 200, &mut rng));
                assert!(p.color.iter().all(|c| (0.0..=1.0).contains(c)), "{} colour {:?}", id, p.color);
                assert!(p.position.is_finite(), "{} produced {:?}", id, p.position);
            }
        }
    }
}
