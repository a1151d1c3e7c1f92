//! Particle animation: whole-cloud rotation and per-particle easing toward
//! the scaled target cloud.
//!
//! Two rotation modes:
//!
//! * **ambient**: a slow constant spin plus a turn rate proportional to the
//!   hand position,
//! * **manual** (fist held): the smoothed hand *motion* drives the angles
//!   directly, so holding still holds the cloud still.
//!
//! Rotation is never baked into positions; the renderer applies
//! [`MorphAnimator::angles`] and the positions stay in model space.

use glam::Vec3;
use morph_gesture::ControlState;
use morph_shapes::technique::box_point;
use morph_shapes::{RandomSource, TargetCloud};

/// Spin per tick in ambient mode with the hand centred.
pub const AMBIENT_SPIN: f32 = 0.002;

/// Ambient turn rate per unit of hand offset.
pub const STEER_GAIN: f32 = 0.02;

/// Low-pass factor applied to the hand position in manual mode.
pub const ROTATION_SMOOTHING: f32 = 0.1;

/// Radians per unit of smoothed hand motion in manual mode.
pub const ROTATION_SENSITIVITY: f32 = 3.5;

/// Fraction of the remaining distance covered per tick.
pub const POSITION_EASING: f32 = 0.05;

/// Particles spawn uniformly in a cube of this half extent.
pub const SPAWN_HALF_EXTENT: f32 = 25.0;

#[derive(Clone, Debug)]
pub struct MorphAnimator {
    positions: Vec<Vec3>,
    angle_x:   f32,
    angle_y:   f32,
    smooth_x:  f32,
    smooth_y:  f32,
    prev_x:    f32,
    prev_y:    f32,
    scale:     f32,
}

impl MorphAnimator {
    pub fn new(count: usize, rng: &mut dyn RandomSource) -> Self {
        let positions = (0..count)
            .map(|_| box_point(rng, Vec3::splat(SPAWN_HALF_EXTENT)))
            .collect();
        MorphAnimator {
            positions,
            angle_x:  0.0,
            angle_y:  0.0,
            smooth_x: 0.0,
            smooth_y: 0.0,
            prev_x:   0.0,
            prev_y:   0.0,
            scale:    1.0,
        }
    }

    /// Advance rotation from `control`, then ease every particle toward
    /// `target × zoom`.
    pub fn tick(&mut self, control: &ControlState, target: &TargetCloud) {
        let (x, y) = (control.primary_hand_x, control.primary_hand_y);

        if control.rotation_mode {
            self.smooth_x += (x - self.smooth_x) * ROTATION_SMOOTHING;
            self.smooth_y += (y - self.smooth_y) * ROTATION_SMOOTHING;
            self.angle_y += (self.smooth_x - self.prev_x) * ROTATION_SENSITIVITY;
            self.angle_x += (self.smooth_y - self.prev_y) * ROTATION_SENSITIVITY;
            self.prev_x = self.smooth_x;
            self.prev_y = self.smooth_y;
        } else {
            self.angle_y += AMBIENT_SPIN + x * STEER_GAIN;
            self.angle_x += y * STEER_GAIN;
            // Keep the trackers on the raw input so entering manual mode
            // starts from zero motion.
            self.smooth_x = x;
            self.smooth_y = y;
            self.prev_x = x;
            self.prev_y = y;
        }

        self.scale = control.zoom_scale;
        debug_assert_eq!(target.len(), self.positions.len(), "target cloud length mismatch");

        let scale = self.scale;
        for (current, &goal) in self.positions.iter_mut().zip(target.positions()) {
            *current += (goal * scale - *current) * POSITION_EASING;
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// `(angle_x, angle_y)` in radians.
    pub fn angles(&self) -> (f32, f32) {
        (self.angle_x, self.angle_y)
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}
