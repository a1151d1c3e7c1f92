//! Synthetic hands for the keyboard simulator and for tests.
//!
//! Geometry is laid out around the palm centre (landmark 9), which sits
//! exactly at the pose's `at(x, y)` position.  Offsets are chosen so the
//! classifier reads every pose unambiguously.

use crate::flags::Finger;
use crate::landmark::{Hand, Landmark, LANDMARK_COUNT};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Thumb {
    Tucked,
    Splayed,
    Raised,
}

/// Builder for a single synthetic [`Hand`].
#[derive(Clone, Debug, PartialEq)]
pub struct HandPose {
    centre: (f32, f32),
    thumb:  Thumb,
    /// Index, middle, ring, pinky.
    fingers: [bool; 4],
}

// (dx, dy) offsets from the palm centre.
const WRIST: (f32, f32) = (0.0, 0.15);

const THUMB_TUCKED:  [(f32, f32); 4] = [(-0.04, 0.10), (-0.05, 0.06), (-0.03, 0.03), (0.0, 0.04)];
const THUMB_SPLAYED: [(f32, f32); 4] = [(-0.06, 0.10), (-0.10, 0.06), (-0.14, 0.02), (-0.18, -0.01)];
const THUMB_RAISED:  [(f32, f32); 4] = [(-0.04, 0.10), (-0.06, 0.04), (-0.06, -0.04), (-0.06, -0.12)];

const FINGER_X: [f32; 4] = [-0.035, 0.0, 0.035, 0.07];
const FINGER_MCP_Y: [f32; 4] = [0.0, 0.0, 0.0, 0.01];
const FINGER_OPEN:   [f32; 3] = [-0.06, -0.10, -0.13];
const FINGER_CURLED: [f32; 3] = [-0.05, -0.02, 0.01];

impl HandPose {
    /// Every finger curled, thumb tucked.
    pub fn fist() -> Self {
        HandPose { centre: (0.5, 0.5), thumb: Thumb::Tucked, fingers: [false; 4] }
    }

    pub fn open_palm() -> Self {
        HandPose::fingers(5)
    }

    /// `count` open fingers: index first, then middle, ring, pinky, and the
    /// thumb last.  Counts above 5 clamp to 5.
    pub fn fingers(count: u8) -> Self {
        let count = count.min(5) as usize;
        let mut pose = HandPose::fist();
        for (i, open) in pose.fingers.iter_mut().enumerate() {
            *open = i < count;
        }
        if count == 5 {
            pose.thumb = Thumb::Splayed;
        }
        pose
    }

    /// Only the thumb, splayed sideways: counts as one finger.
    pub fn thumb_only() -> Self {
        HandPose::fist().with_finger(Finger::Thumb, true)
    }

    pub fn thumbs_up() -> Self {
        HandPose { thumb: Thumb::Raised, ..HandPose::fist() }
    }

    /// Place the palm centre at `(x, y)` in normalised image coordinates.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.centre = (x, y);
        self
    }

    pub fn with_finger(mut self, finger: Finger, open: bool) -> Self {
        match finger {
            Finger::Thumb => self.thumb = if open { Thumb::Splayed } else { Thumb::Tucked },
            other => self.fingers[other as usize - 1] = open,
        }
        self
    }

    pub fn centre(&self) -> (f32, f32) {
        self.centre
    }

    pub fn build(&self) -> Hand {
        let (cx, cy) = self.centre;
        let at = |(dx, dy): (f32, f32)| Landmark::new(cx + dx, cy + dy, 0.0);

        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[0] = at(WRIST);

        let thumb = match self.thumb {
            Thumb::Tucked  => &THUMB_TUCKED,
            Thumb::Splayed => &THUMB_SPLAYED,
            Thumb::Raised  => &THUMB_RAISED,
        };
        for (j, &offset) in thumb.iter().enumerate() {
            points[1 + j] = at(offset);
        }

        for f in 0..4 {
            let base = 5 + f * 4;
            let x = FINGER_X[f];
            points[base] = at((x, FINGER_MCP_Y[f]));
            let joints = if self.fingers[f] { &FINGER_OPEN } else { &FINGER_CURLED };
            for (j, &dy) in joints.iter().enumerate() {
                points[base + 1 + j] = at((x, dy));
            }
        }
        Hand::new(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::PALM_CENTRE;

    #[test]
    fn palm_centre_sits_at_requested_position() {
        let hand = HandPose::open_palm().at(0.2, 0.7).build();
        let c = hand[PALM_CENTRE];
        assert!((c.x - 0.2).abs() < 1e-6 && (c.y - 0.7).abs() < 1e-6);
    }

    #[test]
    fn fingers_clamp_above_five() {
        assert_eq!(HandPose::fingers(9), HandPose::open_palm());
    }

    #[test]
    fn with_finger_toggles_thumb_and_others() {
        let pose = HandPose::fist().with_finger(Finger::Ring, true).with_finger(Finger::Thumb, true);
        assert_eq!(pose.fingers, [false, false, true, false]);
        assert_eq!(pose.thumb, Thumb::Splayed);
    }
}
