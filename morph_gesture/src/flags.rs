//! Per-hand finger flags and the two static poses: thumbs-up and fist.

use crate::landmark::*;

/// Horizontal thumb-tip to pinky-MCP spread above which the thumb counts
/// as open.
pub const THUMB_SPLAY: f32 = 0.15;

/// How far above the index MCP the thumb tip must be for a thumbs-up.
pub const THUMB_RAISE: f32 = 0.02;

/// A thumb tip this far above its IP joint rules out a fist.
pub const THUMB_POINTING_UP: f32 = 0.05;

/// Fingers in landmark order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    pub const ALL: [Finger; 5] = [Finger::Thumb, Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky];

    /// `(pip, tip)` for the four non-thumb fingers.
    fn pip_tip(self) -> Option<(usize, usize)> {
        match self {
            Finger::Thumb  => None,
            Finger::Index  => Some((INDEX_PIP, INDEX_TIP)),
            Finger::Middle => Some((MIDDLE_PIP, MIDDLE_TIP)),
            Finger::Ring   => Some((RING_PIP, RING_TIP)),
            Finger::Pinky  => Some((PINKY_PIP, PINKY_TIP)),
        }
    }
}

/// Flags derived from one hand in one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandGestureFlags {
    /// Open flags in [`Finger::ALL`] order.
    pub open:          [bool; 5],
    pub is_thumbs_up:  bool,
    pub is_fist:       bool,
}

impl HandGestureFlags {
    pub fn of(hand: &Hand) -> Self {
        let open = Finger::ALL.map(|f| is_open(hand, f));
        let thumbs_up = is_thumbs_up(hand);
        HandGestureFlags {
            open,
            is_thumbs_up: thumbs_up,
            is_fist:      fist_with(hand, &open, thumbs_up),
        }
    }

    pub fn thumb_open(&self) -> bool {
        self.is_finger_open(Finger::Thumb)
    }

    pub fn is_finger_open(&self, finger: Finger) -> bool {
        self.open[finger as usize]
    }

    /// Number of open fingers, 0–5.
    pub fn count(&self) -> u8 {
        self.open.iter().filter(|&&o| o).count() as u8
    }
}

/// Thumb: spread proxy.  Other fingers: tip above (smaller `y`) the PIP.
pub fn is_open(hand: &Hand, finger: Finger) -> bool {
    match finger.pip_tip() {
        None => (hand[THUMB_TIP].x - hand[PINKY_MCP].x).abs() > THUMB_SPLAY,
        Some((pip, tip)) => hand[tip].y < hand[pip].y,
    }
}

pub fn finger_count(hand: &Hand) -> u8 {
    Finger::ALL.iter().filter(|&&f| is_open(hand, f)).count() as u8
}

/// Four fingers curled, thumb tip above its IP joint and clearly above the
/// index MCP.
pub fn is_thumbs_up(hand: &Hand) -> bool {
    let curled = [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky]
        .iter()
        .filter_map(|f| f.pip_tip())
        .all(|(pip, tip)| hand[tip].y > hand[pip].y);
    let thumb = hand[THUMB_TIP].y;
    curled && thumb < hand[THUMB_IP].y && thumb < hand[INDEX_MCP].y - THUMB_RAISE
}

pub fn is_fist(hand: &Hand) -> bool {
    HandGestureFlags::of(hand).is_fist
}

fn fist_with(hand: &Hand, open: &[bool; 5], thumbs_up: bool) -> bool {
    if thumbs_up {
        return false;
    }
    if hand[THUMB_TIP].y < hand[THUMB_IP].y - THUMB_POINTING_UP {
        return false;
    }
    open.iter().all(|&o| !o)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::HandPose;

    #[test]
    fn open_palm_counts_five() {
        let flags = HandGestureFlags::of(&HandPose::open_palm().build());
        assert_eq!(flags.count(), 5);
        assert!(!flags.is_fist);
        assert!(!flags.is_thumbs_up);
    }

    #[test]
    fn each_finger_count_is_read_back() {
        for n in 0..=5 {
            assert_eq!(finger_count(&HandPose::fingers(n).build()), n);
        }
    }

    #[test]
    fn all_closed_thumb_down_is_fist() {
        let hand = HandPose::fist().build();
        let flags = HandGestureFlags::of(&hand);
        assert_eq!(flags.open, [false; 5]);
        assert!(flags.is_fist);
        assert!(is_fist(&hand));
    }

    #[test]
    fn thumbs_up_is_never_a_fist() {
        let hand = HandPose::thumbs_up().build();
        let flags = HandGestureFlags::of(&hand);
        assert!(flags.is_thumbs_up);
        assert!(!flags.is_fist);
        // The raised thumb is not splayed, so nothing counts as open.
        assert_eq!(flags.count(), 0);
    }

    #[test]
    fn thumbs_up_with_an_open_finger_is_rejected() {
        let hand = HandPose::thumbs_up().with_finger(Finger::Index, true).build();
        assert!(!is_thumbs_up(&hand));
    }

    #[test]
    fn raised_thumb_rules_out_fist_even_without_thumbs_up() {
        // Every flag closed, thumb tip well above its IP joint but not high
        // enough over the index MCP to be a thumbs-up.
        let mut points = *HandPose::fist().build().points();
        points[THUMB_IP].y = points[INDEX_MCP].y + 0.05;
        points[THUMB_TIP].y = points[INDEX_MCP].y - 0.005;
        let hand = Hand::new(points);
        assert_eq!(finger_count(&hand), 0);
        assert!(!is_thumbs_up(&hand));
        assert!(!is_fist(&hand));
    }

    #[test]
    fn thumb_only_is_one_with_thumb_open() {
        let flags = HandGestureFlags::of(&HandPose::thumb_only().build());
        assert_eq!(flags.count(), 1);
        assert!(flags.thumb_open());
        assert!(!flags.is_finger_open(Finger::Index));
    }

    #[test]
    fn fist_and_thumbs_up_are_exclusive_across_poses() {
        let poses = [
            HandPose::fist(),
            HandPose::thumbs_up(),
            HandPose::thumb_only(),
            HandPose::open_palm(),
            HandPose::fingers(2),
            HandPose::fingers(4),
        ];
        for pose in poses {
            let flags = HandGestureFlags::of(&pose.build());
            assert!(!(flags.is_fist && flags.is_thumbs_up), "{:?}", pose);
        }
    }
}
