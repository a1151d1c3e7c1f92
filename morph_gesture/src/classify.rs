//! Single-frame reading of up to two hands.  Pure: no memory across frames.

use crate::flags::HandGestureFlags;
use crate::landmark::{Hand, PALM_CENTRE};

/// Wrist separation below which two-hand zoom stays at 1.0.
pub const ZOOM_BASE_DISTANCE: f32 = 0.2;

/// Zoom gained per unit of wrist separation beyond the base distance.
pub const ZOOM_GAIN: f32 = 1.5;

/// What this frame says about zoom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ZoomInput {
    /// Two hands, not rotating: zoom is set directly.
    Set(f32),
    /// Fewer than two hands, not rotating: ease back toward 1.0.
    Ease,
    /// Rotating: leave zoom where it is.
    Frozen,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    None,
    /// Switch to the shape for this finger count (always 1..=5).
    FingerCount(u8),
    /// Thumbs-up: advance to the next set.
    SetSwitch,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReading {
    pub hand_count:    usize,
    pub rotation_mode: bool,
    /// Orientation input from the primary hand; `None` keeps the previous
    /// value (zero hands, or a lone fist with no primary).
    pub orientation:   Option<(f32, f32)>,
    pub zoom:          ZoomInput,
    pub selection:     Selection,
}

/// Map a palm centre in `[0, 1]²` to orientation in `[-1, 1]²`, mirrored so
/// moving the hand right turns the cloud right.
pub fn orientation_of(hand: &Hand) -> (f32, f32) {
    let p = hand[PALM_CENTRE];
    let map = |c: f32| ((c - 0.5) * -2.0).clamp(-1.0, 1.0);
    (map(p.x), map(p.y))
}

/// Zoom from the planar wrist distance of two hands.
pub fn zoom_from_wrists(a: &Hand, b: &Hand) -> f32 {
    let d = a.wrist().planar_distance(&b.wrist());
    if d < ZOOM_BASE_DISTANCE {
        1.0
    } else {
        1.0 + (d - ZOOM_BASE_DISTANCE) * ZOOM_GAIN
    }
}

fn finger_signal(count: u8) -> Selection {
    match count {
        1..=5 => Selection::FingerCount(count),
        _ => Selection::None,
    }
}

/// Read one frame.  Only the first two hands are considered; an empty slice
/// yields a neutral reading with no orientation.
pub fn classify(hands: &[Hand]) -> FrameReading {
    match hands {
        [] => FrameReading {
            hand_count:    0,
            rotation_mode: false,
            orientation:   None,
            zoom:          ZoomInput::Ease,
            selection:     Selection::None,
        },
        [hand] => classify_one(hand),
        [a, b, ..] => classify_two(a, b),
    }
}

fn classify_one(hand: &Hand) -> FrameReading {
    let flags = HandGestureFlags::of(hand);
    if flags.is_fist {
        // Rotation on, but with no second hand there is nothing to steer by.
        return FrameReading {
            hand_count:    1,
            rotation_mode: true,
            orientation:   None,
            zoom:          ZoomInput::Frozen,
            selection:     Selection::None,
        };
    }
    let selection = if flags.is_thumbs_up {
        Selection::SetSwitch
    } else {
        finger_signal(flags.count())
    };
    FrameReading {
        hand_count:    1,
        rotation_mode: false,
        orientation:   Some(orientation_of(hand)),
        zoom:          ZoomInput::Ease,
        selection,
    }
}

fn classify_two(a: &Hand, b: &Hand) -> FrameReading {
    let fa = HandGestureFlags::of(a);
    let fb = HandGestureFlags::of(b);

    // Exactly one fist turns the other hand into the steering hand.  Two
    // fists are read like any other pair.
    let primary = match (fa.is_fist, fb.is_fist) {
        (true, false) => Some(b),
        (false, true) => Some(a),
        _ => None,
    };
    if let Some(primary) = primary {
        return FrameReading {
            hand_count:    2,
            rotation_mode: true,
            orientation:   Some(orientation_of(primary)),
            zoom:          ZoomInput::Frozen,
            selection:     Selection::None,
        };
    }

    let selection = if fa.is_thumbs_up && fb.is_thumbs_up {
        Selection::SetSwitch
    } else if fa.count() == fb.count() {
        let count = fa.count();
        if count == 1 && (fa.thumb_open() || fb.thumb_open()) {
            Selection::None
        } else {
            finger_signal(count)
        }
    } else {
        Selection::None
    };

    FrameReading {
        hand_count:    2,
        rotation_mode: false,
        orientation:   Some(orientation_of(a)),
        zoom:          ZoomInput::Set(zoom_from_wrists(a, b)),
        selection,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::HandPose;

    fn hand(pose: HandPose) -> Hand {
        pose.build()
    }

    #[test]
    fn no_hands_is_neutral() {
        let r = classify(&[]);
        assert_eq!(r.hand_count, 0);
        assert!(!r.rotation_mode);
        assert_eq!(r.orientation, None);
        assert_eq!(r.selection, Selection::None);
    }

    #[test]
    fn single_hand_counts_fingers() {
        let r = classify(&[hand(HandPose::fingers(3).at(0.25, 0.75))]);
        assert_eq!(r.selection, Selection::FingerCount(3));
        assert_eq!(r.zoom, ZoomInput::Ease);
        let (x, y) = r.orientation.unwrap();
        assert!((x - 0.5).abs() < 1e-6);
        assert!((y + 0.5).abs() < 1e-6);
    }

    #[test]
    fn single_open_hand_without_fingers_selects_nothing() {
        // Zero count but thumb raised high enough to not be a fist.
        let mut points = *HandPose::fist().build().points();
        points[crate::landmark::THUMB_IP].y = 0.55;
        points[crate::landmark::THUMB_TIP].y = 0.495;
        let r = classify(&[Hand::new(points)]);
        assert!(!r.rotation_mode);
        assert_eq!(r.selection, Selection::None);
    }

    #[test]
    fn single_thumbs_up_requests_set_switch() {
        let r = classify(&[hand(HandPose::thumbs_up())]);
        assert_eq!(r.selection, Selection::SetSwitch);
        assert!(!r.rotation_mode);
    }

    #[test]
    fn single_fist_rotates_without_primary() {
        let r = classify(&[hand(HandPose::fist())]);
        assert!(r.rotation_mode);
        assert_eq!(r.orientation, None);
        assert_eq!(r.zoom, ZoomInput::Frozen);
        assert_eq!(r.selection, Selection::None);
    }

    #[test]
    fn fist_makes_other_hand_primary() {
        let fist = hand(HandPose::fist().at(0.8, 0.5));
        let steer = hand(HandPose::open_palm().at(0.25, 0.5));
        for pair in [[fist.clone(), steer.clone()], [steer.clone(), fist.clone()]] {
            let r = classify(&pair);
            assert!(r.rotation_mode);
            assert_eq!(r.orientation, Some(orientation_of(&steer)));
            assert_eq!(r.zoom, ZoomInput::Frozen);
            assert_eq!(r.selection, Selection::None);
        }
    }

    #[test]
    fn two_fists_do_not_rotate() {
        let r = classify(&[hand(HandPose::fist().at(0.3, 0.5)), hand(HandPose::fist().at(0.7, 0.5))]);
        assert!(!r.rotation_mode);
        assert_eq!(r.selection, Selection::None);
        match r.zoom {
            ZoomInput::Set(z) => assert!((z - 1.3).abs() < 1e-5, "zoom {}", z),
            other => panic!("expected zoom, got {:?}", other),
        }
        let (x, _) = r.orientation.unwrap();
        assert!((x - 0.4).abs() < 1e-5);
    }

    #[test]
    fn two_hands_matching_counts_signal() {
        for n in 2..=5 {
            let r = classify(&[
                hand(HandPose::fingers(n).at(0.3, 0.5)),
                hand(HandPose::fingers(n).at(0.7, 0.5)),
            ]);
            assert_eq!(r.selection, Selection::FingerCount(n));
        }
    }

    #[test]
    fn two_hands_mismatched_counts_select_nothing() {
        let r = classify(&[hand(HandPose::fingers(2)), hand(HandPose::fingers(3))]);
        assert_eq!(r.selection, Selection::None);
    }

    #[test]
    fn two_hands_count_one_needs_index_not_thumb() {
        let index_one = classify(&[hand(HandPose::fingers(1)), hand(HandPose::fingers(1))]);
        assert_eq!(index_one.selection, Selection::FingerCount(1));

        let thumb_one = classify(&[hand(HandPose::thumb_only()), hand(HandPose::fingers(1))]);
        assert_eq!(thumb_one.selection, Selection::None);
    }

    #[test]
    fn two_thumbs_up_request_set_switch() {
        let r = classify(&[hand(HandPose::thumbs_up().at(0.3, 0.5)), hand(HandPose::thumbs_up().at(0.7, 0.5))]);
        assert_eq!(r.selection, Selection::SetSwitch);
    }

    #[test]
    fn wrist_distance_sets_zoom() {
        let near = classify(&[hand(HandPose::open_palm().at(0.45, 0.5)), hand(HandPose::open_palm().at(0.55, 0.5))]);
        assert_eq!(near.zoom, ZoomInput::Set(1.0));

        let far = classify(&[hand(HandPose::open_palm().at(0.1, 0.5)), hand(HandPose::open_palm().at(0.7, 0.5))]);
        match far.zoom {
            ZoomInput::Set(z) => assert!((z - 1.6).abs() < 1e-5, "zoom {}", z),
            other => panic!("expected zoom, got {:?}", other),
        }
    }

    #[test]
    fn extra_hands_are_ignored() {
        let two = [hand(HandPose::fingers(2)), hand(HandPose::fingers(2))];
        let three = [two[0].clone(), two[1].clone(), hand(HandPose::fist())];
        assert_eq!(classify(&two), classify(&three));
    }
}
