//! # morph_gesture
//!
//! Turns per-frame hand landmarks (0–2 hands, 21 points each) into the
//! control signals that steer the particle display:
//!
//! * **rotation mode**: a fist on one hand hands steering to the other,
//! * **orientation** from the primary hand's palm centre,
//! * **zoom** from the distance between two open hands' wrists,
//! * **shape selection** from raised-finger counts,
//! * **set switching** from a held thumbs-up.
//!
//! [`classify`](classify::classify) reads a single frame and is pure.
//! [`GestureTracker`] wraps it with everything that spans frames: decay when
//! the hands leave, zoom easing, and the set-switch debounce.
//!
//! ## Quick start
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use morph_gesture::{GestureTracker, pose::HandPose};
//!
//! let mut tracker = GestureTracker::default();
//! let t0 = Instant::now();
//!
//! let update = tracker.update(&[HandPose::fingers(3).build()], t0);
//! assert_eq!(update.control.shape_switch_finger_count, 3);
//!
//! let thumbs = [HandPose::thumbs_up().build()];
//! tracker.update(&thumbs, t0);
//! let held = tracker.update(&thumbs, t0 + Duration::from_millis(60));
//! assert!(held.set_switch_fired);
//! ```

pub mod landmark;
pub mod flags;
pub mod classify;
pub mod tracker;
pub mod pose;

pub use landmark::{Hand, Landmark, LandmarkError, LANDMARK_COUNT};
pub use flags::{Finger, HandGestureFlags};
pub use classify::{classify, FrameReading, Selection, ZoomInput};
pub use tracker::{ControlState, GestureTracker, GestureUpdate, TrackerConfig};
