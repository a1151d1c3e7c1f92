//! Cross-frame gesture state: orientation decay, zoom easing and the
//! set-switch debounce.

use std::time::{Duration, Instant};

use log::debug;

use crate::classify::{classify, Selection, ZoomInput};
use crate::landmark::Hand;

/// Orientation multiplier per frame with no hands.
pub const ORIENTATION_DECAY: f32 = 0.95;

/// Zoom easing toward 1.0: `zoom × ZOOM_EASE + (1 − ZOOM_EASE)`, computed on
/// the offset from 1.0 so it never overshoots.
pub const ZOOM_EASE: f32 = 0.9;

pub const DEFAULT_SET_SWITCH_HOLD: Duration = Duration::from_millis(50);

/// Control signals derived from the latest frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlState {
    pub hand_count:                usize,
    pub rotation_mode:             bool,
    pub primary_hand_x:            f32,
    pub primary_hand_y:            f32,
    /// Always `>= 1.0`.
    pub zoom_scale:                f32,
    /// 0 = no shape change, otherwise 1..=5.
    pub shape_switch_finger_count: u8,
    pub set_switch_requested:      bool,
}

impl Default for ControlState {
    fn default() -> Self {
        ControlState {
            hand_count:                0,
            rotation_mode:             false,
            primary_hand_x:            0.0,
            primary_hand_y:            0.0,
            zoom_scale:                1.0,
            shape_switch_finger_count: 0,
            set_switch_requested:      false,
        }
    }
}

/// Result of feeding one frame to the tracker.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureUpdate {
    pub control:          ControlState,
    /// The set-switch request has been held long enough and fired on this
    /// frame.  Fires at most once per continuous hold.
    pub set_switch_fired: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrackerConfig {
    pub set_switch_hold:    Duration,
    /// When false, thumbs-up is still reported but never fires.
    pub set_switch_enabled: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        TrackerConfig { set_switch_hold: DEFAULT_SET_SWITCH_HOLD, set_switch_enabled: true }
    }
}

/// Feeds frames through [`classify`] and keeps the state that must survive
/// between them.
#[derive(Clone, Debug)]
pub struct GestureTracker {
    config:     TrackerConfig,
    x:          f32,
    y:          f32,
    zoom:       f32,
    held_since: Option<Instant>,
    locked:     bool,
    last:       ControlState,
}

impl GestureTracker {
    pub fn new(config: TrackerConfig) -> Self {
        GestureTracker {
            config,
            x:          0.0,
            y:          0.0,
            zoom:       1.0,
            held_since: None,
            locked:     false,
            last:       ControlState::default(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn set_switch_enabled(&mut self, enabled: bool) {
        self.config.set_switch_enabled = enabled;
    }

    /// Latest control state, also what a tick uses between frames.
    pub fn control(&self) -> ControlState {
        self.last
    }

    /// Process one frame captured at `now`.
    pub fn update(&mut self, hands: &[Hand], now: Instant) -> GestureUpdate {
        if hands.len() > 2 {
            debug!("{} hands in frame, using the first two", hands.len());
        }
        let reading = classify(hands);

        if reading.hand_count == 0 {
            self.x *= ORIENTATION_DECAY;
            self.y *= ORIENTATION_DECAY;
            self.ease_zoom();
            self.held_since = None;
            self.locked = false;
        } else {
            if let Some((x, y)) = reading.orientation {
                self.x = x;
                self.y = y;
            }
            match reading.zoom {
                ZoomInput::Set(z) => self.zoom = z.max(1.0),
                ZoomInput::Ease   => self.ease_zoom(),
                ZoomInput::Frozen => {}
            }
        }

        let requested = reading.selection == Selection::SetSwitch;
        let fired = if requested {
            self.debounce(now)
        } else {
            if reading.hand_count > 0 {
                self.held_since = None;
                self.locked = false;
            }
            false
        };

        let finger_count = match reading.selection {
            Selection::FingerCount(n) => n,
            _ => 0,
        };

        self.last = ControlState {
            hand_count:                reading.hand_count,
            rotation_mode:             reading.rotation_mode,
            primary_hand_x:            self.x,
            primary_hand_y:            self.y,
            zoom_scale:                self.zoom,
            shape_switch_finger_count: finger_count,
            set_switch_requested:      requested,
        };
        GestureUpdate { control: self.last, set_switch_fired: fired }
    }

    fn ease_zoom(&mut self) {
        self.zoom = 1.0 + (self.zoom - 1.0) * ZOOM_EASE;
    }

    fn debounce(&mut self, now: Instant) -> bool {
        let since = *self.held_since.get_or_insert(now);
        if self.locked || !self.config.set_switch_enabled {
            return false;
        }
        if now.saturating_duration_since(since) >= self.config.set_switch_hold {
            self.locked = true;
            debug!("set switch fired after {:?}", now.saturating_duration_since(since));
            return true;
        }
        false
    }
}

impl Default for GestureTracker {
    fn default() -> Self {
        GestureTracker::new(TrackerConfig::default())
    }
}
