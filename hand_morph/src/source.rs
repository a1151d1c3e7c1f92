//! Landmark sources: keyboard simulation, JSON Lines replay and (with the
//! `leap` feature) a LeapMotion controller.
//!
//! Every source runs on its own thread and delivers whole frames over an
//! `mpsc` channel, so the main loop never knows where hands came from.

use std::fs;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use morph_gesture::pose::HandPose;
use morph_gesture::Hand;

/// One captured frame: zero or more hands.
pub type Frame = Vec<Hand>;

/// Delay between simulated frames (~30 Hz).
pub const SIM_FRAME_INTERVAL: Duration = Duration::from_millis(33);

// ════════════════════════════════════════════════════════════════════════════
// LandmarkSource trait
// ════════════════════════════════════════════════════════════════════════════

/// Anything that can deliver landmark frames over a channel.
pub trait LandmarkSource: Send + 'static {
    fn name(&self) -> &'static str;

    /// Produce frames until done or until the receiver hangs up.
    fn run(self: Box<Self>, tx: Sender<Frame>);
}

/// Spawn a source on its own thread and return the receiving end.
pub fn spawn_landmark_source<S: LandmarkSource>(source: S) -> Receiver<Frame> {
    let (tx, rx) = mpsc::channel();
    info!("starting {} landmark source", source.name());
    thread::spawn(move || Box::new(source).run(tx));
    rx
}

// ════════════════════════════════════════════════════════════════════════════
// SimLandmarkSource: keyboard simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input from the simulation window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Digits 0–5.
    Fingers(u8),
    Fist,
    ThumbsUp,
    ToggleSecondHand,
    /// Show or withdraw the hands entirely.
    ToggleVisible,
    /// Move the palm by this much in normalised image units.
    Move { dx: f32, dy: f32 },
    /// Widen (positive) or narrow the gap between two hands.
    Spread(f32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SimGesture {
    Fingers(u8),
    Fist,
    ThumbsUp,
}

/// Synthetic hand state driven by [`SimInput`].
#[derive(Clone, Debug, PartialEq)]
pub struct SimHands {
    gesture: SimGesture,
    visible: bool,
    second:  bool,
    centre:  (f32, f32),
    spread:  f32,
}

impl Default for SimHands {
    fn default() -> Self {
        SimHands {
            gesture: SimGesture::Fingers(5),
            visible: true,
            second:  false,
            centre:  (0.5, 0.5),
            spread:  0.3,
        }
    }
}

impl SimHands {
    pub fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Fingers(n)       => self.gesture = SimGesture::Fingers(n.min(5)),
            SimInput::Fist             => self.gesture = SimGesture::Fist,
            SimInput::ThumbsUp         => self.gesture = SimGesture::ThumbsUp,
            SimInput::ToggleSecondHand => self.second = !self.second,
            SimInput::ToggleVisible    => self.visible = !self.visible,
            SimInput::Move { dx, dy }  => {
                self.centre.0 = (self.centre.0 + dx).clamp(0.0, 1.0);
                self.centre.1 = (self.centre.1 + dy).clamp(0.0, 1.0);
            }
            SimInput::Spread(d) => self.spread = (self.spread + d).clamp(0.0, 1.0),
        }
    }

    /// The hands this state describes.  With two hands and a fist, the first
    /// hand clenches and the second (open) hand follows the cursor.
    pub fn frame(&self) -> Frame {
        if !self.visible {
            return Vec::new();
        }
        let (cx, cy) = self.centre;
        let pose = match self.gesture {
            SimGesture::Fingers(n) => HandPose::fingers(n),
            SimGesture::Fist       => HandPose::fist(),
            SimGesture::ThumbsUp   => HandPose::thumbs_up(),
        };
        if !self.second {
            return vec![pose.at(cx, cy).build()];
        }
        let half = self.spread / 2.0;
        match self.gesture {
            SimGesture::Fist => vec![
                HandPose::fist().at(0.5 - half, 0.5).build(),
                HandPose::open_palm().at(cx, cy).build(),
            ],
            _ => vec![
                pose.clone().at(cx - half, cy).build(),
                pose.at(cx + half, cy).build(),
            ],
        }
    }
}

/// Emits [`SimHands`] frames at [`SIM_FRAME_INTERVAL`], updated by inputs
/// from the visualizer's window.
pub struct SimLandmarkSource {
    pub rx: Receiver<SimInput>,
}

impl LandmarkSource for SimLandmarkSource {
    fn name(&self) -> &'static str {
        "keyboard simulation"
    }

    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let mut hands = SimHands::default();
        loop {
            match self.rx.recv_timeout(SIM_FRAME_INTERVAL) {
                Ok(input) => {
                    debug!("sim input {:?}", input);
                    hands.apply(input);
                    // Drain anything else queued before emitting.
                    while let Ok(more) = self.rx.try_recv() {
                        hands.apply(more);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => return,
            }
            if tx.send(hands.frame()).is_err() {
                return;
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// ReplaySource: JSON Lines recording
// ════════════════════════════════════════════════════════════════════════════

/// Parse a replay: one frame per line, each an array of hands, each hand an
/// array of 21 `{x, y, z}` points.  Blank lines are ignored; malformed lines
/// are skipped with a warning.
pub fn parse_replay(text: &str) -> Vec<Frame> {
    let mut frames = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Frame>(line) {
            Ok(frame) => frames.push(frame),
            Err(e) => warn!("replay line {}: skipped ({})", lineno + 1, e),
        }
    }
    frames
}

/// Serialise frames in the replay format.
pub fn write_replay(frames: &[Frame]) -> Result<String> {
    let mut out = String::new();
    for frame in frames {
        out.push_str(&serde_json::to_string(frame)?);
        out.push('\n');
    }
    Ok(out)
}

/// Plays recorded frames at a fixed interval, then stops.
#[derive(Clone, Debug)]
pub struct ReplaySource {
    frames:   Vec<Frame>,
    interval: Duration,
}

impl ReplaySource {
    pub fn new(frames: Vec<Frame>, interval: Duration) -> Self {
        ReplaySource { frames, interval }
    }

    pub fn open(path: &Path, interval: Duration) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading replay file {}", path.display()))?;
        let frames = parse_replay(&text);
        info!("loaded {} frames from {}", frames.len(), path.display());
        Ok(ReplaySource::new(frames, interval))
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl LandmarkSource for ReplaySource {
    fn name(&self) -> &'static str {
        "replay"
    }

    fn run(self: Box<Self>, tx: Sender<Frame>) {
        let total = self.frames.len();
        for frame in self.frames {
            if tx.send(frame).is_err() {
                return;
            }
            thread::sleep(self.interval);
        }
        info!("replay finished after {} frames", total);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LeapLandmarkSource: real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Landmark source backed by a LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
///
/// Leap joints are in millimetres above the device with `y` up; they are
/// mapped into the normalised image layout (`y` down) over a
/// [`LEAP_SPAN_MM`] cube centred [`LEAP_CENTRE_HEIGHT_MM`] above it.  Each
/// digit supplies four landmarks: proximal, intermediate and distal bone
/// bases plus the distal tip.
#[cfg(feature = "leap")]
pub struct LeapLandmarkSource;

#[cfg(feature = "leap")]
pub const LEAP_SPAN_MM: f32 = 300.0;

#[cfg(feature = "leap")]
pub const LEAP_CENTRE_HEIGHT_MM: f32 = 200.0;

#[cfg(feature = "leap")]
impl LandmarkSource for LeapLandmarkSource {
    fn name(&self) -> &'static str {
        "LeapMotion"
    }

    fn run(self: Box<Self>, tx: Sender<Frame>) {
        use leaprs::*;

        let mut connection = match Connection::create(ConnectionConfig::default()) {
            Ok(c) => c,
            Err(e) => {
                log::error!("cannot create LeapC connection: {:?}", e);
                return;
            }
        };
        if let Err(e) = connection.open() {
            log::error!("cannot open LeapMotion device: {:?}", e);
            return;
        }

        loop {
            let msg = match connection.poll(100) {
                Ok(m)  => m,
                Err(_) => continue,
            };
            if let Event::Tracking(frame) = msg.event() {
                let hands: Frame = frame.hands().filter_map(|h| leap_hand(&h)).collect();
                if tx.send(hands).is_err() {
                    return;
                }
            }
        }
    }
}

#[cfg(feature = "leap")]
fn leap_hand(hand: &leaprs::Hand) -> Option<Hand> {
    use morph_gesture::Landmark;

    let to_landmark = |x: f32, y: f32, z: f32| {
        Landmark::new(
            0.5 + x / LEAP_SPAN_MM,
            0.5 - (y - LEAP_CENTRE_HEIGHT_MM) / LEAP_SPAN_MM,
            z / LEAP_SPAN_MM,
        )
    };

    let digits: Vec<_> = hand.digits().collect();
    if digits.len() < 5 {
        return None;
    }
    let mut points = Vec::with_capacity(morph_gesture::LANDMARK_COUNT);
    let wrist = digits[2].metacarpal().prev_joint();
    points.push(to_landmark(wrist.x, wrist.y, wrist.z));
    for digit in &digits[..5] {
        let joints = [
            digit.proximal().prev_joint(),
            digit.intermediate().prev_joint(),
            digit.distal().prev_joint(),
            digit.distal().next_joint(),
        ];
        for j in &joints {
            points.push(to_landmark(j.x, j.y, j.z));
        }
    }
    Hand::from_slice(&points).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use morph_gesture::{classify, Selection};

    #[test]
    fn sim_defaults_to_one_open_hand() {
        let frame = SimHands::default().frame();
        assert_eq!(frame.len(), 1);
        assert_eq!(classify(&frame).selection, Selection::FingerCount(5));
    }

    #[test]
    fn sim_second_hand_mirrors_gesture() {
        let mut sim = SimHands::default();
        sim.apply(SimInput::Fingers(3));
        sim.apply(SimInput::ToggleSecondHand);
        let frame = sim.frame();
        assert_eq!(frame.len(), 2);
        assert_eq!(classify(&frame).selection, Selection::FingerCount(3));
    }

    #[test]
    fn sim_two_hand_fist_steers_with_second_hand() {
        let mut sim = SimHands::default();
        sim.apply(SimInput::ToggleSecondHand);
        sim.apply(SimInput::Fist);
        sim.apply(SimInput::Move { dx: 0.2, dy: 0.0 });
        let reading = classify(&sim.frame());
        assert!(reading.rotation_mode);
        let (x, _) = reading.orientation.unwrap();
        assert!((x + 0.4).abs() < 1e-5);
    }

    #[test]
    fn sim_hidden_hands_give_empty_frames() {
        let mut sim = SimHands::default();
        sim.apply(SimInput::ToggleVisible);
        assert!(sim.frame().is_empty());
    }

    #[test]
    fn sim_moves_clamp_to_image() {
        let mut sim = SimHands::default();
        sim.apply(SimInput::Move { dx: 5.0, dy: -5.0 });
        assert_eq!(sim.centre, (1.0, 0.0));
    }

    #[test]
    fn replay_skips_malformed_lines() {
        let good = write_replay(&[
            vec![HandPose::fingers(2).build()],
            vec![],
        ])
        .unwrap();
        let text = format!("{}not json\n[[{{\"x\":0.1,\"y\":0.2}}]]\n\n{}", good, good);
        let frames = parse_replay(&text);
        assert_eq!(frames.len(), 4);
        assert_eq!(frames[0].len(), 1);
        assert!(frames[1].is_empty());
    }

    #[test]
    fn replay_source_sends_every_frame_then_closes() {
        let frames = vec![vec![HandPose::fist().build()], vec![], vec![HandPose::thumbs_up().build()]];
        let rx = spawn_landmark_source(ReplaySource::new(frames.clone(), Duration::from_millis(1)));
        let got: Vec<Frame> = rx.iter().collect();
        assert_eq!(got, frames);
    }

    #[test]
    fn sim_source_stops_when_window_input_closes() {
        let (tx, rx) = mpsc::channel();
        let frames = spawn_landmark_source(SimLandmarkSource { rx });
        tx.send(SimInput::Fingers(2)).unwrap();
        let seen = frames
            .iter()
            .take(5)
            .any(|f| classify(&f).selection == Selection::FingerCount(2));
        assert!(seen);
        drop(tx);
        // Remaining frames drain, then the channel disconnects.
        assert!(frames.iter().count() < 10);
    }
}
