//! Top-level application state machine.
//!
//! `AppState` owns the shape library, the set registry, the target cloud,
//! the animator, the gesture tracker and the random source.  It processes
//! landmark frames and drives the visualizer each frame.

use std::path::Path;
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::{debug, info, warn};

use morph_gesture::{ControlState, GestureTracker, GestureUpdate, Hand};
use morph_sets::{SetError, SetRegistry};
use morph_shapes::{RandomSource, RngSource, ShapeId, ShapeLibrary, TargetCloud};

use crate::animator::MorphAnimator;
use crate::config::AppConfig;
use crate::source::{spawn_landmark_source, Frame, ReplaySource, SimHands, SimInput};
use crate::visualizer::{Scene, UiCommand, Visualizer};

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── shapes ───────────────────────────────────────────────────────────
    library:  ShapeLibrary,
    registry: SetRegistry,
    cloud:    TargetCloud,
    rng:      Box<dyn RandomSource>,

    // ── motion ───────────────────────────────────────────────────────────
    animator: MorphAnimator,
    tracker:  GestureTracker,
}

impl AppState {
    /// Build the pipeline and generate the starting set's first shape.
    pub fn new(cfg: &AppConfig, mut rng: Box<dyn RandomSource>) -> Result<Self> {
        let library = ShapeLibrary::standard().context("building shape library")?;
        let mut registry = SetRegistry::standard().context("building set registry")?;
        let shape = registry
            .activate(&cfg.initial_set)
            .with_context(|| format!("selecting initial set {:?}", cfg.initial_set))?;

        let mut cloud = TargetCloud::new(cfg.particle_count).context("allocating particles")?;
        cloud.regenerate(&library, shape, rng.as_mut())?;
        let animator = MorphAnimator::new(cfg.particle_count, rng.as_mut());

        info!(
            "{} particles, {} sets, starting in {} on '{}'",
            cfg.particle_count,
            registry.len(),
            registry.active().status_label(),
            shape,
        );

        Ok(AppState {
            library,
            registry,
            cloud,
            rng,
            animator,
            tracker: GestureTracker::new(cfg.tracker_config()),
        })
    }

    /// Seeded from the config when it names a seed, otherwise from entropy.
    pub fn from_config(cfg: &AppConfig) -> Result<Self> {
        let rng: Box<dyn RandomSource> = match cfg.seed {
            Some(seed) => Box::new(RngSource::seeded(seed)),
            None => Box::new(RngSource::from_entropy()),
        };
        AppState::new(cfg, rng)
    }

    // ── process one landmark frame ───────────────────────────────────────

    pub fn handle_frame(&mut self, hands: &[Hand], now: Instant) -> GestureUpdate {
        let update = self.tracker.update(hands, now);

        if update.set_switch_fired {
            let shape = self.registry.next();
            info!("thumbs up: {}", self.set_banner());
            self.morph_to(shape);
        } else if update.control.shape_switch_finger_count > 0 {
            let count = update.control.shape_switch_finger_count;
            if let Some(shape) = self.registry.select_finger_count(count) {
                info!("{} fingers: '{}'", count, shape);
                self.morph_to(shape);
            }
        }
        update
    }

    /// Active set label with its colour, for logs.
    pub fn set_banner(&self) -> String {
        let set = self.registry.active();
        format!("{} {}", set.status_label(), set.color_hex())
    }

    fn morph_to(&mut self, shape: ShapeId) {
        if let Err(e) = self.cloud.regenerate(&self.library, shape, self.rng.as_mut()) {
            warn!("cannot generate '{}': {}", shape, e);
        }
    }

    // ── set navigation (keyboard) ────────────────────────────────────────

    pub fn next_set(&mut self) {
        let shape = self.registry.next();
        info!("{}", self.set_banner());
        self.morph_to(shape);
    }

    pub fn prev_set(&mut self) {
        let shape = self.registry.prev();
        info!("{}", self.set_banner());
        self.morph_to(shape);
    }

    pub fn activate_set(&mut self, key: &str) -> Result<(), SetError> {
        let shape = self.registry.activate(key)?;
        info!("{}", self.set_banner());
        self.morph_to(shape);
        Ok(())
    }

    /// Activate by registry position; out-of-range positions are ignored.
    pub fn activate_set_at(&mut self, index: usize) {
        let key = match self.registry.sets().get(index) {
            Some(set) => set.key().to_string(),
            None => {
                debug!("no set at position {}", index);
                return;
            }
        };
        if let Err(e) = self.activate_set(&key) {
            warn!("{}", e);
        }
    }

    pub fn apply(&mut self, cmd: UiCommand) {
        match cmd {
            UiCommand::NextSet        => self.next_set(),
            UiCommand::PrevSet        => self.prev_set(),
            UiCommand::ActivateSet(i) => self.activate_set_at(i),
            UiCommand::Quit           => { /* handled in run loop */ }
        }
    }

    // ── per-frame tick ───────────────────────────────────────────────────

    pub fn tick(&mut self) {
        self.animator.tick(&self.tracker.control(), &self.cloud);
    }

    // ── accessors for the render loop ────────────────────────────────────

    pub fn registry(&self) -> &SetRegistry  { &self.registry }
    pub fn cloud(&self)    -> &TargetCloud  { &self.cloud }
    pub fn animator(&self) -> &MorphAnimator { &self.animator }
    pub fn control(&self)  -> ControlState  { self.tracker.control() }

    /// One-line summary of shape and gesture state.
    pub fn detail(&self) -> String {
        let c = self.tracker.control();
        format!(
            "{}  {}  ZOOM {:.2}  HANDS {}",
            self.registry.active_shape().name().to_uppercase(),
            if c.rotation_mode { "ROTATE" } else { "AMBIENT" },
            c.zoom_scale,
            c.hand_count,
        )
    }

    pub fn scene(&self) -> Scene<'_> {
        let set = self.registry.active();
        Scene {
            positions:    self.animator.positions(),
            colors:       self.cloud.colors(),
            angles:       self.animator.angles(),
            status:       set.status_label(),
            status_color: set.color(),
            detail:       self.detail(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run(): the windowed application loop
// ════════════════════════════════════════════════════════════════════════════

#[cfg(not(feature = "leap"))]
fn live_source() -> (Option<Sender<SimInput>>, Receiver<Frame>) {
    use crate::source::SimLandmarkSource;
    let (sim_tx, sim_rx) = std::sync::mpsc::channel::<SimInput>();
    (Some(sim_tx), spawn_landmark_source(SimLandmarkSource { rx: sim_rx }))
}

#[cfg(feature = "leap")]
fn live_source() -> (Option<Sender<SimInput>>, Receiver<Frame>) {
    use crate::source::LeapLandmarkSource;
    (None, spawn_landmark_source(LeapLandmarkSource))
}

/// Run the full application.
///
/// Hands come from `replay` when given, otherwise from the keyboard
/// simulator (or the LeapMotion controller with `--features leap`).  The
/// loop drains pending frames, ticks the animator and renders at ~60 fps.
pub fn run(cfg: AppConfig, replay: Option<&Path>) -> Result<()> {
    // ── Landmark source ───────────────────────────────────────────────────
    let (sim_tx, frames) = match replay {
        Some(path) => {
            let source = ReplaySource::open(path, cfg.frame_interval())?;
            (None, spawn_landmark_source(source))
        }
        None => live_source(),
    };

    // ── Visualizer (owns the window and the sim input sender) ─────────────
    let mut vis = Visualizer::new(cfg.window_width, cfg.window_height, cfg.point_size, sim_tx)
        .context("opening visualizer")?;

    // ── App state ─────────────────────────────────────────────────────────
    let mut app = AppState::from_config(&cfg)?;
    let mut source_open = true;

    // ── Main loop ─────────────────────────────────────────────────────────
    while vis.is_open() {
        // 1. Window input
        for cmd in vis.poll_input() {
            if cmd == UiCommand::Quit {
                return Ok(());
            }
            app.apply(cmd);
        }

        // 2. Drain landmark frames
        while source_open {
            match frames.try_recv() {
                Ok(hands) => { app.handle_frame(&hands, Instant::now()); }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    info!("landmark source closed, holding last control state");
                    source_open = false;
                }
            }
        }

        // 3. Per-frame logic
        app.tick();

        // 4. Render
        vis.render(&app.scene());
    }

    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// run_headless(): the same pipeline without a window
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct HeadlessSummary {
    pub frames:       usize,
    pub set_switches: usize,
    /// Clouds generated, including the initial one.
    pub generations:  u64,
    pub active_set:   String,
    pub shape:        ShapeId,
    pub zoom:         f32,
    pub angles:       (f32, f32),
    pub mean_radius:  f32,
}

/// Feed `count` frames through the pipeline, cycling over `frames`, with
/// frame timestamps spaced by the configured interval.  An empty list
/// feeds frames with no hands.
pub fn run_headless(cfg: &AppConfig, frames: &[Frame], count: usize) -> Result<HeadlessSummary> {
    run_headless_with(AppState::from_config(cfg)?, cfg.frame_interval(), frames, count)
}

pub fn run_headless_with(
    mut app: AppState,
    interval: Duration,
    frames: &[Frame],
    count: usize,
) -> Result<HeadlessSummary> {
    let start = Instant::now();
    let mut set_switches = 0;
    for i in 0..count {
        let hands: &[Hand] = match frames.len() {
            0 => &[],
            n => &frames[i % n],
        };
        let now = frame_time(start, interval, i)?;
        if app.handle_frame(hands, now).set_switch_fired {
            set_switches += 1;
        }
        app.tick();
    }

    let control = app.control();
    Ok(HeadlessSummary {
        frames:      count,
        set_switches,
        generations: app.cloud.generation(),
        active_set:  app.registry.active_key().to_string(),
        shape:       app.registry.active_shape(),
        zoom:        control.zoom_scale,
        angles:      app.animator.angles(),
        mean_radius: app.cloud.mean_radius(),
    })
}

/// Timestamp of frame `index`, or an error when the spacing runs past what
/// `Instant` can represent.
fn frame_time(start: Instant, interval: Duration, index: usize) -> Result<Instant> {
    u32::try_from(index)
        .ok()
        .and_then(|k| interval.checked_mul(k))
        .and_then(|offset| start.checked_add(offset))
        .with_context(|| format!("frame {} at {:?} spacing overflows the clock", index, interval))
}

/// Frames for a headless run: the replay when given, else the simulator's
/// resting pose.
pub fn headless_frames(cfg: &AppConfig, replay: Option<&Path>) -> Result<Vec<Frame>> {
    match replay {
        Some(path) => Ok(ReplaySource::open(path, cfg.frame_interval())?.into_frames()),
        None => Ok(vec![SimHands::default().frame()]),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use morph_gesture::pose::HandPose;

    fn make_app() -> AppState {
        let cfg = AppConfig { particle_count: 600, seed: Some(5), ..AppConfig::default() };
        AppState::from_config(&cfg).unwrap()
    }

    fn at(t0: Instant, ms: u64) -> Instant {
        t0 + Duration::from_millis(ms)
    }

    #[test]
    fn starts_on_first_shape_of_initial_set() {
        let cfg = AppConfig { particle_count: 100, initial_set: "C".into(), seed: Some(1), ..AppConfig::default() };
        let app = AppState::from_config(&cfg).unwrap();
        assert_eq!(app.registry().active_key(), "C");
        assert_eq!(app.cloud().shape(), Some(ShapeId::Pyramid));
        assert_eq!(app.cloud().generation(), 1);
    }

    #[test]
    fn unknown_initial_set_is_an_error() {
        let cfg = AppConfig { particle_count: 100, initial_set: "Z".into(), ..AppConfig::default() };
        assert!(AppState::from_config(&cfg).is_err());
    }

    #[test]
    fn zero_particles_is_an_error() {
        let cfg = AppConfig { particle_count: 0, ..AppConfig::default() };
        assert!(AppState::from_config(&cfg).is_err());
    }

    #[test]
    fn finger_count_regenerates_once() {
        let mut app = make_app();
        let t0 = Instant::now();
        let three = [HandPose::fingers(3).build()];
        app.handle_frame(&three, t0);
        assert_eq!(app.cloud().shape(), Some(ShapeId::Flower));
        let gen = app.cloud().generation();
        // Same count again: no regeneration.
        app.handle_frame(&three, at(t0, 33));
        assert_eq!(app.cloud().generation(), gen);
    }

    #[test]
    fn held_thumbs_up_advances_one_set() {
        let mut app = make_app();
        let t0 = Instant::now();
        let thumbs = [HandPose::thumbs_up().build()];
        for k in 0..10 {
            app.handle_frame(&thumbs, at(t0, k * 33));
        }
        assert_eq!(app.registry().active_key(), "B");
        assert_eq!(app.cloud().shape(), Some(ShapeId::Helix));
    }

    #[test]
    fn disabled_set_switch_stays_put() {
        let cfg = AppConfig { particle_count: 100, seed: Some(2), set_switch_enabled: false, ..AppConfig::default() };
        let mut app = AppState::from_config(&cfg).unwrap();
        let t0 = Instant::now();
        let thumbs = [HandPose::thumbs_up().build()];
        for k in 0..10 {
            app.handle_frame(&thumbs, at(t0, k * 33));
        }
        assert_eq!(app.registry().active_key(), "A");
    }

    #[test]
    fn keyboard_set_navigation() {
        let mut app = make_app();
        app.apply(UiCommand::PrevSet);
        assert_eq!(app.registry().active_key(), "H");
        app.apply(UiCommand::NextSet);
        assert_eq!(app.registry().active_key(), "A");
        app.apply(UiCommand::ActivateSet(3));
        assert_eq!(app.registry().active_key(), "D");
        assert_eq!(app.cloud().shape(), Some(ShapeId::TrefoilKnot));
        // Past the end: ignored.
        app.apply(UiCommand::ActivateSet(12));
        assert_eq!(app.registry().active_key(), "D");
        assert!(app.activate_set("nope").is_err());
    }

    #[test]
    fn tick_moves_particles_toward_target() {
        let mut app = make_app();
        let gap = |a: &AppState| -> f32 {
            a.animator().positions().iter().zip(a.cloud().positions())
                .map(|(p, t)| (*t - *p).length())
                .sum()
        };
        let before = gap(&app);
        for _ in 0..10 {
            app.tick();
        }
        assert!(gap(&app) < before);
    }

    #[test]
    fn scene_carries_set_status() {
        let app = make_app();
        let scene = app.scene();
        assert_eq!(scene.status, "SET A (Default)");
        assert_eq!(scene.status_color, 0x00ff00);
        assert_eq!(scene.positions.len(), scene.colors.len());
        assert!(scene.detail.starts_with("HEART  AMBIENT  ZOOM 1.00"));
        assert_eq!(app.set_banner(), "SET A (Default) #00ff00");
    }

    #[test]
    fn frame_times_are_evenly_spaced() {
        let t0 = Instant::now();
        assert_eq!(frame_time(t0, Duration::from_millis(33), 0).unwrap(), t0);
        assert_eq!(frame_time(t0, Duration::from_millis(33), 3).unwrap(), at(t0, 99));
    }

    #[test]
    fn oversized_frame_interval_is_an_error() {
        assert!(frame_time(Instant::now(), Duration::MAX, 2).is_err());
        let frames = vec![vec![HandPose::fingers(2).build()]];
        let result = run_headless_with(make_app(), Duration::MAX, &frames, 3);
        assert!(result.is_err());
    }

    #[test]
    fn headless_run_counts_switches() {
        let cfg = AppConfig { particle_count: 200, seed: Some(9), ..AppConfig::default() };
        // Three thumbs-up frames (66 ms held) then a release: one switch
        // per cycle.
        let thumbs = vec![HandPose::thumbs_up().build()];
        let frames = vec![thumbs.clone(), thumbs.clone(), thumbs, vec![HandPose::fingers(2).build()]];
        let summary = run_headless(&cfg, &frames, 12).unwrap();
        assert_eq!(summary.frames, 12);
        assert_eq!(summary.set_switches, 3);
        assert_eq!(summary.active_set, "D");
    }
}
