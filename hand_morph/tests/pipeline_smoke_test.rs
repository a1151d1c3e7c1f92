//! Drives the whole pipeline headlessly: replay text in, summary out.

use std::time::Duration;

use hand_morph::app::{run_headless, run_headless_with, AppState};
use hand_morph::config::AppConfig;
use hand_morph::source::{parse_replay, write_replay, Frame};
use morph_gesture::pose::HandPose;
use morph_shapes::{SequenceSource, ShapeId};

fn cfg() -> AppConfig {
    AppConfig { particle_count: 400, seed: Some(11), ..AppConfig::default() }
}

#[test]
fn scripted_session_through_replay_format() {
    let thumbs: Frame = vec![HandPose::thumbs_up().build()];
    let mut script: Vec<Frame> = Vec::new();
    script.extend(std::iter::repeat(vec![HandPose::fingers(4).build()]).take(3));
    script.extend(std::iter::repeat(thumbs).take(4));
    script.push(vec![HandPose::fingers(2).build(), HandPose::fingers(2).build()]);
    script.extend(std::iter::repeat(Vec::new()).take(5));

    let text = write_replay(&script).unwrap();
    let frames = parse_replay(&format!("{}not a frame\n", text));
    assert_eq!(frames.len(), script.len());
    assert!(frames.iter().zip(&script).all(|(a, b)| a.len() == b.len()));

    let summary = run_headless(&cfg(), &frames, frames.len()).unwrap();
    assert_eq!(summary.set_switches, 1);
    assert_eq!(summary.active_set, "B");
    assert_eq!(summary.shape, ShapeId::Spiral);
    // Initial heart, four-finger fireworks, B's helix, two-finger spiral.
    assert_eq!(summary.generations, 4);
    assert_eq!(summary.zoom, 1.0);
}

#[test]
fn spreading_hands_zooms_then_eases_back() {
    let wide: Frame = vec![
        HandPose::open_palm().at(0.1, 0.5).build(),
        HandPose::open_palm().at(0.9, 0.5).build(),
    ];
    let zoomed = run_headless(&cfg(), &[wide.clone()], 5).unwrap();
    assert!(zoomed.zoom > 1.5);

    let mut frames = vec![wide];
    frames.extend(std::iter::repeat(Vec::new()).take(30));
    let eased = run_headless(&cfg(), &frames, frames.len()).unwrap();
    assert!(eased.zoom > 1.0 && eased.zoom < zoomed.zoom);
}

#[test]
fn no_hands_only_spins_ambiently() {
    let summary = run_headless(&cfg(), &[], 50).unwrap();
    assert_eq!(summary.generations, 1);
    assert_eq!(summary.active_set, "A");
    assert!((summary.angles.1 - 50.0 * 0.002).abs() < 1e-4);
    assert_eq!(summary.angles.0, 0.0);
}

#[test]
fn every_set_survives_a_full_cycle() {
    // A constant random source still yields a finite, non-empty cloud for
    // every shape reached by cycling all sets.
    let app = AppState::new(&cfg(), Box::new(SequenceSource::constant(0.37))).unwrap();
    let thumbs: Frame = vec![HandPose::thumbs_up().build()];
    let release: Frame = vec![HandPose::fingers(5).build()];
    let frames = vec![thumbs.clone(), thumbs.clone(), thumbs, release];
    let summary = run_headless_with(app, Duration::from_millis(33), &frames, 8 * 4).unwrap();
    assert_eq!(summary.set_switches, 8);
    assert_eq!(summary.active_set, "A");
    assert!(summary.mean_radius.is_finite());
}
