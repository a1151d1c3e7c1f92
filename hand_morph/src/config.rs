//! Application configuration: a JSON file with defaults for anything
//! missing, overridden by command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use morph_gesture::TrackerConfig;

#[derive(Parser, Debug, Default)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// JSON config file (missing fields take their defaults)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of particles
    #[arg(long)]
    pub particles: Option<usize>,

    /// Play hands from a JSON Lines replay instead of the keyboard simulator
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Key of the set to start in (e.g. "A")
    #[arg(long)]
    pub set: Option<String>,

    /// Seed for shape generation, for reproducible clouds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Ignore thumbs-up set switching
    #[arg(long, default_value_t = false)]
    pub no_set_switch: bool,

    /// Run this many frames without a window and print a summary
    #[arg(long)]
    pub headless_frames: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub particle_count:     usize,
    pub initial_set:        String,
    pub set_switch_enabled: bool,
    pub set_switch_hold_ms: u64,
    pub seed:               Option<u64>,
    pub window_width:       usize,
    pub window_height:      usize,
    /// Splat radius in pixels; 0 draws single pixels.
    pub point_size:         usize,
    /// Replay frame spacing.
    pub frame_interval_ms:  u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            particle_count:     15_000,
            initial_set:        "A".to_string(),
            set_switch_enabled: true,
            set_switch_hold_ms: 50,
            seed:               None,
            window_width:       960,
            window_height:      640,
            point_size:         1,
            frame_interval_ms:  33,
        }
    }
}

impl AppConfig {
    /// Read `path`.  A missing file gives the defaults with a warning; a file
    /// that exists but does not parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("config file {} not found, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let cfg = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        info!("loaded configuration from {}", path.display());
        Ok(cfg)
    }

    /// File (if any) first, then flags on top.
    pub fn from_args(args: &Args) -> Result<Self> {
        let mut cfg = match &args.config {
            Some(path) => AppConfig::load(path)?,
            None => AppConfig::default(),
        };
        cfg.apply_args(args);
        Ok(cfg)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(n) = args.particles {
            self.particle_count = n;
        }
        if let Some(key) = &args.set {
            self.initial_set = key.clone();
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.no_set_switch {
            self.set_switch_enabled = false;
        }
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            set_switch_hold:    Duration::from_millis(self.set_switch_hold_ms),
            set_switch_enabled: self.set_switch_enabled,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}
