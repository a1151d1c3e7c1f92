//! hand_morph: interactive entry point.

use anyhow::Result;
use clap::Parser;
use log::info;

use hand_morph::app::{headless_frames, run, run_headless};
use hand_morph::config::{AppConfig, Args};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = real_main(Args::parse()) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn real_main(args: Args) -> Result<()> {
    let cfg = AppConfig::from_args(&args)?;

    if let Some(count) = args.headless_frames {
        let frames = headless_frames(&cfg, args.replay.as_deref())?;
        let summary = run_headless(&cfg, &frames, count)?;
        println!("frames        {}", summary.frames);
        println!("set switches  {}", summary.set_switches);
        println!("generations   {}", summary.generations);
        println!("active set    {}", summary.active_set);
        println!("shape         {}", summary.shape);
        println!("zoom          {:.3}", summary.zoom);
        println!("angles        ({:.3}, {:.3})", summary.angles.0, summary.angles.1);
        println!("mean radius   {:.3}", summary.mean_radius);
        return Ok(());
    }

    #[cfg(feature = "leap")]
    info!("mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    info!("mode: keyboard simulation (use --features leap for hardware)");

    run(cfg, args.replay.as_deref())
}
