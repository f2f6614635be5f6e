//! Headless site walkthrough: loads a layout, simulates it at a fixed
//! 60 Hz and logs what happens.
//!
//! ```text
//! sitewalk [layout.toml] [--options options.toml] [--seconds N] [--realtime] [--json]
//! ```
//!
//! `--realtime` paces frames against the wall clock instead of stepping a
//! fixed delta as fast as possible.
//!
//! Verbosity follows `RUST_LOG` (e.g. `RUST_LOG=sitewalk=debug`).

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use sitewalk::engine::Engine;
use sitewalk::options::Options;
use sitewalk::scene::layout::SiteLayout;
use sitewalk::util::{FrameClock, FrameTick};
use sitewalk::SitewalkError;

const FRAME_DT: f32 = 1.0 / 60.0;

struct Args {
    layout: Option<PathBuf>,
    options: Option<PathBuf>,
    seconds: f32,
    realtime: bool,
    json: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args {
        layout: None,
        options: None,
        seconds: 30.0,
        realtime: false,
        json: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--options" => {
                let path = iter.next().ok_or("--options needs a path")?;
                args.options = Some(PathBuf::from(path));
            }
            "--seconds" => {
                let value = iter.next().ok_or("--seconds needs a value")?;
                args.seconds = value
                    .parse()
                    .map_err(|_| format!("invalid --seconds value '{value}'"))?;
            }
            "--realtime" => args.realtime = true,
            "--json" => args.json = true,
            flag if flag.starts_with("--") => {
                return Err(format!("unknown flag '{flag}'"));
            }
            path => args.layout = Some(PathBuf::from(path)),
        }
    }
    Ok(args)
}

fn run(args: &Args) -> Result<(), SitewalkError> {
    let options = match &args.options {
        Some(path) => Options::load(path)?,
        None => Options::default(),
    };
    let layout = match &args.layout {
        Some(path) => SiteLayout::load(path)?,
        None => SiteLayout::default(),
    };

    let mut engine = Engine::new(options, &layout)?;
    engine.load_scene(layout.to_scene_graph());

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let frames = (args.seconds.max(0.0) / FRAME_DT).ceil() as u64;
    let mut phases: Vec<_> =
        engine.vehicles().iter().map(|v| v.phase()).collect();
    let mut last = None;

    let mut clock = args.realtime.then(FrameClock::default);

    for frame in 0..frames.max(1) {
        let was_loading = engine.is_loading();
        let tick = match clock.as_mut() {
            Some(clock) => {
                std::thread::sleep(Duration::from_secs_f32(FRAME_DT));
                clock.tick()
            }
            None => FrameTick::fixed(frame, FRAME_DT),
        };
        let out = engine.tick(tick);
        if was_loading && !out.loading {
            log::info!(
                "ready at frame {frame}: eye {} target {}",
                out.camera.eye,
                out.camera.target
            );
        }
        for (index, (vehicle, phase)) in
            out.vehicles.iter().zip(phases.iter_mut()).enumerate()
        {
            if vehicle.phase != *phase {
                log::info!(
                    "frame {frame}: vehicle {index} {:?} -> {:?} at {}",
                    phase,
                    vehicle.phase,
                    vehicle.transform.position
                );
                *phase = vehicle.phase;
            }
        }
        last = Some(out);
    }
    if let Some(clock) = &clock {
        log::info!("ran {frames} frames at {:.1} fps", clock.fps());
    }

    if args.json {
        if let Some(out) = last {
            let json = serde_json::to_string_pretty(&out)
                .map_err(|e| SitewalkError::OptionsParse(e.to_string()))?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            log::error!(
                "Usage: sitewalk [layout.toml] [--options options.toml] \
                 [--seconds N] [--realtime] [--json]"
            );
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
