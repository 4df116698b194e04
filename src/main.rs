//! Hamster Dash entry point
//!
//! Native headless runner: builds the demo track, drives it with a scripted
//! player for a fixed stretch of simulated time and prints the final frame
//! as JSON. Rendering hosts embed the library instead.
//!
//! Usage: `hamster-dash [seed] [tuning.json]`

use std::process::ExitCode;

#[cfg(not(target_arch = "wasm32"))]
use hamster_dash::{
    consts::SIM_DT,
    platform::InputState,
    sim::{SimEvent, Simulation},
    Frame, Scene, SetupError, Tuning,
};

/// Simulated time to run, in time units
#[cfg(not(target_arch = "wasm32"))]
const RUN_TIME: f32 = 30.0;
/// How long a dead run sits on the death screen before the script restarts it
#[cfg(not(target_arch = "wasm32"))]
const DEATH_PAUSE_TICKS: u32 = 60;

#[cfg(not(target_arch = "wasm32"))]
fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5eed);
    let tuning = match args.next() {
        Some(path) => match load_tuning(&path) {
            Ok(tuning) => tuning,
            Err(err) => {
                log::error!("{err}");
                eprintln!("hamster-dash: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Tuning::default(),
    };

    log::info!("Hamster Dash (headless) starting with seed {seed}");
    let mut sim = match Simulation::new(Scene::demo(), tuning, seed) {
        Ok(sim) => sim,
        Err(err) => {
            log::error!("Setup failed: {err}");
            eprintln!("hamster-dash: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut input = InputState::default();
    let mut dead_for = 0u32;
    let mut deaths = 0u32;
    let mut best = 0u32;
    let frames = (RUN_TIME / SIM_DT) as u32;

    for frame in 0..frames {
        script_input(&mut input, frame, dead_for);
        for event in sim.tick(&mut input, SIM_DT) {
            match event {
                SimEvent::Died { score, .. } => {
                    deaths += 1;
                    best = best.max(*score);
                    log::info!("Run {} ended with score {}", deaths, score);
                }
                SimEvent::Scored { score } => log::debug!("Score {}", score),
                _ => {}
            }
        }
        dead_for = if sim.run().is_dead() { dead_for + 1 } else { 0 };
    }
    best = best.max(sim.score());

    log::info!("Finished: {} deaths, best score {}", deaths, best);
    match serde_json::to_string_pretty(&Frame::capture(&sim)) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("hamster-dash: {err}");
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() -> ExitCode {
    // The library is embedded by the web host; nothing to run here
    ExitCode::SUCCESS
}

#[cfg(not(target_arch = "wasm32"))]
fn load_tuning(path: &str) -> Result<Tuning, SetupError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| SetupError::TuningParse(format!("{path}: {e}")))?;
    Tuning::from_json(&json)
}

/// Weave left and right, hop now and then, restart after dying
#[cfg(not(target_arch = "wasm32"))]
fn script_input(input: &mut InputState, frame: u32, dead_for: u32) {
    let phase = (frame / 40) % 4;
    input.handle_key("a", phase == 1);
    input.handle_key("d", phase == 3);

    let jump = frame % 90 == 0;
    input.handle_key(" ", jump);

    input.handle_key("r", dead_for >= DEATH_PAUSE_TICKS);
}
