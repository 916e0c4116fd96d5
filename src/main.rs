//! Spin Cage entry point
//!
//! Headless run: `spin-cage [config.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use spin_cage::SimConfig;

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => match SimConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => SimConfig::default(),
    };
    let seconds = match args.next().map(|s| s.parse::<f32>()) {
        None => 10.0,
        Some(Ok(s)) if s.is_finite() && s >= 0.0 => s,
        Some(_) => {
            log::error!("seconds must be a finite, non-negative number");
            std::process::exit(2);
        }
    };

    if let Err(e) = run(&config, seconds) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn run(config: &spin_cage::SimConfig, seconds: f32) -> Result<(), spin_cage::ConfigError> {
    use spin_cage::consts::SIM_DT;
    use spin_cage::sim::{FixedStep, SimState};

    let mut state = SimState::new(config)?;
    let mut stepper = FixedStep::new();
    log::info!("Spin Cage starting (seed {}, {}s)", config.seed, seconds);

    // Drive at a nominal 60 fps frame rate
    let frame_dt = 1.0 / 60.0;
    let ticks_per_second = (1.0 / SIM_DT).round() as u64;
    let total_ticks = (seconds / SIM_DT).round() as u64;

    while state.time_ticks < total_ticks {
        stepper.advance(&mut state, frame_dt);
        if state.time_ticks % ticks_per_second < 2 {
            log::info!(
                "t={:.1}s rotation={:.1}° balls={} escaped={} pending={}",
                state.time_ticks as f32 * SIM_DT,
                state.container.rotation().to_degrees(),
                state.balls.len(),
                state.escaped,
                state.pending_respawns
            );
        }
    }

    log::info!(
        "Done: {} balls in play, {} escaped",
        state.balls.len(),
        state.escaped
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser host; the library is usable directly
}
