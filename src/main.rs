//! Checkout Rush entry point
//!
//! Native builds run the simulation headless. Rendering front ends link the
//! library and drive `Scene` themselves.

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser)]
#[command(name = "checkout-rush")]
#[command(about = "Headless checkout simulation")]
struct Cli {
    /// RNG seed for the run
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Number of simulation ticks to run
    #[arg(long, default_value = "3600")]
    ticks: u32,

    /// JSON settings file
    #[arg(long)]
    settings: Option<std::path::PathBuf>,

    /// Let the bot play
    #[arg(long)]
    autoplay: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), checkout_rush::SettingsError> {
    use checkout_rush::consts::SIM_DT;
    use checkout_rush::sim::{GameEvent, GamePhase, Scene};
    use checkout_rush::{Settings, autoplay};

    env_logger::init();
    let cli = Cli::parse();
    log::info!("Checkout Rush (native) starting...");

    let settings = match &cli.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let mut scene = Scene::new(settings, cli.seed);
    log::info!("Game initialized with seed: {}", cli.seed);

    for tick in 0..cli.ticks {
        scene.tick(tick as f32 * SIM_DT);
        if cli.autoplay {
            autoplay::step(&mut scene);
        }
        for event in scene.drain_events() {
            if let GameEvent::SessionEnded { customer, outcome } = event {
                println!("[{:>7.2}s] {:?}: {:?}", scene.time, customer, outcome);
            }
        }
        if scene.phase == GamePhase::GameOver {
            break;
        }
    }

    println!(
        "Served {}, failed {}, health {}, score ${:.2}",
        scene.served,
        scene.failed,
        scene.health,
        scene.score as f64 / 100.0
    );
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM front ends drive the library directly
}
