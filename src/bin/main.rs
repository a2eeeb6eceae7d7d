use std::{ fs::File, sync::Mutex };

use anyhow::{ Context, Result };
use tracing::{ error, info, Level };
use tracing_subscriber::FmtSubscriber;

use rocketsim::{ cli, surface::{ restore_terminal, TerminalSurface }, SimConfig, Simulation };

fn init_logging(config: &SimConfig) -> Result<()> {
    let level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(false)
        .with_ansi(false);

    // the terminal belongs to the animation, so stderr output only shows up once it's restored
    match &config.log_file {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("opening log file {}", path.display()))?;
            tracing::subscriber::set_global_default(builder.with_writer(Mutex::new(file)).finish())?;
        }
        None => {
            tracing::subscriber::set_global_default(builder.with_writer(std::io::stderr).finish())?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli_matches = cli::parse_command_line();
    let config = SimConfig::from_cli_matches(&cli_matches)?;
    init_logging(&config)?;

    info!("rocketsim v{}", env!("CARGO_PKG_VERSION"));

    // get the terminal back before the panic message is printed
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        restore_terminal();
        error!("animation panicked: {}", panic);
        default_hook(panic);
    }));

    let result = {
        let mut surface = TerminalSurface::new().context("setting up the terminal")?;
        let mut sim = Simulation::new(config);
        let result = sim.run(&mut surface);
        surface.restore().context("restoring the terminal")?;
        result
    };

    if let Err(e) = &result {
        error!("animation failed: {:?}", e);
    }
    result.context("running the animation")
}
