use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use pathviz_core::app::{App, AppConfig};
use pathviz_crossterm::TerminalDriver;
use pathviz_search::PathResult;
use tracing_subscriber::EnvFilter;

use pathviz_lib::{Cli, Visualizer};

const DEFAULT_FILTER: &str = "pathviz=info,pathviz_search=info";

/// Log to a file; the terminal belongs to the renderer.
fn init_logging(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let file = std::fs::File::create(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let settings = cli.into_file_config()?.resolve()?;
    init_logging(&settings.log_file)?;
    if let Some(path) = config_path {
        log::info!("loaded config from {}", path.display());
    }

    let frame_interval = settings.frame_interval;
    let model = Visualizer::new(settings)?;
    let (width, height) = model.screen_size();
    let driver = TerminalDriver::new().with_frame_interval(frame_interval);
    let mut app = App::new(AppConfig {
        model,
        driver,
        width,
        height,
    });
    app.run()?;

    match app.model().result() {
        Some(PathResult::Found(path)) => println!(
            "path of {} steps, cost {:.3}",
            path.steps(),
            path.cost()
        ),
        Some(PathResult::NotFound) => println!("no path"),
        None => {}
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("pathviz: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logging_installs_once() {
        let path = std::env::temp_dir().join(format!("pathviz-test-{}.log", std::process::id()));
        init_logging(&path).unwrap();
        log::info!("hello");
        assert!(path.exists());
        // A second subscriber is refused, and the refusal surfaces as an error.
        assert!(init_logging(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
