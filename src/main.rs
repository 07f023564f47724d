use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod controller;
mod document;
mod domain;
mod fetcher;
mod model;
mod ui;

use controller::Controller;
use domain::{DEFAULT_ENDPOINT, LVConfig, LVError};
use fetcher::HttpSource;
use model::{Model, Status};
use ui::PanelUI;

/// A tui based list/detail panel viewer.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Url of the list document
    #[arg(default_value = DEFAULT_ENDPOINT)]
    url: String,

    /// Event poll time in milliseconds
    #[arg(long, default_value_t = 100)]
    poll_time: u64,
}

fn main() -> ExitCode {
    match run() {
        Err(e) => {
            ratatui::restore();
            eprintln!("Error: {:?}", e);
            ExitCode::FAILURE
        }
        Ok(_) => {
            ratatui::restore();
            ExitCode::SUCCESS
        }
    }
}

fn run() -> Result<(), LVError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
    info!("Starting lv!");

    let args = Args::parse();
    let cfg = LVConfig {
        endpoint: args.url,
        event_poll_time: args.poll_time,
    };

    let source = HttpSource::new(&cfg.endpoint)?;

    let mut terminal = ratatui::init();
    let size = terminal.size()?;

    let mut model = Model::init(
        &cfg,
        Box::new(source),
        size.width as usize,
        size.height as usize,
    )?;
    // A failed fetch leaves the panel empty, the viewer still runs
    model.initialize();

    let ui = PanelUI::new(&cfg);
    let controller = Controller::new(&cfg);

    while model.status != Status::QUITTING {
        // Render the current view
        terminal.draw(|f| ui.draw(&model, f))?;

        // Handle events and map to a Message
        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    Ok(())
}
