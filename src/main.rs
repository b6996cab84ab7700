use std::fs::File;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::Backend, Terminal};

use hotseat_chess::cli::Cli;
use hotseat_chess::config::AppConfig;
use hotseat_chess::ui::app::App;
use hotseat_chess::ui::terminal;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::from_cli(&cli)?;
    init_logging(&config)?;

    tracing::info!("Starting hotseat-chess");
    tracing::info!("Rules: {:?}", config.rules);

    // terminal
    let mut terminal = terminal::init()?;

    // make the app, then run it
    let mut app = App::new(&config);
    let res = run_app(&mut terminal, &mut app);

    // restore the terminal
    terminal::restore(&mut terminal)?;

    if let Err(err) = &res {
        tracing::error!("UI loop failed: {err}");
    }
    res.context("terminal UI failed")
}

fn init_logging(config: &AppConfig) -> anyhow::Result<()> {
    let level = config.log_level()?;
    let file = File::create(&config.logging.file)
        .with_context(|| format!("cannot create log file {:?}", config.logging.file))?;

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> std::io::Result<()> {
    loop {
        terminal.draw(|f| app.draw(f))?;

        if app.should_quit {
            tracing::info!("Quitting");
            return Ok(());
        }

        if let Event::Key(key) = event::read()? {
            // key release events are reported on some platforms
            if key.kind == KeyEventKind::Press {
                app.handle_key_event(key);
            }
        }
    }
}
