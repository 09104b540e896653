//! shelf-tui - Terminal UI for Bookshelf
//!
//! Search the remote catalog, page through results and add or edit books.

use anyhow::Context;
use clap::Parser;
use libbookshelf::BookshelfError;
use shelf_tui::{
    app::{event::EventHandler, event::TuiEvent, reduce, Action, AppState, UiConfig},
    cli::Args,
    services::ServiceHandle,
    terminal::{install_panic_hook, restore_terminal, setup_terminal, Tui},
    ui::{self, search_bar::SearchBar},
    TuiError,
};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(exit_code(&e));
    }
}

fn exit_code(error: &anyhow::Error) -> i32 {
    if let Some(e) = error.downcast_ref::<TuiError>() {
        return e.exit_code();
    }
    if let Some(e) = error.downcast_ref::<BookshelfError>() {
        return e.exit_code();
    }
    1
}

fn run() -> anyhow::Result<()> {
    let args = Args::parse();

    args.logging_config()?
        .init()
        .context("Failed to open log file")?;

    let config = args.load_config()?;
    tracing::info!(api = %config.api.base_url, "Starting shelf-tui");

    let services = ServiceHandle::new(&config)?;
    let ui_config = UiConfig::from_config(&config.ui);

    install_panic_hook();
    let mut terminal = setup_terminal()?;

    let result = run_app(&mut terminal, &services, ui_config);

    restore_terminal(terminal)?;
    tracing::info!("shelf-tui exited");

    result?;
    Ok(())
}

fn run_app(terminal: &mut Tui, services: &ServiceHandle, ui_config: UiConfig) -> shelf_tui::Result<()> {
    let mut state = AppState::with_config(ui_config);
    let mut search_bar = SearchBar::new();
    let events = services.events();
    let event_handler = EventHandler::new(state.config.tick_rate_ms);

    // Initial load: the default catalog, ascending
    state = reduce(state, Action::SearchSubmitted);

    loop {
        for command in state.take_commands() {
            tracing::debug!(?command, "Executing command");
            services.execute(command);
        }

        let snapshot = services.snapshot();
        if snapshot != state.catalog {
            state = reduce(state, Action::CatalogSynced(snapshot));
        }

        terminal.draw(|frame| {
            ui::render(frame, &state, &search_bar);
        })?;

        let action = match event_handler.next()? {
            TuiEvent::Key(key) if state.accepts_search_input() && search_bar.input(key) => {
                Action::SearchInputChanged(search_bar.content())
            }
            other => other.into(),
        };
        state = reduce(state, action);

        while let Ok(event) = events.try_recv() {
            state = reduce(state, event.into());
        }

        if state.should_quit {
            break;
        }
    }

    Ok(())
}
