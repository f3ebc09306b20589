use clap::Parser;
use clap::error::ErrorKind;
use std::io::{self, BufRead};
use std::path::PathBuf;
use taskline_cli::cli::{Cli, collect_overrides, expand_alias_tokens};
use taskline_core::command::{Action, Command};
use taskline_core::config::{Config, Palette, load_config, write_config};
use taskline_core::error::AppError;
use taskline_core::parser::{expand_alias, parse_tokens};
use taskline_core::session::Session;
use taskline_core::storage::{JsonTaskStore, json_store};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const LOG_ENV_VAR: &str = "TASKLINE_LOG";

struct App {
    session: Session,
    config: Config,
    file_config: Config,
    config_path: Option<PathBuf>,
    store_overridden: bool,
    palette: Palette,
}

impl App {
    fn run_line(&mut self, line: &str) -> Result<Command, AppError> {
        let line = expand_alias(line, &self.config.aliases);
        let before = self.session.store().location();
        let command = self.session.process_input(&line)?;
        self.persist_location(before)?;
        Ok(command)
    }

    fn run_tokens(&mut self, tokens: &[String]) -> Result<Command, AppError> {
        let tokens = expand_alias_tokens(tokens, &self.config.aliases)?;
        let before = self.session.store().location();
        let command = self.session.run(parse_tokens(&tokens)?)?;
        self.persist_location(before)?;
        Ok(command)
    }

    /// Writes a relocated store directory back to the config file so the
    /// next session opens the same store.
    fn persist_location(&mut self, before: PathBuf) -> Result<(), AppError> {
        let current = self.session.store().location();
        if current == before {
            return Ok(());
        }
        if self.store_overridden {
            info!("store path set by --store or TASKLINE_STORE_PATH, config left unchanged");
            return Ok(());
        }

        let Some(path) = self.config_path.as_ref() else {
            warn!("no config path, relocation will not persist");
            return Ok(());
        };
        self.file_config.store_dir = Some(current.clone());
        self.config.store_dir = Some(current);
        write_config(path, &self.file_config)?;
        info!(path = %path.display(), "saved store location to config");
        Ok(())
    }

    fn print_outcome(&self, command: &Command) -> Result<(), AppError> {
        let message = command.success_message()?;
        let rendered = match command.action() {
            Action::List { .. } | Action::Help { .. } => self.palette.muted(&message),
            _ => self.palette.accent(&message),
        };
        println!("{rendered}");
        Ok(())
    }
}

fn init_logging() {
    // Off unless TASKLINE_LOG or RUST_LOG holds a usable filter.
    let filter = std::env::var(LOG_ENV_VAR)
        .or_else(|_| std::env::var("RUST_LOG"))
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() || raw.len() > 4096 {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn report(err: &AppError) {
    eprintln!("ERROR: {} - {}", err.code(), err);
}

fn build_app(cli: &Cli) -> Result<App, AppError> {
    let overrides = collect_overrides(&cli.config_override)?;
    let load = load_config();
    if let Some(err) = load.error.as_ref() {
        eprintln!("WARNING: {} - {} (using defaults)", err.code(), err);
    }

    let config = load.config.with_overrides(&overrides);
    let store_overridden = cli.store.is_some() || json_store::store_path_override().is_some();
    let store_path = match cli.store.as_ref() {
        Some(path) => path.clone(),
        None => json_store::store_path(config.store_dir.as_deref())?,
    };
    info!(store = %store_path.display(), "starting session");

    Ok(App {
        session: Session::new(Box::new(JsonTaskStore::new(store_path))),
        palette: config.theme().palette(),
        config,
        file_config: load.config,
        config_path: load.path,
        store_overridden,
    })
}

fn run_interactive(app: &mut App) -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    while !app.session.is_finished() {
        input.clear();
        let bytes = stdin_lock.read_line(&mut input)?;
        if bytes == 0 {
            break;
        }

        let line = match input.trim() {
            "" => continue,
            "?" => "help",
            other => other,
        };

        match app.run_line(line) {
            Ok(command) => app.print_outcome(&command)?,
            Err(err) => report(&err),
        }
    }

    app.session.close()
}

fn run_once(app: &mut App, tokens: &[String]) -> Result<(), AppError> {
    let outcome = app
        .run_tokens(tokens)
        .and_then(|command| app.print_outcome(&command));
    let closed = app.session.close();
    outcome.and(closed)
}

fn main() {
    init_logging();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            let rendered = err.to_string();
            let first_line = rendered.lines().next().unwrap_or("invalid arguments").trim();
            report(&AppError::invalid_input(
                first_line.strip_prefix("error: ").unwrap_or(first_line),
            ));
            std::process::exit(1);
        }
    };

    let mut app = match build_app(&cli) {
        Ok(app) => app,
        Err(err) => {
            report(&err);
            std::process::exit(1);
        }
    };

    let result = if cli.command.is_empty() {
        run_interactive(&mut app)
    } else {
        run_once(&mut app, &cli.command)
    };

    if let Err(err) = result {
        report(&err);
        std::process::exit(1);
    }
}
