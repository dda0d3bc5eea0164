//! # CLI Layer
//!
//! One possible UI client for shelf. This layer is the **only** place that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Handles argument parsing
//! - Formats output for human consumption
//!
//! ## Sessions
//!
//! Catalog state lives only as long as the process. A one-shot command such
//! as `shelf borrow 3` works on a fresh copy of the seed and prints the
//! result. `shelf shell` keeps one catalog alive and reads commands line by
//! line, so borrows and returns carry over between commands until the shell
//! exits.
//!
//! ## Structure
//!
//! - `run()`: parses arguments, sets up logging and the session, dispatches
//! - `dispatch()`: routes one parsed command to its handler
//! - `handle_*()`: per-command handlers that call the API and print output
//! - `run_shell()`: the interactive session loop
//!
//! ## Exit Status
//!
//! A one-shot command exits 1 when it fails outright or when its result
//! carries any error message (e.g. one id of a batch borrow was already out).
//! Successful parts of a batch stay applied either way. `config` never loads
//! the catalog, so a broken `seed` setting can always be changed.

use super::render::{
    print_messages, render_book_list, render_facets, render_full_books, render_text_list,
    terminal_width,
};
use super::setup::{Cli, Commands, SearchArgs, ShellLine};
use clap::Parser;
use colored::Colorize;
use shelf::api::{
    BorrowOptions, CmdMessage, CmdResult, ConfigAction, FilterCriteria, ShelfApi,
};
use shelf::commands;
use shelf::error::{Result, ShelfError};
use shelf::init::{config_dir, initialize};
use shelf::model::Condition;
use shelf::store::memory::InMemoryStore;
use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SHELF_LOG";
const SHELL_PROMPT: &str = "shelf> ";

struct AppContext {
    api: ShelfApi<InMemoryStore>,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let command = match cli.command {
        Some(Commands::Config { key, value }) => {
            let result = handle_config_file(&config_dir(), key, value)?;
            return Ok(exit_code(&result));
        }
        other => other,
    };

    let ctx = initialize(config_dir(), cli.seed.as_deref())?;
    let mut ctx = AppContext { api: ctx.api };

    let result = match command {
        Some(Commands::Shell) => {
            run_shell(&mut ctx)?;
            return Ok(ExitCode::SUCCESS);
        }
        Some(command) => dispatch(&mut ctx, command)?,
        None => handle_list(&ctx)?,
    };
    Ok(exit_code(&result))
}

fn exit_code(result: &CmdResult) -> ExitCode {
    if result.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "shelf=debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

fn dispatch(ctx: &mut AppContext, command: Commands) -> Result<CmdResult> {
    match command {
        Commands::List => handle_list(ctx),
        Commands::Search(args) => handle_search(ctx, &args),
        Commands::Facets => handle_facets(ctx),
        Commands::View { ids } => handle_view(ctx, &ids),
        Commands::Borrow {
            ids,
            borrower,
            condition,
            note,
        } => handle_borrow(ctx, &ids, borrower, condition, note),
        Commands::Return { ids } => handle_return(ctx, &ids),
        Commands::Config { key, value } => handle_config(ctx, key, value),
        Commands::Shell => {
            let mut result = CmdResult::default();
            result.add_message(CmdMessage::warning("Already in a shell session."));
            print_messages(&result.messages);
            Ok(result)
        }
    }
}

fn handle_list(ctx: &AppContext) -> Result<CmdResult> {
    let result = ctx.api.list_all()?;
    print!("{}", render_book_list(&result.listed_books, terminal_width()));
    print_messages(&result.messages);
    Ok(result)
}

fn handle_search(ctx: &AppContext, args: &SearchArgs) -> Result<CmdResult> {
    let criteria: FilterCriteria = args.criteria();
    let result = ctx.api.filter(&criteria)?;
    if !result.listed_books.is_empty() {
        print!("{}", render_book_list(&result.listed_books, terminal_width()));
    }
    print_messages(&result.messages);
    Ok(result)
}

fn handle_facets(ctx: &AppContext) -> Result<CmdResult> {
    let result = ctx.api.facets()?;
    if let Some(facets) = &result.facets {
        print!("{}", render_facets(facets));
    }
    print_messages(&result.messages);
    Ok(result)
}

fn handle_view(ctx: &AppContext, ids: &[String]) -> Result<CmdResult> {
    let result = ctx.api.view(ids)?;
    print!("{}", render_full_books(&result.listed_books));
    print_messages(&result.messages);
    Ok(result)
}

fn handle_borrow(
    ctx: &mut AppContext,
    ids: &[String],
    borrower: Option<String>,
    condition: Option<Condition>,
    note: Option<String>,
) -> Result<CmdResult> {
    let options = BorrowOptions {
        borrower,
        condition,
        notes: note,
    };
    let result = ctx.api.borrow(ids, options)?;
    print_messages(&result.messages);
    Ok(result)
}

fn handle_return(ctx: &mut AppContext, ids: &[String]) -> Result<CmdResult> {
    let result = ctx.api.return_books(ids)?;
    print_messages(&result.messages);
    Ok(result)
}

fn handle_config(
    ctx: &mut AppContext,
    key: Option<String>,
    value: Option<String>,
) -> Result<CmdResult> {
    let show_all = key.is_none();
    let result = ctx.api.config(config_action(key, value))?;
    print_config(&result, show_all);
    Ok(result)
}

/// Config outside a session: reads and writes `config.json` without seeding.
fn handle_config_file(
    config_dir: &Path,
    key: Option<String>,
    value: Option<String>,
) -> Result<CmdResult> {
    let show_all = key.is_none();
    let result = commands::config::run(config_dir, config_action(key, value))?;
    print_config(&result, show_all);
    Ok(result)
}

fn config_action(key: Option<String>, value: Option<String>) -> ConfigAction {
    match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    }
}

fn print_config(result: &CmdResult, show_all: bool) {
    if show_all {
        let lines: Vec<String> = result
            .config
            .iter()
            .flat_map(|config| config.list_all())
            .map(|(k, v)| format!("{} = {}", k, v))
            .collect();
        print!("{}", render_text_list(&lines, "No configuration values."));
    }
    print_messages(&result.messages);
}

fn run_shell(ctx: &mut AppContext) -> Result<()> {
    let stdin = io::stdin();
    let interactive = stdin.is_terminal();
    if interactive {
        println!(
            "{}",
            "Shelf session. Type a command (e.g. `search dune`, `borrow 1`), `help`, or `quit`."
                .dimmed()
        );
    }

    let mut line = String::new();
    loop {
        if interactive {
            print!("{}", SHELL_PROMPT);
            io::stdout().flush()?;
        }

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if matches!(input, "quit" | "exit" | "q") {
            break;
        }

        let words = match split_line(input) {
            Ok(words) => words,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        };

        match ShellLine::try_parse_from(words) {
            Ok(parsed) => {
                if let Err(e) = dispatch(ctx, parsed.command) {
                    tracing::debug!(error = ?e, "command failed");
                    eprintln!("{}", format!("Error: {}", e).red());
                }
            }
            Err(e) => e.print()?,
        }
    }

    Ok(())
}

/// Splits a shell line into words, honoring single and double quotes.
fn split_line(input: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err(ShelfError::Api("Unterminated quote".into()));
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}
