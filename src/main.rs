mod app;
mod auth;
mod cli;
mod config;
mod db;
mod domain;
mod images;
mod models;
mod telemetry;
mod ui;

use std::io;

use anyhow::{bail, Result};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tui::{backend::CrosstermBackend, Terminal};

use crate::app::{today, AppState};
use crate::config::Config;
use crate::domain::DateRange;
use crate::images::ImageStore;

#[derive(Parser, Debug)]
#[command(
    name = "realty_manager",
    about = "Back office for a real-estate agency: listings, customers, contracts and payments",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the terminal interface (default command)
    Tui,
    /// Apply pending database migrations and exit
    Migrate,
    /// Manage staff logins
    User {
        #[command(subcommand)]
        command: UserCommand,
    },
    /// Print reports without opening the interface
    Report {
        #[command(subcommand)]
        command: ReportCommand,
    },
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Create a login
    Add {
        username: String,
        full_name: String,
        /// Initial password
        #[arg(long)]
        password: String,
        /// Grant delete rights and user management
        #[arg(long)]
        admin: bool,
    },
    /// List every login
    List,
}

#[derive(Subcommand, Debug)]
enum ReportCommand {
    /// Income, expenses and net per month of a year
    Monthly {
        /// Calendar year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,
    },
    /// Employees ranked by signed contract value
    Top {
        /// First signing date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        from: Option<NaiveDate>,
        /// Last signing date to include (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        to: Option<NaiveDate>,
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },
    /// Counts and totals for the current month
    Dashboard,
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    let config = config::init()?;
    telemetry::init(&config)?;

    let db = db::init(&config).await?;

    match cli.command.unwrap_or(Command::Tui) {
        Command::Tui => run_tui(&config, db).await,
        Command::Migrate => {
            println!("Database schema is up to date");
            Ok(())
        }
        Command::User { command } => match command {
            UserCommand::Add {
                username,
                full_name,
                password,
                admin,
            } => {
                let first = db.count_users().await? == 0;
                if first && !admin {
                    bail!("the first login must be created with --admin");
                }
                let id = cli::add_user(&db, &username, &full_name, &password, admin).await?;
                println!("Created user #{id} ({username})");
                Ok(())
            }
            UserCommand::List => {
                println!("{}", cli::users_table(&db.load_users().await?));
                Ok(())
            }
        },
        Command::Report { command } => match command {
            ReportCommand::Monthly { year } => {
                cli::print_monthly(&db, year.unwrap_or_else(|| today().year())).await
            }
            ReportCommand::Top { from, to, limit } => {
                cli::print_top(&db, DateRange { from, to }, limit).await
            }
            ReportCommand::Dashboard => cli::print_dashboard(&db, today()).await,
        },
    }
}

async fn run_tui(config: &Config, db: db::Database) -> Result<()> {
    if db.count_users().await? == 0 {
        bail!("no logins exist yet; create one with `realty_manager user add <username> <full name> --password <password> --admin`");
    }
    let images = ImageStore::new(&config.image_dir)?;
    tracing::info!(image_dir = %images.root().display(), "starting interface");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app_state = AppState::new(db, images);
    let result = app::run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        tracing::error!("interface stopped: {err:#}");
    }
    result
}
