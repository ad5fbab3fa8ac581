//! Season CLI
//!
//! League calendar generation and inspection from the command line

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use log::info;
use season_core::api::{phase_for_date, team_schedule, LeagueCalendarRequest, TeamScheduleRequest, TeamScheduleSummary};
use season_core::{CalendarEvent, LeagueCalendar, LeagueStructure, ScheduleConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "season")]
#[command(about = "Generate and inspect franchise season calendars", long_about = None)]
struct Cli {
    /// Debug logging regardless of RUST_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build every team's calendar for a league year
    Generate {
        /// Season year (2025 = the 2025-26 season)
        #[arg(long)]
        season: i32,

        /// Schedule seed, overrides the config file
        #[arg(long)]
        seed: Option<u64>,

        /// YAML schedule config
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the full league calendar as JSON instead of a summary
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Print one team's slate
    Team {
        #[arg(long)]
        season: i32,

        /// Team id (e.g. "BOS")
        #[arg(long)]
        team: String,

        #[arg(long)]
        seed: Option<u64>,

        /// Only show one month (YYYY-MM)
        #[arg(long)]
        month: Option<String>,
    },

    /// Classify a date into league and team phases
    Phase {
        #[arg(long)]
        season: i32,

        /// Date (YYYY-MM-DD)
        #[arg(long)]
        date: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Generate { season, seed, config, out } => {
            let config = load_config(config.as_deref(), seed)?;
            generate(season, &config, out.as_deref())?;
        }
        Commands::Team { season, team, seed, month } => {
            print_team(season, team, seed, month.as_deref())?;
        }
        Commands::Phase { season, date } => {
            let date = parse_date(&date)?;
            let phases = phase_for_date(season, date)?;
            println!("{date}");
            println!("  League: {}", phases.league_phase.display_name());
            println!("  Team:   {}", phases.team_phase.display_name());
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn load_config(path: Option<&Path>, seed: Option<u64>) -> Result<ScheduleConfig> {
    let config = match path {
        Some(path) => {
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            ScheduleConfig::from_yaml_str(&yaml)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => ScheduleConfig::standard(),
    };
    Ok(match seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn generate(season: i32, config: &ScheduleConfig, out: Option<&Path>) -> Result<()> {
    info!("Generating {season} league calendar (seed {:#x})", config.seed);
    let league = LeagueCalendar::new(season, &LeagueStructure::standard(), config)?;

    if let Some(out) = out {
        let json = serde_json::to_string_pretty(&league)?;
        std::fs::write(out, json).with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Wrote {} team calendars to {}", league.teams().count(), out.display());
        return Ok(());
    }

    println!("{:<5} {:>5} {:>5} {:>5} {:>4}  {:<10} {:<10}", "TEAM", "GAMES", "HOME", "B2B", "TV", "FIRST", "LAST");
    for calendar in league.teams() {
        let s = TeamScheduleSummary::from_calendar(calendar);
        println!(
            "{:<5} {:>5} {:>5} {:>5} {:>4}  {:<10} {:<10}",
            s.team_id,
            s.total_games,
            s.home_games,
            s.back_to_backs,
            s.national_broadcasts,
            s.first_game.map(|d| d.to_string()).unwrap_or_default(),
            s.last_game.map(|d| d.to_string()).unwrap_or_default(),
        );
    }
    Ok(())
}

fn print_team(season: i32, team_id: String, seed: Option<u64>, month: Option<&str>) -> Result<()> {
    let request = TeamScheduleRequest {
        league: LeagueCalendarRequest { season_year: season, seed, config: None },
        team_id,
        as_of: None,
    };
    let calendar = team_schedule(&request)?;

    let events: &[CalendarEvent] = match month {
        Some(month) => {
            let (year, month) = parse_month(month)?;
            calendar.events_in_month(year, month)
        }
        None => calendar.events(),
    };

    println!("{} {}-{:02}: {} events", calendar.team_id(), season, (season + 1) % 100, events.len());
    for event in events {
        let side = match event.game_info() {
            Some(_) if event.is_home_game() => "H",
            Some(_) => "A",
            None => " ",
        };
        let tv = event.broadcaster().unwrap_or("");
        println!("{}  {}  {:<22} {:<40} {}", event.date(), side, event.kind().display_name(), event.title(), tv);
    }
    Ok(())
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let Some((year, month)) = s.split_once('-') else {
        bail!("Invalid month '{s}', expected YYYY-MM");
    };
    let year: i32 = year.parse().with_context(|| format!("Invalid year in '{s}'"))?;
    let month: u32 = month.parse().with_context(|| format!("Invalid month in '{s}'"))?;
    if !(1..=12).contains(&month) {
        bail!("Month out of range in '{s}'");
    }
    Ok((year, month))
}
