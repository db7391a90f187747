mod apininjas;
mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use crate::commands::{
    cmd_bp, cmd_delete, cmd_fluid_add, cmd_fluid_clear, cmd_fluid_goal, cmd_history, cmd_log,
    cmd_prefs_set, cmd_prefs_show, cmd_report, cmd_search, cmd_show,
};
use crate::config::Config;
use vitals_core::store::Store;

#[derive(Parser)]
#[command(
    name = "vitals",
    version,
    about = "A simple daily health tracker CLI",
    long_about = "\n\n  ██╗   ██╗██╗████████╗ █████╗ ██╗     ███████╗
  ██║   ██║██║╚══██╔══╝██╔══██╗██║     ██╔════╝
  ██║   ██║██║   ██║   ███████║██║     ███████╗
  ╚██╗ ██╔╝██║   ██║   ██╔══██║██║     ╚════██║
   ╚████╔╝ ██║   ██║   ██║  ██║███████╗███████║
    ╚═══╝  ╚═╝   ╚═╝   ╚═╝  ╚═╝╚══════╝╚══════╝
        know your numbers.
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Log a food entry for a meal slot
    Log {
        /// Food name
        name: String,
        /// Meal slot: breakfast, lunch, dinner, snacks
        #[arg(short, long, default_value = "snacks")]
        meal: String,
        /// Calories
        #[arg(long)]
        calories: Option<f64>,
        /// Protein in grams
        #[arg(long)]
        protein: Option<f64>,
        /// Carbs in grams
        #[arg(long)]
        carbs: Option<f64>,
        /// Fat in grams
        #[arg(long)]
        fat: Option<f64>,
        /// Sodium in mg
        #[arg(long)]
        sodium: Option<f64>,
        /// Potassium in mg
        #[arg(long)]
        potassium: Option<f64>,
        /// Date to log for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Look up nutrition data for a free-text description
    Search {
        /// Quantity + food description (e.g. "1 cup rice and 2 eggs")
        query: String,
        /// Log the results to a meal slot
        #[arg(long)]
        log: bool,
        /// Meal slot when logging: breakfast, lunch, dinner, snacks
        #[arg(short, long, default_value = "snacks")]
        meal: String,
        /// Date to log for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Record a blood-pressure reading for a daily time window
    Bp {
        /// Time window: morning, afternoon, evening
        window: String,
        /// Systolic pressure (mmHg)
        #[arg(long)]
        systolic: Option<f64>,
        /// Diastolic pressure (mmHg)
        #[arg(long)]
        diastolic: Option<f64>,
        /// Heart rate (bpm)
        #[arg(long)]
        heart_rate: Option<f64>,
        /// Date to record for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Track fluid intake
    Fluid {
        #[command(subcommand)]
        command: FluidCommands,
    },
    /// Show one day's record (default: today)
    Show {
        /// Date to show (YYYY-MM-DD or today/yesterday)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the tracked history, newest first
    History {
        /// Number of days to show
        #[arg(short, long, default_value = "7")]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a day's record
    Delete {
        /// Date of the record to delete (YYYY-MM-DD)
        date: String,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate the report document
    Report {
        /// Directory to write the report into (default: current directory)
        #[arg(long)]
        out: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Display preferences for `show` sections
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
}

#[derive(Subcommand)]
enum FluidCommands {
    /// Add a fluid entry in ounces
    Add {
        /// Amount in ounces
        ounces: f64,
        /// Date to log for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set the daily fluid goal in ounces
    Goal {
        /// Goal in ounces
        ounces: f64,
        /// Date to set for (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Clear all fluid entries for a day
    Clear {
        /// Date to clear (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PrefsCommands {
    /// Show or hide a section: meals, bp, fluid
    Set {
        /// Section name
        section: String,
        /// on or off
        state: String,
    },
    /// Show the current section preferences
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let store = Store::open(&config.db_path)?;

    // Session-start retention pass: keep the trailing seven days inclusive.
    let today = chrono::Local::now().date_naive();
    store.prune_older_than(today - chrono::Duration::days(7))?;

    match cli.command {
        Commands::Log {
            name,
            meal,
            calories,
            protein,
            carbs,
            fat,
            sodium,
            potassium,
            date,
            json,
        } => cmd_log(
            &store, &name, &meal, calories, protein, carbs, fat, sodium, potassium, date, json,
        ),
        Commands::Search {
            query,
            log,
            meal,
            date,
            json,
        } => {
            let client = apininjas::ApiNinjasClient::new(config.nutrition_api_key()?);
            cmd_search(&store, &client, &query, log, &meal, date, json).await
        }
        Commands::Bp {
            window,
            systolic,
            diastolic,
            heart_rate,
            date,
            json,
        } => cmd_bp(&store, &window, systolic, diastolic, heart_rate, date, json),
        Commands::Fluid { command } => match command {
            FluidCommands::Add { ounces, date, json } => cmd_fluid_add(&store, ounces, date, json),
            FluidCommands::Goal { ounces, date, json } => {
                cmd_fluid_goal(&store, ounces, date, json)
            }
            FluidCommands::Clear { date, yes, json } => cmd_fluid_clear(&store, date, yes, json),
        },
        Commands::Show { date, json } => cmd_show(&store, date, json),
        Commands::History { days, json } => cmd_history(&store, days, json),
        Commands::Delete { date, yes, json } => cmd_delete(&store, &date, yes, json),
        Commands::Report { out, json } => cmd_report(&store, out, json),
        Commands::Prefs { command } => match command {
            PrefsCommands::Set { section, state } => cmd_prefs_set(&store, &section, &state),
            PrefsCommands::Show { json } => cmd_prefs_show(&store, json),
        },
    }
}
