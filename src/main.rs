use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod ai;
mod commands;
mod config;
mod db;
mod models;
mod session;

use commands::{
    AchievementsCommand, ActivityCommand, BriefingCommand, CharacterCommand, ConfigCommand,
    FastCommand, FoodCommand, ProfileCommand, StatsCommand, WaterCommand, WeightCommand,
};
use config::Config;
use db::init_db;
use fitquest_core::{SharedClock, SystemClock};
use session::Session;

#[derive(Parser)]
#[command(name = "fitquest")]
#[command(version)]
#[command(about = "A gamified fitness companion: log food, water, fasts and workouts, level up your coach", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// View and edit your profile
    Profile(ProfileCommand),

    /// Log and review food
    Food(FoodCommand),

    /// Log and review water
    Water(WaterCommand),

    /// Start, stop and watch fasts
    Fast(FastCommand),

    /// Log workouts and meditations
    Activity(ActivityCommand),

    /// Log weigh-ins and body measurements
    Weight(WeightCommand),

    /// Daily summary
    Stats(StatsCommand),

    /// Choose and customize your coach
    Character(CharacterCommand),

    /// Show achievements and streaks
    Achievements(AchievementsCommand),

    /// Get a briefing from your coach
    Briefing(BriefingCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitquest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let cli_config_path = cli.config.clone();
    let config = Config::load(cli.config)?;

    let Some(command) = cli.command else {
        println!("Use --help to see available commands");
        return Ok(());
    };

    if let Commands::Config(cmd) = &command {
        return cmd.run(&config, cli_config_path);
    }

    let pool = init_db(&config.database_path.value).await?;
    let clock: SharedClock = Arc::new(SystemClock);
    let mut session = Session::load(pool, config.user_id.value.clone(), clock).await?;

    match command {
        Commands::Profile(cmd) => cmd.run(&mut session).await?,
        Commands::Food(cmd) => cmd.run(&mut session, &config).await?,
        Commands::Water(cmd) => cmd.run(&mut session).await?,
        Commands::Fast(cmd) => cmd.run(&mut session).await?,
        Commands::Activity(cmd) => cmd.run(&mut session).await?,
        Commands::Weight(cmd) => cmd.run(&mut session).await?,
        Commands::Stats(cmd) => cmd.run(&session)?,
        Commands::Character(cmd) => cmd.run(&mut session).await?,
        Commands::Achievements(cmd) => cmd.run(&session)?,
        Commands::Briefing(cmd) => cmd.run(&session, &config).await?,
        Commands::Config(_) => {}
    }

    Ok(())
}
