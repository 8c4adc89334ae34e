use std::{path::PathBuf, sync::Arc};

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use skier_service::{
    adapters::database::memory::{MemoryDatabase, Snapshot},
    domain::{Color, Piste, PisteId, Skier, SkierId, Subscription, TypeSubscription},
    logger, Config, SkierService,
};

#[derive(Debug, Parser)]
#[command(name = "skier-service")]
#[command(about = "Manage skiers, their subscriptions and piste assignments")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding the skier store between runs
    #[arg(long, default_value = "skiers.json")]
    store: PathBuf,

    #[arg(long, short, help = "Enable verbose output")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List all skiers
    List,
    /// Show a single skier
    Show { skier_id: SkierId },
    /// Add a skier, optionally with a subscription
    Add {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        date_of_birth: NaiveDate,
        #[arg(long)]
        city: String,
        /// ANNUAL, SEMESTRIAL or MONTHLY
        #[arg(long, requires = "start_date")]
        subscription: Option<TypeSubscription>,
        #[arg(long, requires = "subscription")]
        start_date: Option<NaiveDate>,
    },
    /// Remove a skier
    Remove { skier_id: SkierId },
    /// List skiers holding a subscription of the given type
    ByType { type_sub: TypeSubscription },
    /// Register a new piste
    AddPiste {
        #[arg(long)]
        name: String,
        #[arg(long, value_enum)]
        color: PisteColor,
        /// Length in meters
        #[arg(long)]
        length: u32,
        /// Slope in percent
        #[arg(long)]
        slope: u32,
    },
    /// Assign a skier to a piste
    AssignPiste { skier_id: SkierId, piste_id: PisteId },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PisteColor {
    Green,
    Blue,
    Red,
    Black,
}

impl From<PisteColor> for Color {
    fn from(color: PisteColor) -> Self {
        match color {
            PisteColor::Green => Color::Green,
            PisteColor::Blue => Color::Blue,
            PisteColor::Red => Color::Red,
            PisteColor::Black => Color::Black,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logger::init_cli_logger(cli.verbose);
    tracing::debug!(?cli, "starting skier-service");

    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let database = Arc::new(MemoryDatabase::from_snapshot(Snapshot::load(&cli.store)?));
    let service = SkierService::new(database.clone(), database.clone(), config.subscriptions);

    match cli.command {
        Command::List => print_json(&service.retrieve_all_skiers().await?)?,
        Command::Show { skier_id } => print_json(&service.retrieve_skier(skier_id).await?)?,
        Command::ByType { type_sub } => {
            print_json(&service.retrieve_skiers_by_subscription_type(type_sub).await?)?
        }
        Command::Add {
            first_name,
            last_name,
            date_of_birth,
            city,
            subscription,
            start_date,
        } => {
            let mut skier = Skier::new(first_name, last_name, date_of_birth, city);
            if let (Some(type_sub), Some(start_date)) = (subscription, start_date) {
                skier = skier.with_subscription(Subscription::new(start_date, type_sub));
            }
            let skier = service.add_skier(skier).await?;
            database.snapshot()?.save(&cli.store)?;
            print_json(&skier)?;
        }
        Command::Remove { skier_id } => {
            service.remove_skier(skier_id).await?;
            database.snapshot()?.save(&cli.store)?;
        }
        Command::AddPiste {
            name,
            color,
            length,
            slope,
        } => {
            let piste = database.insert_piste(Piste {
                piste_id: None,
                name,
                color: color.into(),
                length,
                slope,
            })?;
            database.snapshot()?.save(&cli.store)?;
            print_json(&piste)?;
        }
        Command::AssignPiste { skier_id, piste_id } => {
            let skier = service.assign_skier_to_piste(skier_id, piste_id).await?;
            database.snapshot()?.save(&cli.store)?;
            print_json(&skier)?;
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
