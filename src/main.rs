use anyhow::Result;
use clap::{Parser, Subcommand};
use nutriplan_shared::mealplan::{DayKey, MealCategory};
use time::Date;

mod cli;

/// nutriplan - weekly diet plans and meal tracking
#[derive(Parser)]
#[command(name = "nutriplan")]
#[command(about = "Weekly diet plans and daily meal tracking", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage diet plans
    Plan {
        #[command(subcommand)]
        command: cli::plan::PlanCommand,
    },
    /// Show a day's meals with completion status and progress
    Today {
        #[arg(long)]
        owner: String,

        /// Plan id, the active plan when omitted
        #[arg(long)]
        plan: Option<String>,

        /// YYYY-MM-DD, today when omitted
        #[arg(long, value_parser = cli::parse_date)]
        date: Option<Date>,
    },
    /// Flip a meal between completed and incomplete
    Toggle {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        plan: String,

        #[arg(long)]
        day: DayKey,

        #[arg(long)]
        category: MealCategory,

        #[arg(long)]
        meal: String,

        /// YYYY-MM-DD, today when omitted
        #[arg(long, value_parser = cli::parse_date)]
        date: Option<Date>,
    },
    /// Show progress for each day of a week
    Week {
        #[arg(long)]
        owner: String,

        #[arg(long)]
        plan: Option<String>,

        /// Any day of the week, today when omitted
        #[arg(long, value_parser = cli::parse_date)]
        date: Option<Date>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = nutriplan::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    nutriplan::observability::init_observability(
        "nutriplan",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
        config.observability.json,
    )?;

    let result = match cli.command {
        Commands::Migrate => nutriplan::migrate::migrate(&config).await,
        Commands::Plan { command } => cli::plan::run(config, command).await,
        Commands::Today { owner, plan, date } => {
            cli::tracking::today(config, owner, plan, date).await
        }
        Commands::Toggle {
            owner,
            plan,
            day,
            category,
            meal,
            date,
        } => cli::tracking::toggle(config, owner, plan, day, category, meal, date).await,
        Commands::Week { owner, plan, date } => {
            cli::tracking::week(config, owner, plan, date).await
        }
    };

    if let Err(err) = &result {
        tracing::error!(error = %err, "command failed");
    }

    result
}
