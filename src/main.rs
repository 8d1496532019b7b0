//! goal-sync - Command-line entry point
//!
//! Thin CLI over the `goal_sync` library: parses arguments, builds the
//! remote store, runs one subcommand, and prints the operator report.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use goal_sync::{
    BatchFile, Collection, GoalMap, ImportDriver, NotionConfig, NotionStore, PageStore, Reconciler,
    report,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Keep Goals and Todos in a hosted workspace linked both ways
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    #[command(flatten)]
    remote: RemoteArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct RemoteArgs {
    /// Integration token for the hosted API
    #[arg(long, env = "NOTION_API_TOKEN", hide_env_values = true)]
    api_token: String,

    /// Identifier of the Goals database
    #[arg(long = "goals-db", env = "NOTION_GOALS_DATABASE_ID")]
    goals_database_id: String,

    /// Identifier of the Todos database
    #[arg(long = "todos-db", env = "NOTION_TODOS_DATABASE_ID")]
    todos_database_id: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a batch import from a TOML file and link each todo to its goal
    Import {
        /// Path to the batch file (goals, todos, goal_map)
        batch: PathBuf,
    },
    /// Make every existing Todo->Goal reference symmetric again
    Repair,
    /// Print a relation-count summary of both collections
    Summary,
    /// Add the relation and goal-tracking properties to both databases
    Schema,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("goal_sync=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = NotionStore::new(NotionConfig::new(
        cli.remote.api_token,
        cli.remote.goals_database_id,
        cli.remote.todos_database_id,
    ))?;

    match cli.command {
        Command::Import { batch } => {
            let batch = BatchFile::load(&batch)?;
            let mut driver = ImportDriver::new(&store, GoalMap::new(batch.goal_map.clone()));
            let setup = driver.ensure_goals(&batch.goals).await;
            let summary = driver.run(&batch.todos).await;
            print!("{}", report::format_batch_summary(&setup, &summary));
            if summary.total_failure() {
                anyhow::bail!("every link in the batch failed");
            }
        }
        Command::Repair => {
            let goals = store.list_all(Collection::Goals).await?;
            let todos = store.list_all(Collection::Todos).await?;
            let reconciler = Reconciler::new(&store);
            let outcome = reconciler.repair(&goals, &todos).await;
            print!("{}", report::format_repair_report(&outcome));
        }
        Command::Summary => {
            let goals = store.list_all(Collection::Goals).await?;
            let todos = store.list_all(Collection::Todos).await?;
            let summary = report::RelationSummary::gather(&goals, &todos);
            print!("{}", report::format_relation_summary(&summary));
        }
        Command::Schema => {
            store.ensure_relation_properties().await?;
            println!("Relation and goal-tracking properties are in place");
        }
    }

    Ok(())
}
