use anyhow::Result;
use clap::{Parser, Subcommand};
use taskdeck_infrastructure::ConfigService;
use tracing_subscriber::EnvFilter;

mod bootstrap;
mod commands;

use commands::prefs::PrefsAction;

#[derive(Parser)]
#[command(name = "taskdeck")]
#[command(about = "Taskdeck - manage your tasks from the terminal", long_about = None)]
struct Cli {
    /// API base URL, overriding config and environment
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account
    Register { username: String, telegram_id: i64 },
    /// Sign in and store the token pair
    Login {
        username: String,
        /// Read from stdin when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// List tasks using the saved view settings
    List,
    /// Show one task
    Show { id: String },
    /// Create a task
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date, RFC 3339 or YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        #[arg(long = "category")]
        categories: Vec<String>,
    },
    /// Change fields of a task
    Edit {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Move a task to TODO, IN_PROGRESS or DONE
    Status { id: String, status: String },
    /// Delete a task
    Delete { id: String },
    /// Inspect or change the list view settings
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
    /// Resolve a route the way navigation would
    Open { path: String },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ConfigService::new()?.load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url.trim_end_matches('/').to_string();
    }

    let ctx = bootstrap::bootstrap(config).await?;

    match cli.command {
        Commands::Register {
            username,
            telegram_id,
        } => commands::auth::register(&ctx, username, telegram_id).await?,
        Commands::Login { username, password } => {
            commands::auth::login(&ctx, username, password).await?
        }
        Commands::Logout => commands::auth::logout(&ctx).await?,
        Commands::Whoami => commands::auth::whoami(&ctx)?,
        Commands::List => commands::tasks::list(&ctx).await?,
        Commands::Show { id } => commands::tasks::show(&ctx, &id).await?,
        Commands::Add {
            title,
            description,
            due,
            categories,
        } => commands::tasks::add(&ctx, title, description, due, categories).await?,
        Commands::Edit {
            id,
            title,
            description,
            due,
        } => commands::tasks::edit(&ctx, &id, title, description, due).await?,
        Commands::Status { id, status } => commands::tasks::status(&ctx, &id, &status).await?,
        Commands::Delete { id } => commands::tasks::delete(&ctx, &id).await?,
        Commands::Prefs { action } => commands::prefs::run(&ctx, action).await?,
        Commands::Open { path } => commands::open(&ctx, &path)?,
    }

    Ok(())
}
