use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todo_list::config::{ServerConfig, DEFAULT_HOST, DEFAULT_PORT};
use todo_list::service::TaskService;
use todo_list::{api, db};

#[derive(Parser)]
#[command(name = "todo-list")]
#[command(about = "Task tracking server with inline title macros")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve(ServeArgs),
    /// Apply database migrations and exit
    Migrate {
        /// SQLite database file
        #[arg(long, env = "TODO_LIST_DB")]
        database: Option<PathBuf>,
    },
}

#[derive(Parser)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, env = "TODO_LIST_HOST", default_value = DEFAULT_HOST)]
    host: String,

    /// Port for HTTP API
    #[arg(short, long, env = "TODO_LIST_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// SQLite database file
    #[arg(long, env = "TODO_LIST_DB")]
    database: Option<PathBuf>,

    /// Allowed CORS origins, comma separated
    #[arg(long, env = "TODO_LIST_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,
}

impl From<ServeArgs> for ServerConfig {
    fn from(args: ServeArgs) -> Self {
        Self {
            host: args.host,
            port: args.port,
            database: args.database,
            cors_origins: args.cors_origins,
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "todo_list=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let db = match path {
        Some(path) => db::Database::open(path)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;
    Ok(db)
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let db = open_database(config.database.clone())?;
    let app = api::create_router_with_config(TaskService::new(db), &config);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Task server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve(args)) => serve(args.into()).await?,
        Some(Commands::Migrate { database }) => {
            open_database(database)?;
            tracing::info!("Database is up to date");
        }
        None => serve(ServeArgs::parse_from(["todo-list"]).into()).await?,
    }

    Ok(())
}
