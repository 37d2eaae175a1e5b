use std::{path::PathBuf, sync::Arc, time::Duration};

use clap::{Parser, Subcommand};
use pokedash_client::{Client, ClientBuilder, Navigator};
use pokedash_common::storage::FileStorage;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_URL: &str = "http://localhost:3000";

#[derive(Parser, Debug)]
#[command(name = "pokedash", version, about = "Pokedash dashboard from the command line")]
struct Cli {
    /// Base URL of the pokedash API [default: $POKEDASH_URL, else http://localhost:3000]
    #[arg(long, global = true)]
    url: Option<String>,

    /// File the session is persisted in between invocations
    #[arg(
        long,
        env = "POKEDASH_SESSION_FILE",
        default_value = ".pokedash-session.json",
        global = true
    )]
    session_file: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30, global = true)]
    timeout: u64,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long)]
        username: String,

        #[arg(long, env = "POKEDASH_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account and store the session.
    Register {
        #[arg(long)]
        username: String,

        #[arg(long, env = "POKEDASH_PASSWORD", hide_env_values = true)]
        password: String,

        #[arg(long)]
        email: Option<String>,
    },

    /// End the session.
    Logout,

    /// Show whether the stored session may open the dashboard.
    Status,

    /// List pokemons on the dashboard.
    List {
        /// Print raw JSON instead of a table
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Add a pokemon to the dashboard.
    Add {
        #[arg(long)]
        name: String,

        /// Elemental type, e.g. "fire"
        #[arg(long = "type")]
        kind: Option<String>,
    },
}

/// Tells the user to log in again once the session could not be refreshed.
struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn redirect(&self, path: &str) {
        tracing::debug!(path, "redirect");
        eprintln!("Your session has ended. Run `pokedash login` to sign in again.");
    }
}

/// `RUST_LOG` if set, `info` otherwise.
fn log_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// An explicit `--url` wins, then the environment, then the local development server.
fn client_builder(url: Option<String>, session_file: PathBuf) -> ClientBuilder {
    let builder = match url {
        Some(url) => Client::builder().with_url(url),
        None => Client::builder().from_environment().unwrap_or_else(|err| {
            tracing::debug!(%err, "using {DEFAULT_URL}");
            Client::builder().with_url(DEFAULT_URL)
        }),
    };

    builder.with_storage(Arc::new(FileStorage::new(session_file)))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let client = client_builder(cli.url, cli.session_file)
        .with_navigator(TerminalNavigator)
        .with_timeout(Duration::from_secs(cli.timeout))
        .build()?;

    match cli.cmd {
        Command::Login { username, password } => {
            commands::login(&client, username, password).await
        }
        Command::Register {
            username,
            password,
            email,
        } => commands::register(&client, username, password, email).await,
        Command::Logout => commands::logout(&client).await,
        Command::Status => commands::status(&client),
        Command::List { json } => commands::list(&client, json).await,
        Command::Add { name, kind } => commands::add(&client, name, kind).await,
    }
}
