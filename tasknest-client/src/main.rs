//! # TaskNest CLI
//!
//! Command-line client for the TaskNest API.
//!
//! ## Usage
//!
//! ```bash
//! tasknest register alice --password pw1
//! tasknest add "Buy milk" --priority high
//! tasknest list
//! tasknest delete <task-id>
//! ```
//!
//! Running `tasknest` with no command shows the task list when a session
//! is saved.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasknest_client::{
    api::ApiClient, controller::SessionController, session::SessionStore, ClientError,
};
use tasknest_shared::models::task::TaskPriority;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Personal task list client
#[derive(Parser, Debug)]
#[command(name = "tasknest", version)]
#[command(about = "Manage your TaskNest tasks from the terminal")]
struct Cli {
    /// API server base URL
    #[arg(long, env = "TASKNEST_SERVER", default_value = "http://127.0.0.1:5000")]
    server: String,

    /// Session file (default: ~/.tasknest/session.json)
    #[arg(long, env = "TASKNEST_SESSION_FILE")]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create an account and log in
    Register {
        username: String,

        #[arg(short, long, env = "TASKNEST_PASSWORD")]
        password: String,
    },

    /// Log in and save the session
    Login {
        username: String,

        #[arg(short, long, env = "TASKNEST_PASSWORD")]
        password: String,
    },

    /// Forget the saved session
    Logout,

    /// Show your tasks, newest first
    List,

    /// Add a task
    Add {
        title: String,

        /// Low, Medium or High (server default: Medium)
        #[arg(short, long)]
        priority: Option<TaskPriority>,
    },

    /// Delete a task by id
    Delete { id: String },

    /// Show who is logged in
    Whoami,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tasknest_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let store = match cli.session_file {
        Some(path) => SessionStore::new(path),
        None => SessionStore::at_default_path(),
    };
    let api = ApiClient::new(cli.server)?;
    let mut controller = SessionController::start(api, store)?;

    let result = match cli.command {
        Some(Commands::Register { username, password }) => {
            controller.register(&username, &password).await.map(Some)
        }
        Some(Commands::Login { username, password }) => {
            controller.login(&username, &password).await.map(Some)
        }
        Some(Commands::Logout) => {
            controller.logout()?;
            println!("Logged out");
            return Ok(());
        }
        Some(Commands::Whoami) => {
            match controller.session() {
                Some(session) => println!("{}", session.username),
                None => println!("Not logged in"),
            }
            return Ok(());
        }
        Some(Commands::List) => controller.dashboard().await.map(Some),
        Some(Commands::Add { title, priority }) => {
            controller.add_task(&title, priority).await.map(Some)
        }
        Some(Commands::Delete { id }) => controller.delete_task(&id).await.map(Some),
        // Bare invocation: show the list only if already logged in
        None if controller.is_logged_in() => controller.dashboard().await.map(Some),
        None => Ok(None),
    };

    match result {
        Ok(Some(dashboard)) => print!("{}", dashboard),
        Ok(None) => println!("Not logged in. Run `tasknest login <username> --password <password>`."),
        Err(err) => {
            if err.is_auth_failure() && !matches!(err, ClientError::NotLoggedIn) {
                eprintln!("Your session may have expired; log in again.");
            }
            return Err(err.into());
        }
    }

    Ok(())
}
