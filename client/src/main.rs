use clap::{Parser, Subcommand};
use client::{ClientConfig, LogNavigator, SessionManager};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Client a riga di comando: ogni invocazione è un "mount" della sessione
#[derive(Parser)]
#[command(name = "client", about = "Login, logout and registration against the auth server")]
struct Cli {
    /// Sovrascrive API_BASE_URL
    #[arg(long)]
    api_base_url: Option<String>,

    /// Sovrascrive TOKEN_DIR
    #[arg(long)]
    token_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mostra l'utente della sessione salvata
    Whoami,
    Login { username: String, password: String },
    Logout,
    Register { username: String, password: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    let session: SessionManager = SessionManager::from_config(&config, Arc::new(LogNavigator));
    session.initialize().await;

    let outcome = match cli.command {
        Command::Whoami => {
            match session.current_user() {
                Some(user) => println!("{}", user),
                None => println!("not logged in"),
            }
            Ok(())
        }
        Command::Login { username, password } => session.login(&username, &password).await,
        Command::Logout => {
            session.logout();
            Ok(())
        }
        Command::Register { username, password } => {
            session
                .register(&json!({ "username": username, "password": password }))
                .await
        }
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<ClientConfig, String> {
    let config = ClientConfig::from_env()?;
    let api_base_url = cli
        .api_base_url
        .clone()
        .unwrap_or_else(|| config.api_base_url.to_string());
    let token_dir = cli
        .token_dir
        .clone()
        .map(PathBuf::from)
        .unwrap_or(config.token_dir);
    ClientConfig::new(&api_base_url, token_dir)
}
