mod config;
mod shell;
mod view;

use std::{path::PathBuf, sync::Arc};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{FileTokenStore, HttpPortalApi, SessionController, View};
use shared::domain::UserType;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::load_settings;

#[derive(Parser, Debug)]
#[command(name = "portal", about = "Carolina Machado course portal client")]
struct Args {
    /// Backend base URL, e.g. http://localhost:8001
    #[arg(long)]
    api_base_url: Option<String>,
    /// Directory holding the persisted session token.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default).
    Shell,
    Courses,
    Whoami,
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
        #[arg(long, default_value = "student")]
        user_type: String,
    },
    Logout,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let settings =
        load_settings(args.config.as_deref())?.with_overrides(args.api_base_url, args.data_dir)?;

    let filter = EnvFilter::try_new(&settings.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    info!(api = %settings.api_base_url, data_dir = %settings.data_dir.display(), "portal: starting");

    let api = HttpPortalApi::new(&settings.api_base_url)
        .with_context(|| format!("invalid api base url '{}'", settings.api_base_url))?;
    let tokens = FileTokenStore::new(settings.token_path());
    let controller = SessionController::new(Arc::new(api), Arc::new(tokens));
    controller.bootstrap().await;

    match args.command.unwrap_or(Command::Shell) {
        Command::Shell => shell::run(controller).await?,
        Command::Courses => {
            controller.navigate(View::Courses);
            print!("{}", view::render_content(&controller.snapshot()));
        }
        Command::Whoami => match controller.snapshot().user {
            Some(user) => println!(
                "{} <{}> ({})",
                user.name,
                user.email,
                view::user_type_label(user.user_type)
            ),
            None => println!("Não autenticado."),
        },
        Command::Login { email, password } => {
            authenticate(
                &controller,
                shell::ShellCommand::Login { email, password },
            )
            .await?
        }
        Command::Register {
            name,
            email,
            password,
            user_type,
        } => {
            let user_type: UserType = shell::parse_user_type(&user_type)?;
            authenticate(
                &controller,
                shell::ShellCommand::Register {
                    name,
                    email,
                    password,
                    user_type,
                },
            )
            .await?
        }
        Command::Logout => {
            controller.logout();
            println!("Sessão encerrada.");
        }
    }

    Ok(())
}

/// One-shot login/register: prints the resulting dashboard or fails with the form error.
async fn authenticate(controller: &SessionController, command: shell::ShellCommand) -> Result<()> {
    shell::execute(controller, command).await;
    let snapshot = controller.snapshot();
    if !snapshot.is_authenticated() {
        let error = snapshot.last_error.as_deref().unwrap_or("authentication failed");
        bail!("{error}");
    }
    print!("{}", view::render_content(&snapshot));
    Ok(())
}
