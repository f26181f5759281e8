//! Line-oriented command loop driving the session controller.

use std::sync::Arc;

use client_core::{SessionController, SessionError, TransportError, View};
use shared::{
    domain::{CourseId, UserType},
    error::ErrorCode,
};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::view;

pub const HELP: &str = "\
Comandos:
  home | courses | login | register | dashboard   navegar
  login <email> <senha>                            entrar
  register <email> <senha> <tipo> <nome>           criar conta (tipo: estudante|instrutor)
  details <id do curso>                            ver detalhes de um curso
  refresh                                          recarregar cursos
  logout                                           sair
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Navigate(View),
    Login {
        email: String,
        password: String,
    },
    Register {
        name: String,
        email: String,
        password: String,
        user_type: UserType,
    },
    Logout,
    Details {
        course_id: CourseId,
    },
    Refresh,
    Help,
    Quit,
}

impl ShellCommand {
    /// Log-safe name; never includes credentials.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Navigate(_) => "navigate",
            Self::Login { .. } => "login",
            Self::Register { .. } => "register",
            Self::Logout => "logout",
            Self::Details { .. } => "details",
            Self::Refresh => "refresh",
            Self::Help => "help",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellParseError {
    #[error("empty input")]
    Empty,
    #[error("Preencha este campo: {0}")]
    MissingField(&'static str),
    #[error("Tipo de usuário inválido: {0}")]
    UnknownUserType(String),
    #[error("Comando desconhecido: {0} (digite 'help')")]
    UnknownCommand(String),
}

/// Accepts the API names and the Portuguese labels shown on the form.
pub fn parse_user_type(raw: &str) -> Result<UserType, ShellParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "estudante" | "aluno" => Ok(UserType::Student),
        "instrutor" => Ok(UserType::Instructor),
        other => other
            .parse()
            .map_err(|_| ShellParseError::UnknownUserType(raw.to_string())),
    }
}

fn required<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<String, ShellParseError> {
    parts
        .next()
        .map(str::to_string)
        .ok_or(ShellParseError::MissingField(field))
}

pub fn parse_command(line: &str) -> Result<ShellCommand, ShellParseError> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(ShellParseError::Empty);
    };
    let head = head.to_ascii_lowercase();
    let mut rest = parts.peekable();

    match head.as_str() {
        "login" | "entrar" if rest.peek().is_some() => Ok(ShellCommand::Login {
            email: required(&mut rest, "email")?,
            password: required(&mut rest, "senha")?,
        }),
        "register" | "registrar" if rest.peek().is_some() => {
            let email = required(&mut rest, "email")?;
            let password = required(&mut rest, "senha")?;
            let user_type = parse_user_type(&required(&mut rest, "tipo")?)?;
            let name = rest.collect::<Vec<_>>().join(" ");
            if name.is_empty() {
                return Err(ShellParseError::MissingField("nome"));
            }
            Ok(ShellCommand::Register {
                name,
                email,
                password,
                user_type,
            })
        }
        "entrar" => Ok(ShellCommand::Navigate(View::Login)),
        "registrar" => Ok(ShellCommand::Navigate(View::Register)),
        "inicio" | "início" => Ok(ShellCommand::Navigate(View::Home)),
        "cursos" => Ok(ShellCommand::Navigate(View::Courses)),
        "logout" | "sair" => Ok(ShellCommand::Logout),
        "details" | "detalhes" => Ok(ShellCommand::Details {
            course_id: CourseId(required(&mut rest, "id do curso")?),
        }),
        "refresh" => Ok(ShellCommand::Refresh),
        "help" | "ajuda" | "?" => Ok(ShellCommand::Help),
        "quit" | "exit" => Ok(ShellCommand::Quit),
        other => other
            .parse::<View>()
            .map(ShellCommand::Navigate)
            .map_err(|_| ShellParseError::UnknownCommand(other.to_string())),
    }
}

pub const COURSE_NOT_FOUND_MESSAGE: &str = "Curso não encontrado.";
pub const COURSE_LOAD_FAILED_MESSAGE: &str = "Não foi possível carregar o curso.";

fn course_error_message(err: &TransportError) -> String {
    if let Some(detail) = err.detail() {
        return detail.to_string();
    }
    match err.code() {
        Some(ErrorCode::NotFound) => COURSE_NOT_FOUND_MESSAGE.to_string(),
        _ => COURSE_LOAD_FAILED_MESSAGE.to_string(),
    }
}

/// Runs one command. Returns extra text to print above the screen, if any.
///
/// Failures of login/register land in the session's error message and are
/// shown by the form itself; catalog reads only log.
pub async fn execute(controller: &SessionController, command: ShellCommand) -> Option<String> {
    match command {
        ShellCommand::Navigate(target) => {
            controller.navigate(target);
            if target == View::Dashboard && controller.snapshot().is_authenticated() {
                let _ = controller.load_dashboard().await;
            }
            None
        }
        ShellCommand::Login { email, password } => {
            if controller.login(&email, &password).await.is_ok() {
                let _ = controller.load_dashboard().await;
            }
            None
        }
        ShellCommand::Register {
            name,
            email,
            password,
            user_type,
        } => {
            if controller
                .register(&name, &email, &password, user_type)
                .await
                .is_ok()
            {
                let _ = controller.load_dashboard().await;
            }
            None
        }
        ShellCommand::Logout => {
            controller.logout();
            None
        }
        ShellCommand::Details { course_id } => match controller.course_detail(&course_id).await {
            Ok(course) => Some(view::render_course_card(&course)),
            Err(SessionError::Transport(err)) => Some(course_error_message(&err)),
            Err(err) => Some(err.to_string()),
        },
        ShellCommand::Refresh => {
            let _ = controller.refresh_courses().await;
            None
        }
        ShellCommand::Help => Some(HELP.to_string()),
        ShellCommand::Quit => None,
    }
}

pub async fn run(controller: Arc<SessionController>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    print!("{}", view::render(&controller.snapshot()));
    println!("(digite 'help' para ver os comandos)");

    while let Some(line) = lines.next_line().await? {
        let command = match parse_command(&line) {
            Ok(ShellCommand::Quit) => break,
            Ok(command) => command,
            Err(ShellParseError::Empty) => continue,
            Err(err) => {
                println!("{err}");
                continue;
            }
        };
        debug!(command = command.name(), "shell: executing");
        if let Some(extra) = execute(&controller, command).await {
            println!("{extra}");
        }
        print!("{}", view::render(&controller.snapshot()));
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/shell_tests.rs"]
mod tests;
