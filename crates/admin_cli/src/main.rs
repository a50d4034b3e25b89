//! `expenses_admin`: bootstrap expense tracker accounts from a terminal.
//!
//! Users normally sign up through `POST /api/users`. This tool creates them
//! directly against the database, for instance the first account of a fresh
//! install. It goes through the engine, so the e-mail and password rules are
//! the same as for the HTTP route.

use std::{error::Error, io::Write};

use clap::{Args, Parser, Subcommand};
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    style::Print,
    terminal,
    terminal::ClearType,
};
use engine::{Engine, EngineError, NewUser};
use migration::MigratorTrait;
use sea_orm::{Database, DatabaseConnection};

const MIN_PASSWORD_LEN: usize = 6;
const MAX_PROMPT_ATTEMPTS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "expenses_admin")]
#[command(about = "Admin utilities for the expense tracker (bootstrap users)")]
struct Cli {
    /// Database connection string (also read from `DATABASE_URL`).
    #[arg(
        long,
        env = "DATABASE_URL",
        default_value = "sqlite:./expenses.db?mode=rwc"
    )]
    database_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    User(User),
}

#[derive(Args, Debug)]
struct User {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    Create(UserCreateArgs),
}

#[derive(Args, Debug)]
struct UserCreateArgs {
    /// Display name of the account.
    #[arg(long)]
    name: String,
    /// Login e-mail; stored lowercase and must not be registered yet.
    #[arg(long)]
    email: String,
}

/// Keeps the terminal in raw mode so the typed password is not echoed.
struct RawModeGuard;

impl RawModeGuard {
    fn enter() -> Result<Self, Box<dyn Error + Send + Sync>> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn prompt_password(prompt: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let _raw = RawModeGuard::enter()?;

    let mut out = std::io::stderr();
    execute!(
        out,
        cursor::MoveToColumn(0),
        terminal::Clear(ClearType::CurrentLine),
        Print(prompt)
    )?;
    out.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(KeyEvent {
            code, modifiers, ..
        }) = event::read()?
        else {
            continue;
        };

        match code {
            KeyCode::Enter => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                break;
            }
            KeyCode::Backspace => {
                if buf.pop().is_some() {
                    execute!(out, cursor::MoveLeft(1), Print(" "), cursor::MoveLeft(1))?;
                    out.flush()?;
                }
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                execute!(out, Print("\r\n"))?;
                out.flush()?;
                return Err("password entry cancelled".into());
            }
            KeyCode::Char(ch) if !modifiers.contains(KeyModifiers::CONTROL) => {
                buf.push(ch);
                execute!(out, Print("*"))?;
                out.flush()?;
            }
            _ => {}
        }
    }

    Ok(buf)
}

/// Ask for the new account's password until both entries agree.
fn prompt_new_password(email: &str) -> Result<String, Box<dyn Error + Send + Sync>> {
    let mut out = std::io::stderr();
    for _ in 0..MAX_PROMPT_ATTEMPTS {
        let p1 = prompt_password(&format!("Password for {email}: "))?;
        if p1.chars().count() < MIN_PASSWORD_LEN {
            execute!(
                out,
                cursor::MoveToColumn(0),
                terminal::Clear(ClearType::CurrentLine),
                Print(format!("Use at least {MIN_PASSWORD_LEN} characters.\r\n"))
            )?;
            continue;
        }

        let p2 = prompt_password("Repeat it to confirm: ")?;
        if p1 == p2 {
            return Ok(p1);
        }

        execute!(
            out,
            cursor::MoveToColumn(0),
            terminal::Clear(ClearType::CurrentLine),
            Print("The two passwords differ, try again.\r\n")
        )?;
    }

    Err(format!("no matching password after {MAX_PROMPT_ATTEMPTS} attempts").into())
}

async fn connect_db(
    database_url: &str,
) -> Result<DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let db = Database::connect(database_url).await?;
    migration::Migrator::up(&db, None).await?;
    Ok(db)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();

    let db = connect_db(&cli.database_url).await?;
    let engine = Engine::builder().database(db).build().await?;

    match cli.command {
        Command::User(User {
            command: UserCommand::Create(args),
        }) => {
            let password = prompt_new_password(&args.email)?;

            let new_user = NewUser {
                name: Some(args.name),
                email: Some(args.email.clone()),
                password: Some(password),
            };
            match engine.register_user(new_user).await {
                Ok(user) => println!("created user: {} ({})", user.email, user.id),
                Err(EngineError::ExistingKey(_)) => {
                    eprintln!("user already exists: {}", args.email);
                    std::process::exit(1);
                }
                Err(EngineError::Validation(violations)) => {
                    for violation in violations {
                        eprintln!("{}: {}", violation.field, violation.message);
                    }
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_create_takes_name_and_email() {
        let cli = Cli::try_parse_from([
            "expenses_admin",
            "user",
            "create",
            "--name",
            "Alice",
            "--email",
            "alice@example.com",
        ])
        .unwrap();

        let Command::User(User {
            command: UserCommand::Create(args),
        }) = cli.command;
        assert_eq!(args.name, "Alice");
        assert_eq!(args.email, "alice@example.com");
    }

    #[test]
    fn user_create_requires_an_email() {
        assert!(Cli::try_parse_from(["expenses_admin", "user", "create", "--name", "Alice"]).is_err());
    }
}
