//! CipherKeep command-line client
//!
//! Usage:
//!   cipherkeep list
//!   cipherkeep encrypt --message "hello"
//!   cipherkeep save --label github --message "hunter2"
//!   cipherkeep decrypt --label github
//!   cipherkeep delete --label github --yes

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use cipherkeep_client::{Notification, Orchestrator, RouterClient, Ui};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "cipherkeep")]
#[command(about = "Encrypt, store and recover secrets through a CipherKeep server")]
struct Args {
    /// Base URL of the CipherKeep server
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    server: String,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List stored labels
    List,
    /// Encrypt a message and print the ciphertext
    Encrypt {
        #[arg(short, long)]
        message: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Encrypt a message and store it under a label
    Save {
        #[arg(short, long)]
        label: String,
        #[arg(short, long)]
        message: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Decrypt the record stored under a label and print the plaintext
    Decrypt {
        #[arg(short, long)]
        label: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Delete the record stored under a label
    Delete {
        #[arg(short, long)]
        label: String,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Terminal front end. Notifications go to stderr; stdout stands in for the
/// clipboard so output can be piped.
struct TerminalUi {
    assume_yes: bool,
}

impl Ui for TerminalUi {
    fn notify(&mut self, notification: Notification) {
        if notification.is_error() {
            eprintln!("error: {notification}");
        } else {
            eprintln!("{notification}");
        }
    }

    fn copy_to_clipboard(&mut self, text: &str) -> Result<(), String> {
        let mut out = io::stdout().lock();
        writeln!(out, "{text}")
            .and_then(|()| out.flush())
            .map_err(|e| e.to_string())
    }

    fn show_result(&mut self, _text: &str) {}

    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(p) => Ok(p),
        None => rpassword::prompt_password("Password: ").context("Failed to read password"),
    }
}

async fn run(args: Args) -> Result<bool> {
    let client = RouterClient::new(&args.server)?;
    let assume_yes = matches!(args.command, Command::Delete { yes: true, .. });
    let mut app = Orchestrator::new(client, TerminalUi { assume_yes });

    let ok = match args.command {
        Command::List => {
            if app.refresh().await.is_err() {
                return Ok(false);
            }
            for record in app.state().snapshot() {
                println!("{}", record.label);
            }
            true
        }
        Command::Encrypt { message, password } => {
            let password = password_or_prompt(password)?;
            app.encrypt_and_copy(&password, &message).await.is_ok()
        }
        Command::Save {
            label,
            message,
            password,
        } => {
            let password = password_or_prompt(password)?;
            app.encrypt_and_save(&password, &message, &label).await.is_ok()
        }
        Command::Decrypt { label, password } => {
            if app.refresh().await.is_err() {
                return Ok(false);
            }
            if !app.select_label(label.trim()) {
                eprintln!("error: Label not found.");
                return Ok(false);
            }
            let password = password_or_prompt(password)?;
            app.decrypt_and_copy(&password).await.is_ok()
        }
        Command::Delete { label, .. } => {
            if app.refresh().await.is_err() {
                return Ok(false);
            }
            if !app.select_label(label.trim()) {
                eprintln!("error: Label not found.");
                return Ok(false);
            }
            match app.delete_selected().await {
                Ok(deleted) => {
                    debug!(deleted, "delete workflow finished");
                    true
                }
                Err(_) => false,
            }
        }
    };
    Ok(ok)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = if args.verbose { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
