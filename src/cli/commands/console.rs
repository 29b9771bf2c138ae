//! Interactive operator console.

use std::io::Write;
use std::path::PathBuf;

use console::style;
use tokio::io::{AsyncBufReadExt, BufReader};

use iminsight::config::Settings;
use iminsight::intake::{IntakeError, ZoomLevel};
use iminsight::services::OperatorSession;

use super::analyze::{report_outcome, run_with_progress};
use crate::cli::helpers::print_selection;

const PROMPT: &str = "iminsight> ";

const HELP: &str = "\
Commands:
  open <path>     select an image (.jpg, .jpeg, .png, .tiff, .geotiff)
  zoom in|out     adjust preview zoom (also + / -)
  analyze         upload the selected image and show the report
  close           dismiss the current report
  status          show selection, zoom and request state
  help            show this help
  quit            leave the console";

/// One parsed console line.
#[derive(Debug, PartialEq)]
enum ConsoleCommand {
    Open(PathBuf),
    Zoom(f64),
    Analyze,
    Close,
    Status,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> ConsoleCommand {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb.to_lowercase().as_str() {
        "" => ConsoleCommand::Empty,
        "open" if !rest.is_empty() => {
            let expanded = shellexpand::tilde(rest);
            ConsoleCommand::Open(PathBuf::from(expanded.as_ref()))
        }
        "zoom" => match rest {
            "in" | "+" => ConsoleCommand::Zoom(ZoomLevel::STEP),
            "out" | "-" => ConsoleCommand::Zoom(-ZoomLevel::STEP),
            _ => ConsoleCommand::Unknown(line.to_string()),
        },
        "+" => ConsoleCommand::Zoom(ZoomLevel::STEP),
        "-" => ConsoleCommand::Zoom(-ZoomLevel::STEP),
        "analyze" | "submit" => ConsoleCommand::Analyze,
        "close" | "dismiss" => ConsoleCommand::Close,
        "status" => ConsoleCommand::Status,
        "help" | "?" => ConsoleCommand::Help,
        "quit" | "exit" => ConsoleCommand::Quit,
        _ => ConsoleCommand::Unknown(line.to_string()),
    }
}

/// Run the interactive console until `quit` or end of input.
pub async fn cmd_console(settings: &Settings) -> anyhow::Result<()> {
    let mut session = OperatorSession::from_settings(settings)?;
    let mut events = session.subscribe();

    println!(
        "{} IMInsight console, service {}",
        style("✓").green(),
        settings.server_url
    );
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}", PROMPT);
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        match parse_line(&line) {
            ConsoleCommand::Empty => {}
            ConsoleCommand::Open(path) => match session.select_path(&path).await.map(|_| ()) {
                Ok(()) => print_selection(session.intake()),
                Err(e @ IntakeError::UnsupportedFormat { .. }) => {
                    println!("{} {}", style("!").yellow(), e.user_message());
                }
                Err(e) => println!("{} {}", style("✗").red(), e.user_message()),
            },
            ConsoleCommand::Zoom(delta) => {
                if session.preview().is_none() {
                    println!("{} No preview to zoom", style("!").yellow());
                } else {
                    let level = session.adjust_zoom(delta);
                    println!("  Zoom: {}", level);
                }
            }
            ConsoleCommand::Analyze => {
                let outcome = run_with_progress(&session, &mut events).await;
                report_outcome(outcome);
            }
            ConsoleCommand::Close => {
                if session.dismiss() {
                    println!("{} Report closed", style("✓").green());
                } else {
                    println!("{} No report to close", style("!").yellow());
                }
            }
            ConsoleCommand::Status => {
                print_selection(session.intake());
                let analysis = session.analysis();
                println!(
                    "  Request: {} ({}%)",
                    analysis.state().as_str(),
                    analysis.progress()
                );
            }
            ConsoleCommand::Help => println!("{}", HELP),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Unknown(text) => {
                println!("{} Unknown command: {}", style("?").yellow(), text);
            }
        }
    }

    Ok(())
}
