//! Run several shell commands side by side, one window each.
//!
//! `mwrun [--watch PATH]... [--] COMMAND...`
//!
//! With `--watch`, every command reruns whenever a watched file changes.
//! Ctrl-C restores the terminal and exits.

use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::thread;

use multiwindow::config::EnvConfig;
use multiwindow::watch::{watch_and_build, DEFAULT_POLL_INTERVAL};
use multiwindow::{logging, ShutdownToken, Window};

const USAGE: &str = "usage: mwrun [--watch PATH]... [--] COMMAND...";

#[derive(Debug, Default, PartialEq, Eq)]
struct Args {
    watch: Vec<PathBuf>,
    commands: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Args, String> {
    let mut parsed = Args::default();
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--watch" | "-w" => {
                let path = iter.next().ok_or("--watch needs a path")?;
                parsed.watch.push(PathBuf::from(path));
            }
            "--" => {
                parsed.commands.extend(iter.by_ref());
                break;
            }
            "-h" | "--help" => return Err(String::new()),
            _ => parsed.commands.push(arg),
        }
    }
    if parsed.commands.is_empty() {
        return Err("no commands given".into());
    }
    Ok(parsed)
}

/// Write a `=== label` footer. Returns whether it reached the window.
fn write_footer(window: &Window, label: &str) -> bool {
    match window.section(label) {
        Ok(()) => true,
        Err(err) => {
            tracing::debug!(window = window.id(), error = %err, "footer not written");
            false
        }
    }
}

fn run_one(window: &Window, command: &str) {
    window.clear();
    window.title(command);
    let outcome = window.run_with_output(Command::new("sh").arg("-c").arg(command));
    let footer = match outcome {
        Ok(status) if status.success() => {
            write_footer(window, "done");
            return;
        }
        Ok(status) => format!("exited with {status}"),
        Err(err) => format!("failed to start: {err}"),
    };
    tracing::info!(command, %footer, "command failed");
    write_footer(window, &footer);
    window.error_state();
}

fn run_all(windows: &[Window], commands: &[String]) {
    thread::scope(|scope| {
        for (window, command) in windows.iter().zip(commands) {
            scope.spawn(move || run_one(window, command));
        }
    });
}

fn main() -> io::Result<()> {
    let args = parse_args(std::env::args().skip(1)).map_err(|msg| {
        let msg = if msg.is_empty() {
            USAGE.to_string()
        } else {
            format!("{msg}\n{USAGE}")
        };
        io::Error::new(io::ErrorKind::InvalidInput, msg)
    })?;

    let config = EnvConfig::from_env();
    let _logging = logging::init(&config);

    let windows = multiwindow::new(args.commands.len()).map_err(io::Error::other)?;

    if args.watch.is_empty() {
        run_all(&windows, &args.commands);
        // Keep the results on screen; the signal handler exits the process.
        loop {
            thread::park();
        }
    }

    // Only the controller's signal handling ends this loop.
    let running = ShutdownToken::new();
    watch_and_build(&args.watch, DEFAULT_POLL_INTERVAL, &running, |rebuild| {
        run_all(&windows, &args.commands);
        rebuild.changed_again();
    })
    .map_err(io::Error::other)
}
