// Entrypoint for the CLI application.
// - Parses flags into an explicit request; nothing is kept in globals.
// - Returns errors to `main`, which prints them and exits with status 1.

use anyhow::Context;
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use transfersh::api::{Retention, UploadOptions};
use transfersh::config::{default_config_path, Endpoint};
use transfersh::progress::upload_bar;
use transfersh::transfer::{transfer, UploadRequest};
use transfersh::ui::{
    print_json, print_summary, prompt_endpoint, ClipboardSink, NoClipboard, SystemClipboard,
};
use transfersh::TransferError;

/// Upload a file or directory to a transfer.sh compatible server.
///
/// A directory is compressed into a .zip archive before uploading. The
/// download URL is printed and copied to the clipboard.
#[derive(Parser, Debug)]
#[command(name = "transfersh", version, about, long_about)]
struct Cli {
    /// File or directory to upload
    path: PathBuf,

    /// Days the server keeps the upload
    #[arg(long)]
    max_days: Option<String>,

    /// Downloads allowed before the upload expires
    #[arg(long)]
    max_downloads: Option<String>,

    /// Abort the request after this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Connect directly, ignoring proxy environment variables
    #[arg(long)]
    no_proxy: bool,

    /// Config file path (defaults to ~/.config/transfersh/.config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the result as JSON
    #[arg(long)]
    json: bool,

    /// Do not copy the URL to the clipboard
    #[arg(long)]
    no_clipboard: bool,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,

    /// Log pipeline steps
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    // Fail before prompting for credentials when there is nothing to send.
    if !cli.path.exists() {
        return Err(TransferError::NotFound(cli.path).into());
    }

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let endpoint = Endpoint::load_or_create(&config_path, prompt_endpoint)
        .with_context(|| format!("Error loading config {}", config_path.display()))?;

    let request = UploadRequest {
        source_path: cli.path,
        retention: Retention {
            max_days: cli.max_days,
            max_downloads: cli.max_downloads,
        },
    };
    let options = UploadOptions {
        timeout: cli.timeout.map(Duration::from_secs),
        no_proxy: cli.no_proxy,
    };
    let show_bar = !cli.quiet && io::stderr().is_terminal();

    let mut clipboard: Box<dyn ClipboardSink> = if cli.no_clipboard {
        Box::new(NoClipboard)
    } else {
        Box::new(SystemClipboard)
    };

    let done = transfer(
        &request,
        &endpoint,
        &options,
        |size| upload_bar(size, show_bar),
        clipboard.as_mut(),
    )?;

    let colored = io::stdout().is_terminal();
    let mut stdout = io::stdout().lock();
    if cli.json {
        print_json(&mut stdout, &done.name, done.size, &done.result)?;
    } else {
        print_summary(&mut stdout, &done.name, done.size, &done.result, colored)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let cli = Cli::parse_from(["transfersh", "report.pdf"]);
        assert_eq!(cli.path, PathBuf::from("report.pdf"));
        assert!(cli.max_days.is_none());
        assert!(cli.max_downloads.is_none());
        assert!(!cli.json);
        assert!(!cli.no_clipboard);
    }

    #[test]
    fn test_args_retention() {
        let cli = Cli::parse_from(["transfersh", "--max-days", "3", "--max-downloads", "1", "docs"]);
        assert_eq!(cli.max_days.as_deref(), Some("3"));
        assert_eq!(cli.max_downloads.as_deref(), Some("1"));
    }

    #[test]
    fn test_args_require_path() {
        assert!(Cli::try_parse_from(["transfersh"]).is_err());
    }

    #[test]
    fn test_missing_path_is_reported() {
        let cli = Cli::parse_from(["transfersh", "--config", "/nonexistent/cfg", "/nonexistent/file"]);
        let err = run(cli).unwrap_err();
        assert!(err.to_string().contains("No such file or directory"));
    }
}
