// UI layer: everything the user sees or types. The first-run prompts, the
// upload summary and the clipboard copy live here so the library modules
// stay free of terminal concerns.

use crate::config::Endpoint;
use crate::error::{Result, TransferError};
use crate::report::{format_size, UploadResult};
use crossterm::style::{Color, Stylize};
use dialoguer::{Input, Password};
use log::warn;
use serde::Serialize;
use std::io::{self, Write};

/// Ask for the three config values. `Password` hides input in terminal.
pub fn prompt_endpoint() -> io::Result<Endpoint> {
    let base_url: String = Input::new()
        .with_prompt("Enter transfer base URL")
        .validate_with(|s: &String| {
            if s.starts_with("http://") || s.starts_with("https://") {
                Ok(())
            } else {
                Err("base URL must start with http:// or https://")
            }
        })
        .interact_text()?;
    let user: String = Input::new().with_prompt("Enter transfer user").interact_text()?;
    let pass: String = Password::new().with_prompt("Enter transfer pass").interact()?;
    Ok(Endpoint::new(&base_url, &user, &pass))
}

fn paint(text: &str, color: Color, colored: bool) -> String {
    if colored {
        text.with(color).to_string()
    } else {
        text.to_string()
    }
}

/// Print the human readable summary of a finished upload. The delete line
/// only appears when the server handed out a deletion URL.
pub fn print_summary<W: Write>(
    out: &mut W,
    name: &str,
    size: u64,
    result: &UploadResult,
    colored: bool,
) -> io::Result<()> {
    let mut rows = vec![
        ("File URL:", Color::Green, result.download_url.as_str()),
        ("Direct Download Link:", Color::Green, result.direct_url.as_str()),
    ];
    if let Some(cmd) = &result.delete_command {
        rows.push(("To delete use:", Color::Red, cmd.as_str()));
    }
    let width = rows.iter().map(|(label, _, _)| label.len()).max().unwrap_or(0) + 2;

    writeln!(
        out,
        "\n{} ({}):",
        paint(name, Color::Blue, colored),
        paint(&format_size(size), Color::Yellow, colored)
    )?;
    for (label, color, value) in rows {
        let padded = format!("{:<width$}", label, width = width);
        writeln!(out, "{}{}", paint(&padded, color, colored), value)?;
    }
    out.flush()
}

#[derive(Serialize)]
struct JsonSummary<'a> {
    name: &'a str,
    size: u64,
    #[serde(flatten)]
    result: &'a UploadResult,
}

/// Machine readable variant of [`print_summary`].
pub fn print_json<W: Write>(out: &mut W, name: &str, size: u64, result: &UploadResult) -> io::Result<()> {
    let summary = JsonSummary { name, size, result };
    serde_json::to_writer_pretty(&mut *out, &summary)?;
    writeln!(out)
}

/// Somewhere to put the download URL for pasting.
pub trait ClipboardSink {
    fn copy(&mut self, text: &str) -> Result<()>;
}

/// The desktop clipboard.
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn copy(&mut self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
        clipboard.set_text(text.to_string()).map_err(clipboard_error)
    }
}

fn clipboard_error(e: arboard::Error) -> TransferError {
    TransferError::Clipboard(e.to_string())
}

/// Used with `--no-clipboard`.
pub struct NoClipboard;

impl ClipboardSink for NoClipboard {
    fn copy(&mut self, _text: &str) -> Result<()> {
        Ok(())
    }
}

/// Copy `text`, logging instead of failing when no clipboard is usable.
pub fn copy_best_effort<C: ClipboardSink + ?Sized>(clipboard: &mut C, text: &str) -> bool {
    match clipboard.copy(text) {
        Ok(()) => true,
        Err(e) => {
            warn!("Error copying to clipboard: {}", e);
            false
        }
    }
}
