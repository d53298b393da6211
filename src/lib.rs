// Library root
// ------------
// This crate exposes the upload pipeline for the `transfersh` binary.
//
// Module responsibilities:
// - `config`: the endpoint and credentials file.
// - `content`: turns a file or directory into a sized byte source.
// - `progress`: byte counting reader feeding the progress bar.
// - `api`: the HTTP PUT against the server.
// - `report`: reply validation, link derivation and size formatting.
// - `transfer`: wires the steps above together.
// - `ui`: prompts, summary output and the clipboard.
pub mod api;
pub mod config;
pub mod content;
pub mod error;
pub mod progress;
pub mod report;
pub mod transfer;
pub mod ui;

pub use error::{Result, TransferError};
