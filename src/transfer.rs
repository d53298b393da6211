// Transfer pipeline: prepare the content, upload it, interpret the reply.
// Everything the run depends on is passed in explicitly.

use crate::api::{ApiClient, Reply, Retention, UploadOptions};
use crate::config::Endpoint;
use crate::content::prepare;
use crate::error::Result;
use crate::progress::TransferObserver;
use crate::report::{report, UploadResult};
use crate::ui::{copy_best_effort, ClipboardSink};
use log::debug;
use std::path::PathBuf;

/// One invocation's worth of input.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub source_path: PathBuf,
    pub retention: Retention,
}

/// A finished upload.
#[derive(Clone, Debug)]
pub struct Transferred {
    pub name: String,
    pub size: u64,
    pub result: UploadResult,
}

/// Run the whole pipeline. `make_observer` receives the byte count once it
/// is known and returns the progress sink for the body. The download URL
/// goes to `clipboard` only once the reply has been accepted.
///
/// A temporary archive, if one was built, is owned by the request body and
/// released as soon as the upload returns, whatever the outcome.
pub fn transfer<O, F>(
    request: &UploadRequest,
    endpoint: &Endpoint,
    options: &UploadOptions,
    make_observer: F,
    clipboard: &mut dyn ClipboardSink,
) -> Result<Transferred>
where
    O: TransferObserver + Clone,
    F: FnOnce(u64) -> O,
{
    let content = prepare(&request.source_path)?;
    let name = content.name.clone();
    let size = content.size;
    debug!("prepared {} ({} bytes)", name, size);

    let client = ApiClient::new(endpoint.clone(), options)?;
    let reply = client.upload(content, &request.retention, make_observer(size))?;
    let result = publish(&reply, endpoint, clipboard)?;
    Ok(Transferred { name, size, result })
}

/// Validate the reply, then copy the download URL. A rejected upload never
/// reaches the clipboard.
pub fn publish(
    reply: &Reply,
    endpoint: &Endpoint,
    clipboard: &mut dyn ClipboardSink,
) -> Result<UploadResult> {
    let result = report(reply, endpoint)?;
    copy_best_effort(clipboard, &result.download_url);
    Ok(result)
}
