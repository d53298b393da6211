// Content module: turns a path given on the command line into something the
// uploader can stream. A regular file is handed over as-is; a directory is
// packed into a zip archive first.
//
// The archive lives in an anonymous temporary file. It has no name on disk
// once created, so it disappears when the handle is dropped no matter how
// the run ends (success, upload error or the process being interrupted).

use crate::error::{Result, TransferError};
use log::debug;
use std::fs::{self, File};
use std::io::{self, Seek, SeekFrom};
use std::path::{Component, Path};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A named, sized byte source ready to be uploaded. `size` is exactly the
/// number of bytes left to read from `source`.
#[derive(Debug)]
pub struct PreparedContent {
    pub name: String,
    pub source: File,
    pub size: u64,
}

/// Prepare `path` for upload.
pub fn prepare(path: &Path) -> Result<PreparedContent> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(TransferError::NotFound(path.to_path_buf()))
        }
        Err(e) => return Err(e.into()),
    };

    let base = base_name(path)?;
    if meta.is_dir() {
        let (source, size) = zip_directory(path)?;
        debug!("archived {} into {} bytes", path.display(), size);
        return Ok(PreparedContent {
            name: format!("{}.zip", base),
            source,
            size,
        });
    }

    let source = File::open(path)?;
    // Size of the opened handle, not of the earlier stat, in case the file
    // was replaced in between.
    let size = source.metadata()?.len();
    Ok(PreparedContent {
        name: base,
        source,
        size,
    })
}

/// Final path component, falling back to the canonical path for inputs such
/// as `.` that have none.
fn base_name(path: &Path) -> Result<String> {
    if let Some(name) = path.file_name() {
        return Ok(name.to_string_lossy().into_owned());
    }
    let canonical = fs::canonicalize(path)?;
    canonical
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| {
            TransferError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} has no file name", path.display()),
            ))
        })
}

/// Zip every regular file under `directory` into an anonymous temp file and
/// return it rewound to the start, with its length.
pub fn zip_directory(directory: &Path) -> Result<(File, u64)> {
    let tmp = tempfile::tempfile()?;
    let mut zip = ZipWriter::new(tmp);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in WalkDir::new(directory).follow_links(false) {
        let entry = entry?;
        // Directories get no entry of their own; symlinks, sockets, fifos
        // and devices are skipped.
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(directory) {
            Ok(rel) => rel,
            Err(_) => continue,
        };
        let name = entry_name(relative);
        let mut file = File::open(entry.path())?;
        let len = file.metadata()?.len();
        zip.start_file(name, options.large_file(len >= u32::MAX as u64))?;
        io::copy(&mut file, &mut zip)?;
    }

    let mut tmp = zip.finish()?;
    let size = tmp.seek(SeekFrom::End(0))?;
    tmp.seek(SeekFrom::Start(0))?;
    Ok((tmp, size))
}

/// Archive entry name: the relative path joined with `/` on every platform.
fn entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
