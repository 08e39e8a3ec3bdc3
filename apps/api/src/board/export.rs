//! Resume book export: every selected resume in one zip, built in memory.
//!
//! Best effort by policy: a resume without a stored file, or whose object
//! cannot be read, is left out and the rest of the book is still produced.
//! The whole archive is buffered, which caps practical book size at what fits
//! comfortably in memory.

use std::collections::HashSet;
use std::io::{Cursor, Write};

use anyhow::Result;
use bytes::Bytes;
use tracing::{debug, info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::resume::ResumeListing;
use crate::names::resume_file_name;
use crate::storage::ObjectStore;

pub const BOOK_FILE_NAME: &str = "resume_book.zip";
/// Folder for owners with no class year on file.
pub const UNASSIGNED_FOLDER: &str = "Unassigned";

#[derive(Debug, Clone)]
pub struct BookEntry {
    pub name: String,
    pub data: Bytes,
}

/// `{class_year}/{Last}_{First}_Resume.pdf`
pub fn entry_name(listing: &ResumeListing) -> String {
    let folder = listing
        .class_year
        .as_deref()
        .map(str::trim)
        .filter(|year| !year.is_empty() && !year.contains(|c: char| c == '/' || c == '\\'))
        .unwrap_or(UNASSIGNED_FOLDER);
    format!(
        "{folder}/{}",
        resume_file_name(&listing.first_name, &listing.last_name)
    )
}

/// Appends ` (2)`, ` (3)`, … before the extension until `name` is unused.
pub fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let (stem, ext) = match name.rfind('.') {
        Some(dot) if dot > name.rfind('/').map_or(0, |slash| slash + 1) => name.split_at(dot),
        _ => (name.as_str(), ""),
    };
    let mut n = 2;
    loop {
        let candidate = format!("{stem} ({n}){ext}");
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

/// Fetches the bytes for each listing, skipping anything that is missing.
pub async fn collect_entries(
    objects: &dyn ObjectStore,
    listings: &[ResumeListing],
) -> Vec<BookEntry> {
    let mut used = HashSet::new();
    let mut entries = Vec::with_capacity(listings.len());

    for listing in listings {
        let Some(key) = listing.file_key.as_deref().filter(|k| !k.is_empty()) else {
            debug!("Resume {} has no stored file; skipping", listing.resume_id);
            continue;
        };
        let data = match objects.get(key).await {
            Ok(Some(data)) => data,
            Ok(None) => {
                debug!("Object {key} for resume {} is missing; skipping", listing.resume_id);
                continue;
            }
            Err(e) => {
                warn!("Could not read {key} for resume {}: {e}; skipping", listing.resume_id);
                continue;
            }
        };
        entries.push(BookEntry {
            name: unique_name(entry_name(listing), &mut used),
            data,
        });
    }

    entries
}

/// Writes `entries` into a Deflate-compressed zip and returns its bytes.
pub fn build_archive(entries: &[BookEntry]) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for entry in entries {
        writer.start_file(entry.name.as_str(), options)?;
        writer.write_all(&entry.data)?;
    }

    let bytes = writer.finish()?.into_inner();
    info!("Built resume book: {} entries, {} bytes", entries.len(), bytes.len());
    Ok(bytes)
}
