use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{info, warn};

use crate::document::{parse_document, Document};

/// Document compiled into the binary, used once every other source has
/// failed.
pub const EMBEDDED: &str = include_str!("../data/timetable.json");

/// Fixed relative resource probed between the configured URL and the
/// embedded fallback. Missing it is expected and non-fatal.
pub const LOCAL_RESOURCE: &str = "timetable.json";

/// Resolve the startup document: configured URL, then the fixed relative
/// resource, then the embedded document. First success wins, no retries;
/// every candidate passes the same shape check, and failures are advisory.
/// `None` means the whole chain came up empty.
pub async fn resolve(url: Option<&str>) -> Option<Document> {
    if let Some(url) = url {
        match fetch(url).await {
            Ok(document) => {
                info!("loaded timetable from {url}");
                return Some(document);
            }
            Err(err) => warn!("fetching {url} failed: {err:#}"),
        }
    }

    match read_local() {
        Ok(document) => {
            info!("loaded timetable from ./{LOCAL_RESOURCE}");
            return Some(document);
        }
        Err(err) => warn!("reading ./{LOCAL_RESOURCE} failed: {err:#}"),
    }

    match parse_document(EMBEDDED) {
        Ok(document) => {
            info!("using the embedded timetable");
            Some(document)
        }
        Err(err) => {
            warn!("embedded timetable is invalid: {err:#}");
            None
        }
    }
}

async fn fetch(url: &str) -> Result<Document> {
    let raw = reqwest::get(url)
        .await?
        .error_for_status()?
        .text()
        .await?;

    parse_document(&raw)
}

fn read_local() -> Result<Document> {
    let raw = fs::read_to_string(LOCAL_RESOURCE)?;
    parse_document(&raw)
}

/// Load a user-supplied document file. Unlike the resolver chain, failures
/// here are blocking for the caller.
pub fn load_file(path: &Path) -> Result<Document> {
    let raw =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    parse_document(&raw)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn embedded_document_passes_the_shape_check() {
        let document = parse_document(EMBEDDED).unwrap();
        assert!(!document.is_empty());
        assert!(document.first_key().is_some());
    }

    #[test]
    fn embedded_weeks_have_renderable_days() {
        let document = parse_document(EMBEDDED).unwrap();
        for key in document.sorted_keys() {
            assert!(!document.week(key).unwrap().days.is_empty());
        }
    }

    #[test]
    fn missing_override_file_is_an_error() {
        let path = PathBuf::from("definitely-missing-timetable.json");
        let err = load_file(&path).unwrap_err();
        assert!(err.to_string().contains("definitely-missing-timetable"));
    }
}
