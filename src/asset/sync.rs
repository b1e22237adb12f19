//! Image publishing with content-hash freshness.
//!
//! An output whose blake3 hash matches its source is left alone, so repeated
//! builds only copy what changed.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::scan::{ImageRoute, scan_images};
use crate::config::SiteConfig;
use crate::debug;

/// Outcome of one sync pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SyncStats {
    pub copied: usize,
    pub unchanged: usize,
}

/// Publish the images of `content_type` into the public image directory.
pub fn sync_images(config: &SiteConfig, content_type: &str) -> Result<SyncStats> {
    let routes = scan_images(&config.type_dir(content_type), &config.image_dir(content_type));
    sync_routes(&routes)
}

/// Copy every route whose output is missing or differs from its source.
pub fn sync_routes(routes: &[ImageRoute]) -> Result<SyncStats> {
    let copied = AtomicUsize::new(0);

    routes.par_iter().try_for_each(|route| -> Result<()> {
        if is_fresh(&route.source, &route.output)? {
            return Ok(());
        }

        if let Some(parent) = route.output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::copy(&route.source, &route.output).with_context(|| {
            format!(
                "failed to copy {} to {}",
                route.source.display(),
                route.output.display()
            )
        })?;

        debug!("sync"; "{}", route.output.display());
        copied.fetch_add(1, Ordering::Relaxed);
        Ok(())
    })?;

    let copied = copied.into_inner();
    Ok(SyncStats {
        copied,
        unchanged: routes.len() - copied,
    })
}

/// An output is fresh when it exists and hashes to the same content.
fn is_fresh(source: &Path, output: &Path) -> Result<bool> {
    if !output.is_file() {
        return Ok(false);
    }
    let src_meta = fs::metadata(source)?;
    let out_meta = fs::metadata(output)?;
    if src_meta.len() != out_meta.len() {
        return Ok(false);
    }

    let a = file_hash(source).with_context(|| format!("failed to hash {}", source.display()))?;
    let b = file_hash(output).with_context(|| format!("failed to hash {}", output.display()))?;
    Ok(a == b)
}

/// blake3 of a file's contents, streamed in 64 KiB chunks.
fn file_hash(path: &Path) -> io::Result<blake3::Hash> {
    let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
    let mut hasher = blake3::Hasher::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    Ok(hasher.finalize())
}
