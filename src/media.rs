use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info, warn};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::error::{AppError, Result};

pub const DEFAULT_EXTENSION: &str = ".png";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Photos,
    Logos,
}

impl MediaKind {
    pub fn folder(&self) -> &'static str {
        match self {
            MediaKind::Photos => "photos",
            MediaKind::Logos => "logos",
        }
    }
}

impl FromStr for MediaKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "photos" => Ok(MediaKind::Photos),
            "logos" => Ok(MediaKind::Logos),
            other => Err(AppError::ValidationError(format!(
                "unknown category {:?}, expected photos or logos",
                other
            ))),
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder())
    }
}

/// Decomposes `text` and drops the combining marks, leaving base letters.
pub fn strip_accents(text: &str) -> String {
    text.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// ASCII, lowercase, underscore-delimited form of `name`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in strip_accents(&name.to_lowercase()).chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    if slug.is_empty() {
        "file".to_string()
    } else {
        slug
    }
}

/// Slugified stem (or `key`) plus the lowercased original extension.
pub fn target_file_name(source: &Path, key: Option<&str>) -> String {
    let stem = match key {
        Some(key) => key.to_string(),
        None => source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
    };
    let extension = source
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    format!("{}{}", slugify(&stem), extension)
}

fn collect_files(source: &Path) -> Result<Vec<PathBuf>> {
    if source.is_file() {
        return Ok(vec![source.to_path_buf()]);
    }
    if !source.is_dir() {
        return Err(AppError::ValidationError(format!("{} does not exist", source.display())));
    }

    let pattern = format!("{}/**/*", glob::Pattern::escape(&source.to_string_lossy()));
    let entries = glob::glob(&pattern)
        .map_err(|e| AppError::ValidationError(format!("bad path pattern {}: {}", pattern, e)))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| AppError::IoError(e.to_string()))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(files)
}

fn is_same_file(a: &Path, b: &Path) -> Result<bool> {
    if !b.exists() {
        return Ok(false);
    }
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

/// Copies `source` (one file or a whole tree) into `<db_dir>/<kind>/` under
/// slugified names. Existing targets are overwritten; a file that already is
/// its own target is skipped.
pub fn normalize_into(kind: MediaKind, db_dir: &Path, source: &Path, key: Option<&str>) -> Result<Vec<PathBuf>> {
    let files = collect_files(source)?;
    let target_dir = db_dir.join(kind.folder());
    fs::create_dir_all(&target_dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let target = target_dir.join(target_file_name(&file, key));
        if is_same_file(&file, &target)? {
            warn!(path = %file.display(), "source is already its target, skipped");
            continue;
        }
        debug!(from = %file.display(), to = %target.display(), "copying");
        fs::copy(&file, &target)?;
        info!(path = %target.display(), "media normalized");
        written.push(target);
    }
    Ok(written)
}
