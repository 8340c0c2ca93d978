//! Repository pair manifest parsing
//!
//! A manifest is a UTF-8 text file with one import per line: the source
//! repository URL and the destination repository URL separated by
//! whitespace. Blank lines and lines starting with `#` are ignored.

use std::path::Path;

use crate::{Error, Result};

/// A single (source, destination) import pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoPair {
    /// URL of the external source repository
    pub source: String,
    /// URL of the destination repository on the hosting platform
    pub destination: String,
}

/// A manifest line that could not be parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIssue {
    /// 1-based line number in the manifest file
    pub line: usize,
    /// The offending line content
    pub content: String,
    /// Why the line was rejected
    pub reason: String,
}

/// A parsed manifest: the valid pairs plus any malformed lines
///
/// Malformed lines do not abort parsing; they are recorded so the caller
/// can report them and continue with the valid pairs.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Pairs to import, in file order
    pub pairs: Vec<RepoPair>,
    /// Malformed lines, in file order
    pub issues: Vec<ParseIssue>,
}

/// Parse manifest content
pub fn parse_manifest(content: &str) -> Manifest {
    let mut manifest = Manifest::default();

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens.as_slice() {
            [source, destination] => manifest.pairs.push(RepoPair {
                source: (*source).to_string(),
                destination: (*destination).to_string(),
            }),
            _ => manifest.issues.push(ParseIssue {
                line: index + 1,
                content: line.to_string(),
                reason: format!("expected 2 URL tokens, found {}", tokens.len()),
            }),
        }
    }

    manifest
}

/// Load and parse a manifest file
///
/// A missing or unreadable file is a fatal configuration error; malformed
/// lines inside a readable file are not.
pub fn load_manifest(path: &Path) -> Result<Manifest> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Config(format!("Could not read manifest {}: {}", path.display(), e))
    })?;

    Ok(parse_manifest(&content))
}
