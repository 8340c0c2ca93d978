//! Check command - validate a manifest without touching any repository

use std::path::PathBuf;

use clap::Args;
use gitferry_core::{load_manifest, RepoUrl};

/// Arguments for the check command
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Manifest file to validate
    #[arg(required = true)]
    pub manifest: PathBuf,
}

impl CheckArgs {
    /// Execute the check command
    pub async fn execute(&self, verbose: bool) -> anyhow::Result<()> {
        let manifest = load_manifest(&self.manifest)?;

        if verbose {
            tracing::info!(
                manifest = %self.manifest.display(),
                pairs = manifest.pairs.len(),
                "Checking manifest"
            );
        }

        for issue in &manifest.issues {
            println!(
                "line {}: {} ({})",
                issue.line, issue.content, issue.reason
            );
        }

        let mut bad_destinations = 0;
        for pair in &manifest.pairs {
            if let Err(e) = RepoUrl::parse(&pair.destination) {
                bad_destinations += 1;
                println!("destination {}: {}", pair.destination, e);
            }
        }

        println!(
            "{}: {} pair(s), {} malformed line(s), {} unparseable destination(s)",
            self.manifest.display(),
            manifest.pairs.len(),
            manifest.issues.len(),
            bad_destinations
        );

        if !manifest.issues.is_empty() || bad_destinations > 0 {
            anyhow::bail!("manifest has problems");
        }

        Ok(())
    }
}
