//! Import command - mirror each manifest pair into its destination

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use gitferry_core::{
    default_workspace_dir, import_pair, load_manifest, Config, GitCli, ImportOptions,
    ImportReport, PairOutcome, Visibility,
};
use gitferry_github::GhClient;

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Manifest file with one "source destination" URL pair per line
    #[arg(required = true)]
    pub manifest: PathBuf,

    /// Visibility for destinations created during the run
    #[arg(long)]
    pub visibility: Option<Visibility>,

    /// Organization to create missing destinations under
    #[arg(short, long)]
    pub org: Option<String>,

    /// Archive each destination after a successful import
    #[arg(long)]
    pub archive: bool,

    /// Log intended actions without executing them
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

impl ImportArgs {
    /// Execute the import command
    pub async fn execute(&self, verbose: bool, config: &Config) -> anyhow::Result<()> {
        // An unreadable manifest aborts before any pair is processed
        let manifest = load_manifest(&self.manifest)?;

        for issue in &manifest.issues {
            println!(
                "Skipping malformed line {} ({}): {}",
                issue.line, issue.reason, issue.content
            );
        }

        if manifest.pairs.is_empty() {
            println!(
                "Manifest {} contains no repository pairs",
                self.manifest.display()
            );
            return finish(&ImportReport::default(), manifest.issues.len());
        }

        let options = ImportOptions {
            visibility: self.visibility.unwrap_or(config.import.visibility),
            organization: self.org.clone().or_else(|| config.import.organization.clone()),
            archive: self.archive || config.import.archive,
            dry_run: self.dry_run,
            workspace_dir: config
                .tools
                .workspace_dir
                .clone()
                .unwrap_or_else(default_workspace_dir),
        };

        if verbose {
            tracing::info!(
                manifest = %self.manifest.display(),
                pairs = manifest.pairs.len(),
                dry_run = options.dry_run,
                "Starting import run"
            );
        }

        println!("Gitferry Import");
        println!("===============");
        println!();
        println!("The following actions will be performed:");
        for pair in &manifest.pairs {
            println!("  Import {} -> {}", pair.source, pair.destination);
            if options.archive {
                println!("    then archive {}", pair.destination);
            }
        }
        println!();

        if self.dry_run {
            println!("[Dry run] No repository will be created, cloned, pushed, or archived");
        } else if !self.yes && !confirm("Proceed with import?")? {
            println!("Operation canceled.");
            return Ok(());
        }
        println!();

        let control = GhClient::new().with_path(config.tools.gh_path.clone());
        let transport = GitCli::new().with_path(config.tools.git_path.clone());

        let mut report = ImportReport::default();
        let total = manifest.pairs.len();

        for (index, pair) in manifest.pairs.iter().enumerate() {
            println!(
                "[{}/{}] {} -> {}",
                index + 1,
                total,
                pair.source,
                pair.destination
            );

            let outcome = import_pair(pair, &control, &transport, &options).await;

            match &outcome {
                PairOutcome::Imported { created, archived } => {
                    let mut notes = vec!["pushed", "workspace removed"];
                    if *created {
                        notes.insert(0, "destination created");
                    } else {
                        notes.insert(0, "destination existed");
                    }
                    if *archived {
                        notes.push("archived");
                    }
                    println!("  imported ({})", notes.join(", "));
                }
                PairOutcome::Planned => {
                    println!("  dry run, nothing executed");
                }
                PairOutcome::Failed { step, error } => {
                    println!("  FAILED at {}: {}", step, error);
                }
            }

            report.record(pair, &outcome);
        }

        println!();
        println!(
            "Import summary: {} succeeded, {} failed",
            report.succeeded, report.failed
        );
        if report.planned > 0 {
            println!("  planned (dry run): {}", report.planned);
        }
        if report.created > 0 {
            println!("  destinations created: {}", report.created);
        }
        if report.archived > 0 {
            println!("  destinations archived: {}", report.archived);
        }
        if !manifest.issues.is_empty() {
            println!(
                "  malformed manifest lines skipped: {}",
                manifest.issues.len()
            );
        }

        finish(&report, manifest.issues.len())
    }
}

/// Non-zero exit when any pair failed or any manifest line was malformed
fn finish(report: &ImportReport, malformed: usize) -> anyhow::Result<()> {
    if report.failed > 0 || malformed > 0 {
        anyhow::bail!(
            "import finished with {} failed pair(s) and {} malformed line(s)",
            report.failed,
            malformed
        );
    }

    Ok(())
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{} [y/N] ", question);
    std::io::stdout().flush()?;

    let mut answer = String::new();
    std::io::stdin().read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();

    Ok(answer == "y" || answer == "yes")
}
