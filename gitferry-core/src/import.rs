//! Import orchestration
//!
//! Each pair goes through a fixed, strictly sequential sequence: resolve the
//! destination, make sure it exists on the hosting platform, mirror-clone the
//! source into an ephemeral workspace, push the mirror, release the
//! workspace, and optionally archive the destination. Failures never cross
//! the pair boundary; every pair reports its own outcome.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::Visibility;
use crate::git::{MirrorTransport, MirrorWorkspace};
use crate::manifest::RepoPair;
use crate::repo_url::RepoUrl;
use crate::{Error, Result};

/// Control plane of the destination hosting platform
///
/// Consumed, not reimplemented: gitferry only needs existence checks,
/// creation, and archival, and the implementation owns all auth state.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    /// Whether the destination repository already exists
    async fn repo_exists(&self, repo: &RepoUrl) -> Result<bool>;

    /// Create the destination with the given visibility
    ///
    /// When `organization` is set the repository is created under that
    /// namespace instead of the URL's owner.
    async fn create_repo(
        &self,
        repo: &RepoUrl,
        visibility: Visibility,
        organization: Option<&str>,
    ) -> Result<()>;

    /// Mark the destination repository as archived
    async fn archive_repo(&self, repo: &RepoUrl) -> Result<()>;
}

/// Options for an import run, constant for the whole run
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Visibility for destinations created during the run
    pub visibility: Visibility,
    /// Organization namespace for created destinations
    pub organization: Option<String>,
    /// Archive each destination after a successful push
    pub archive: bool,
    /// Log intended actions without executing them
    pub dry_run: bool,
    /// Base directory for mirror workspaces
    pub workspace_dir: PathBuf,
}

/// Step of the per-pair procedure, for failure reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportStep {
    /// Parsing the destination URL
    Resolve,
    /// Destination existence check or creation
    Create,
    /// Mirror clone of the source
    Clone,
    /// Mirror push to the destination
    Push,
}

impl std::fmt::Display for ImportStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportStep::Resolve => write!(f, "destination resolution"),
            ImportStep::Create => write!(f, "destination creation"),
            ImportStep::Clone => write!(f, "mirror clone"),
            ImportStep::Push => write!(f, "mirror push"),
        }
    }
}

/// Outcome of processing one repository pair
#[derive(Debug)]
pub enum PairOutcome {
    /// Mirror pushed to the destination
    Imported {
        /// Whether the destination was created during this run
        created: bool,
        /// Whether the destination was archived afterwards
        archived: bool,
    },
    /// Dry run: intended actions logged, nothing executed
    Planned,
    /// Pair failed at the named step
    Failed {
        /// Step that failed
        step: ImportStep,
        /// Underlying error
        error: Error,
    },
}

/// Accumulated result of an import run
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Pairs whose mirror reached the destination
    pub succeeded: usize,
    /// Pairs that failed at some step
    pub failed: usize,
    /// Pairs only planned because of dry-run mode
    pub planned: usize,
    /// Destinations created during the run
    pub created: usize,
    /// Destinations archived after import
    pub archived: usize,
    /// Human-readable description of every failure
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Record the outcome of one pair
    pub fn record(&mut self, pair: &RepoPair, outcome: &PairOutcome) {
        match outcome {
            PairOutcome::Imported { created, archived } => {
                self.succeeded += 1;
                if *created {
                    self.created += 1;
                }
                if *archived {
                    self.archived += 1;
                }
            }
            PairOutcome::Planned => self.planned += 1,
            PairOutcome::Failed { step, error } => {
                self.failed += 1;
                self.errors.push(format!(
                    "{} -> {}: {} failed: {}",
                    pair.source, pair.destination, step, error
                ));
            }
        }
    }
}

/// Import one repository pair
///
/// Runs the full per-pair sequence and catches every failure at the pair
/// boundary. The mirror workspace is released on all paths once it has been
/// reserved.
pub async fn import_pair<C, T>(
    pair: &RepoPair,
    control: &C,
    transport: &T,
    options: &ImportOptions,
) -> PairOutcome
where
    C: ControlPlane,
    T: MirrorTransport,
{
    let destination = match RepoUrl::parse(&pair.destination) {
        Ok(repo) => repo,
        Err(error) => {
            return PairOutcome::Failed {
                step: ImportStep::Resolve,
                error,
            }
        }
    };

    if options.dry_run {
        log_plan(pair, &destination, options);
        return PairOutcome::Planned;
    }

    let created = match ensure_destination(&destination, control, options).await {
        Ok(created) => created,
        Err(error) => {
            return PairOutcome::Failed {
                step: ImportStep::Create,
                error,
            }
        }
    };

    let workspace = match MirrorWorkspace::create(&options.workspace_dir, &destination) {
        Ok(workspace) => workspace,
        Err(error) => {
            return PairOutcome::Failed {
                step: ImportStep::Clone,
                error,
            }
        }
    };

    if let Err(error) = transport.clone_mirror(&pair.source, workspace.path()).await {
        release(workspace);
        return PairOutcome::Failed {
            step: ImportStep::Clone,
            error,
        };
    }

    info!(source = %pair.source, "Mirror clone complete");

    let pushed = transport
        .push_mirror(workspace.path(), &pair.destination)
        .await;

    // The workspace is released whether or not the push succeeded
    release(workspace);

    if let Err(error) = pushed {
        return PairOutcome::Failed {
            step: ImportStep::Push,
            error,
        };
    }

    info!(destination = %pair.destination, "Mirror push complete");

    let archived = if options.archive {
        match control.archive_repo(&destination).await {
            Ok(()) => {
                info!(destination = %destination.full_name(), "Archived destination");
                true
            }
            Err(error) => {
                // Archive failures do not change the pair's classification
                warn!(
                    destination = %destination.full_name(),
                    error = %error,
                    "Failed to archive destination"
                );
                false
            }
        }
    } else {
        false
    };

    PairOutcome::Imported { created, archived }
}

/// Make sure the destination exists, creating it when absent
///
/// Returns whether a creation was performed. An existing destination is
/// never re-created, so re-runs are idempotent on the control plane.
async fn ensure_destination<C: ControlPlane>(
    destination: &RepoUrl,
    control: &C,
    options: &ImportOptions,
) -> Result<bool> {
    if control.repo_exists(destination).await? {
        info!(
            destination = %destination.full_name(),
            "Destination already exists, skipping creation"
        );
        return Ok(false);
    }

    control
        .create_repo(
            destination,
            options.visibility,
            options.organization.as_deref(),
        )
        .await?;

    info!(
        destination = %destination.full_name(),
        visibility = %options.visibility,
        "Created destination repository"
    );

    Ok(true)
}

fn log_plan(pair: &RepoPair, destination: &RepoUrl, options: &ImportOptions) {
    info!(
        destination = %destination.full_name(),
        visibility = %options.visibility,
        "[dry run] Would ensure destination repository exists"
    );
    info!(source = %pair.source, "[dry run] Would mirror-clone source");
    info!(destination = %pair.destination, "[dry run] Would push mirror");
    if options.archive {
        info!(
            destination = %destination.full_name(),
            "[dry run] Would archive destination"
        );
    }
}

fn release(workspace: MirrorWorkspace) {
    if let Err(error) = workspace.remove() {
        warn!(error = %error, "Failed to remove mirror workspace");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::workspace_path;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockControl {
        exists: bool,
        fail_create: bool,
        fail_archive: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockControl {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ControlPlane for MockControl {
        async fn repo_exists(&self, repo: &RepoUrl) -> Result<bool> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("exists {}", repo.full_name()));
            Ok(self.exists)
        }

        async fn create_repo(
            &self,
            repo: &RepoUrl,
            visibility: Visibility,
            organization: Option<&str>,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(format!(
                "create {} {} org={}",
                repo.full_name(),
                visibility,
                organization.unwrap_or("-")
            ));
            if self.fail_create {
                return Err(Error::ControlPlane("creation rejected".to_string()));
            }
            Ok(())
        }

        async fn archive_repo(&self, repo: &RepoUrl) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("archive {}", repo.full_name()));
            if self.fail_archive {
                return Err(Error::ControlPlane("archive rejected".to_string()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockTransport {
        fail_clone: bool,
        fail_push: bool,
        calls: Mutex<Vec<String>>,
    }

    impl MockTransport {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl MirrorTransport for MockTransport {
        async fn clone_mirror(&self, source_url: &str, workspace: &Path) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("clone {}", source_url));
            if self.fail_clone {
                return Err(Error::Git("source unreachable".to_string()));
            }
            // Simulate git creating the mirror directory
            std::fs::create_dir_all(workspace)?;
            Ok(())
        }

        async fn push_mirror(&self, _workspace: &Path, destination_url: &str) -> Result<()> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("push {}", destination_url));
            if self.fail_push {
                return Err(Error::Git("destination rejected".to_string()));
            }
            Ok(())
        }
    }

    fn pair() -> RepoPair {
        RepoPair {
            source: "https://host/a/repo1.git".to_string(),
            destination: "https://github.com/org1/repo1.git".to_string(),
        }
    }

    fn options(workspace_dir: &Path) -> ImportOptions {
        ImportOptions {
            visibility: Visibility::Private,
            organization: Some("org1".to_string()),
            archive: false,
            dry_run: false,
            workspace_dir: workspace_dir.to_path_buf(),
        }
    }

    #[tokio::test]
    async fn test_import_creates_missing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl::default();
        let transport = MockTransport::default();

        let outcome = import_pair(&pair(), &control, &transport, &options(dir.path())).await;

        match outcome {
            PairOutcome::Imported { created, archived } => {
                assert!(created);
                assert!(!archived);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            control.calls(),
            vec![
                "exists org1/repo1".to_string(),
                "create org1/repo1 private org=org1".to_string(),
            ]
        );
        assert_eq!(
            transport.calls(),
            vec![
                "clone https://host/a/repo1.git".to_string(),
                "push https://github.com/org1/repo1.git".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn test_existing_destination_skips_creation() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl {
            exists: true,
            ..Default::default()
        };
        let transport = MockTransport::default();

        let outcome = import_pair(&pair(), &control, &transport, &options(dir.path())).await;

        match outcome {
            PairOutcome::Imported { created, .. } => assert!(!created),
            other => panic!("unexpected outcome: {:?}", other),
        }
        // No creation call was issued; the mirror was still re-pushed
        assert_eq!(control.calls(), vec!["exists org1/repo1".to_string()]);
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_dry_run_issues_no_external_calls() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl::default();
        let transport = MockTransport::default();
        let mut opts = options(dir.path());
        opts.dry_run = true;
        opts.archive = true;

        let outcome = import_pair(&pair(), &control, &transport, &opts).await;

        assert!(matches!(outcome, PairOutcome::Planned));
        assert!(control.calls().is_empty());
        assert!(transport.calls().is_empty());
        // No workspace was reserved either
        let destination = RepoUrl::parse(&pair().destination).unwrap();
        assert!(!workspace_path(dir.path(), &destination).exists());
    }

    #[tokio::test]
    async fn test_clone_failure_skips_push_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl::default();
        let transport = MockTransport {
            fail_clone: true,
            ..Default::default()
        };

        let outcome = import_pair(&pair(), &control, &transport, &options(dir.path())).await;

        match outcome {
            PairOutcome::Failed { step, .. } => assert_eq!(step, ImportStep::Clone),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(transport.calls(), vec!["clone https://host/a/repo1.git".to_string()]);
        let destination = RepoUrl::parse(&pair().destination).unwrap();
        assert!(!workspace_path(dir.path(), &destination).exists());
    }

    #[tokio::test]
    async fn test_push_failure_still_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl::default();
        let transport = MockTransport {
            fail_push: true,
            ..Default::default()
        };

        let outcome = import_pair(&pair(), &control, &transport, &options(dir.path())).await;

        match outcome {
            PairOutcome::Failed { step, .. } => assert_eq!(step, ImportStep::Push),
            other => panic!("unexpected outcome: {:?}", other),
        }
        let destination = RepoUrl::parse(&pair().destination).unwrap();
        assert!(!workspace_path(dir.path(), &destination).exists());
    }

    #[tokio::test]
    async fn test_creation_failure_fails_pair_before_clone() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl {
            fail_create: true,
            ..Default::default()
        };
        let transport = MockTransport::default();

        let outcome = import_pair(&pair(), &control, &transport, &options(dir.path())).await;

        match outcome {
            PairOutcome::Failed { step, .. } => assert_eq!(step, ImportStep::Create),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_archive_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl {
            fail_archive: true,
            ..Default::default()
        };
        let transport = MockTransport::default();
        let mut opts = options(dir.path());
        opts.archive = true;

        let outcome = import_pair(&pair(), &control, &transport, &opts).await;

        match outcome {
            PairOutcome::Imported { archived, .. } => assert!(!archived),
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_destination_fails_resolution() {
        let dir = tempfile::tempdir().unwrap();
        let control = MockControl::default();
        let transport = MockTransport::default();
        let bad = RepoPair {
            source: "https://host/a/repo1.git".to_string(),
            destination: "not-a-url".to_string(),
        };

        let outcome = import_pair(&bad, &control, &transport, &options(dir.path())).await;

        match outcome {
            PairOutcome::Failed { step, .. } => assert_eq!(step, ImportStep::Resolve),
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert!(control.calls().is_empty());
        assert!(transport.calls().is_empty());
    }

    #[test]
    fn test_report_record() {
        let mut report = ImportReport::default();
        let pair = pair();

        report.record(
            &pair,
            &PairOutcome::Imported {
                created: true,
                archived: true,
            },
        );
        report.record(
            &pair,
            &PairOutcome::Failed {
                step: ImportStep::Clone,
                error: Error::Git("source unreachable".to_string()),
            },
        );
        report.record(&pair, &PairOutcome::Planned);

        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.planned, 1);
        assert_eq!(report.created, 1);
        assert_eq!(report.archived, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("mirror clone failed"));
    }
}
