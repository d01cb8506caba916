//! The four tool operations, composed from runner calls.
//!
//! Each handler locks the workspace configuration for its full body, so the
//! directory a multi-step sequence runs in cannot change mid-operation.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use gitdock_core::audit::{AuditLevel, log_event};
use gitdock_core::{CommandOutcome, GitExecutor, GitToolError, WorkspaceConfig};

/// Marker git prints when a commit would be empty. Matching on this
/// human-readable output is inherently locale/version dependent; the
/// underlying tool offers no more robust signal, and callers expect the
/// resulting no-op behavior, so the fragility is kept rather than papered
/// over.
const NO_CHANGES_MARKER: &str = "nothing to commit";

/// Git-backed tool operations.
///
/// Holds the executor port and the shared workspace configuration; the
/// dispatcher owns one instance for the lifetime of the server.
pub struct GitService {
    executor: Arc<dyn GitExecutor>,
    config: Arc<Mutex<WorkspaceConfig>>,
    /// Directory the process was started from; relative `working_dir`
    /// arguments resolve against this, regardless of later configuration
    /// changes.
    startup_dir: PathBuf,
}

impl GitService {
    /// Create a service over the given executor and initial configuration.
    pub fn new(
        executor: Arc<dyn GitExecutor>,
        initial: WorkspaceConfig,
        startup_dir: PathBuf,
    ) -> Self {
        Self {
            executor,
            config: Arc::new(Mutex::new(initial)),
            startup_dir,
        }
    }

    /// `load_config`: set the working directory, creating it on demand, and
    /// recompute the log path atomically.
    pub async fn load_config(&self, working_dir: &str) -> Result<String, GitToolError> {
        let mut config = self.config.lock().await;
        config.set_working_dir(Path::new(working_dir), &self.startup_dir)?;

        log_event(
            &config,
            AuditLevel::Info,
            &format!(
                "Configuration loaded: working directory {}",
                config.working_dir().display()
            ),
        );

        Ok(format!(
            "Configuration loaded.\nWorking directory: {}\nLog file: {}",
            config.working_dir().display(),
            config.log_file().display()
        ))
    }

    /// `get_config`: pure read of the current configuration. Never fails.
    pub async fn get_config(&self) -> String {
        let config = self.config.lock().await;
        format!(
            "Working directory: {}\nLog file: {}",
            config.working_dir().display(),
            config.log_file().display()
        )
    }

    /// `get_init`: initialize a repository, add the `origin` remote, and
    /// optionally rename the default branch. Any failing step aborts the
    /// rest of the sequence.
    pub async fn init(
        &self,
        remote_url: &str,
        default_branch: Option<&str>,
    ) -> Result<String, GitToolError> {
        let config = self.config.lock().await;
        log_event(
            &config,
            AuditLevel::Info,
            &format!("get_init requested (remote: {remote_url})"),
        );

        self.run_step(&config, "get_init", "git init", vec!["init".into()])
            .await?;

        self.run_step(
            &config,
            "get_init",
            "git remote add",
            vec![
                "remote".into(),
                "add".into(),
                "origin".into(),
                remote_url.into(),
            ],
        )
        .await?;

        let mut summary = format!(
            "Initialized repository in {} and set remote origin to {remote_url}.",
            config.working_dir().display()
        );

        if let Some(branch) = default_branch {
            self.run_step(
                &config,
                "get_init",
                "git branch -M",
                vec!["branch".into(), "-M".into(), branch.into()],
            )
            .await?;
            summary.push_str(&format!(" Default branch renamed to {branch}."));
        }

        Ok(summary)
    }

    /// `get_pull`: one pull command. The branch is appended only when given;
    /// omission delegates current-branch resolution to git itself. Only a
    /// non-zero exit is a failure -- git routinely writes benign progress
    /// chatter ("Updating", "Fast-forward") to stderr.
    pub async fn pull(&self, remote: &str, branch: Option<&str>) -> Result<String, GitToolError> {
        let config = self.config.lock().await;
        log_event(
            &config,
            AuditLevel::Info,
            &format!(
                "get_pull requested (remote: {remote}, branch: {})",
                branch.unwrap_or("<current>")
            ),
        );

        let mut args = vec!["pull".to_string(), remote.to_string()];
        if let Some(branch) = branch {
            args.push(branch.to_string());
        }

        let outcome = self
            .run_step(&config, "get_pull", "git pull", args)
            .await?;

        Ok(format!(
            "Pull completed.\n{}",
            outcome.stdout.trim_end()
        ))
    }

    /// `get_push`: stage everything, commit, and push. An empty commit is a
    /// deliberate no-op reported as success, not an error.
    pub async fn push(
        &self,
        commit_message: &str,
        remote: &str,
        branch: Option<&str>,
    ) -> Result<String, GitToolError> {
        let config = self.config.lock().await;
        log_event(&config, AuditLevel::Info, "get_push requested");

        self.run_step(
            &config,
            "get_push",
            "git add",
            vec!["add".into(), "-A".into()],
        )
        .await?;

        let commit = self
            .executor
            .run(
                vec!["commit".into(), "-m".into(), commit_message.into()],
                config.working_dir(),
            )
            .await;

        if !commit.exited_cleanly {
            if commit.combined_output().contains(NO_CHANGES_MARKER) {
                log_event(&config, AuditLevel::Info, "get_push: no changes to commit");
                return Ok("No changes to commit.".to_string());
            }
            return Err(Self::step_failure(&config, "get_push", "git commit", commit));
        }

        let target = match branch {
            Some(branch) => branch.to_string(),
            None => self.detect_current_branch(&config).await,
        };

        self.run_step(
            &config,
            "get_push",
            "git push",
            vec!["push".into(), remote.into(), target.clone()],
        )
        .await?;

        log_event(
            &config,
            AuditLevel::Info,
            &format!("get_push completed: pushed to {remote}/{target}"),
        );
        Ok(format!("Changes committed and pushed to {remote}/{target}."))
    }

    /// Detect the current branch with a read-only query. Detection failure
    /// is non-fatal: the push falls back to the symbolic `HEAD` target.
    async fn detect_current_branch(&self, config: &WorkspaceConfig) -> String {
        let outcome = self
            .executor
            .run(
                vec!["rev-parse".into(), "--abbrev-ref".into(), "HEAD".into()],
                config.working_dir(),
            )
            .await;

        if outcome.exited_cleanly {
            let branch = outcome.stdout.trim();
            if !branch.is_empty() {
                return branch.to_string();
            }
        }

        log_event(
            config,
            AuditLevel::Debug,
            "branch detection failed, pushing HEAD",
        );
        "HEAD".to_string()
    }

    /// Run one git step, converting a dirty exit into the step's error.
    async fn run_step(
        &self,
        config: &WorkspaceConfig,
        operation: &'static str,
        step: &'static str,
        args: Vec<String>,
    ) -> Result<CommandOutcome, GitToolError> {
        let outcome = self.executor.run(args, config.working_dir()).await;
        if outcome.exited_cleanly {
            Ok(outcome)
        } else {
            Err(Self::step_failure(config, operation, step, outcome))
        }
    }

    fn step_failure(
        config: &WorkspaceConfig,
        operation: &'static str,
        step: &'static str,
        outcome: CommandOutcome,
    ) -> GitToolError {
        let message = outcome
            .failure_message
            .unwrap_or_else(|| format!("{step} failed"));
        log_event(
            config,
            AuditLevel::Error,
            &format!("{operation} failed at {step}: {message}"),
        );
        GitToolError::Subprocess {
            operation,
            step,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    /// Executor that replays a scripted sequence of outcomes and records
    /// every invocation.
    struct ScriptedExecutor {
        script: StdMutex<VecDeque<CommandOutcome>>,
        calls: StdMutex<Vec<Vec<String>>>,
    }

    impl ScriptedExecutor {
        fn new(script: Vec<CommandOutcome>) -> Self {
            Self {
                script: StdMutex::new(script.into()),
                calls: StdMutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl GitExecutor for ScriptedExecutor {
        async fn run(&self, args: Vec<String>, _cwd: &Path) -> CommandOutcome {
            self.calls.lock().unwrap().push(args);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| CommandOutcome::success(String::new(), String::new()))
        }
    }

    fn ok(stdout: &str) -> CommandOutcome {
        CommandOutcome::success(stdout.to_string(), String::new())
    }

    fn fail(stdout: &str, stderr: &str, message: &str) -> CommandOutcome {
        CommandOutcome::failure(stdout.to_string(), stderr.to_string(), message.to_string())
    }

    fn service_with(script: Vec<CommandOutcome>) -> (GitService, Arc<ScriptedExecutor>, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new(script));
        let service = GitService::new(
            executor.clone(),
            WorkspaceConfig::new(tmp.path().to_path_buf()),
            tmp.path().to_path_buf(),
        );
        (service, executor, tmp)
    }

    #[tokio::test]
    async fn push_with_nothing_to_commit_is_a_benign_noop() {
        let (service, executor, _tmp) = service_with(vec![
            ok(""),
            fail(
                "nothing to commit, working tree clean",
                "",
                "git commit exited with status 1",
            ),
        ]);

        let text = service.push("update", "origin", None).await.unwrap();

        assert_eq!(text, "No changes to commit.");
        // add + commit only; the flow short-circuits before detection/push.
        assert_eq!(executor.calls().len(), 2);
    }

    #[tokio::test]
    async fn push_detects_current_branch_when_unspecified() {
        let (service, executor, _tmp) = service_with(vec![
            ok(""),
            ok("[main 1a2b3c] update"),
            ok("main\n"),
            ok(""),
        ]);

        let text = service.push("update", "origin", None).await.unwrap();

        let calls = executor.calls();
        assert_eq!(
            calls[2],
            vec!["rev-parse", "--abbrev-ref", "HEAD"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(
            calls[3],
            vec!["push", "origin", "main"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert!(text.contains("origin/main"));
        assert!(!text.contains("HEAD"));
    }

    #[tokio::test]
    async fn push_falls_back_to_head_when_detection_fails() {
        let (service, executor, _tmp) = service_with(vec![
            ok(""),
            ok("[main 1a2b3c] update"),
            fail("", "fatal: not a git repository", "git rev-parse exited with status 128"),
            ok(""),
        ]);

        service.push("update", "origin", None).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls[3][2], "HEAD");
    }

    #[tokio::test]
    async fn push_honors_explicit_branch_without_detection() {
        let (service, executor, _tmp) = service_with(vec![ok(""), ok("committed"), ok("")]);

        service.push("update", "upstream", Some("release")).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[2],
            vec!["push", "upstream", "release"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn push_propagates_real_commit_failures() {
        let (service, executor, _tmp) = service_with(vec![
            ok(""),
            fail(
                "",
                "error: gpg failed to sign the data",
                "git commit exited with status 128: error: gpg failed to sign the data",
            ),
        ]);

        let err = service.push("update", "origin", None).await.unwrap_err();

        assert!(matches!(
            err,
            GitToolError::Subprocess { step: "git commit", .. }
        ));
        assert!(err.to_string().contains("gpg failed"));
        assert_eq!(executor.calls().len(), 2);
    }

    #[tokio::test]
    async fn init_aborts_sequence_on_first_failure() {
        let (service, executor, _tmp) = service_with(vec![fail(
            "",
            "fatal: cannot mkdir .git",
            "git init exited with status 128: fatal: cannot mkdir .git",
        )]);

        let err = service.init("https://example.com/repo.git", None).await.unwrap_err();

        assert!(err.to_string().contains("cannot mkdir"));
        assert_eq!(executor.calls().len(), 1);
    }

    #[tokio::test]
    async fn init_renames_branch_only_when_given() {
        let (service, executor, _tmp) = service_with(vec![ok(""), ok(""), ok("")]);

        let text = service
            .init("https://example.com/repo.git", Some("main"))
            .await
            .unwrap();

        let calls = executor.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(
            calls[1],
            vec!["remote", "add", "origin", "https://example.com/repo.git"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert_eq!(
            calls[2],
            vec!["branch", "-M", "main"]
                .into_iter()
                .map(String::from)
                .collect::<Vec<_>>()
        );
        assert!(text.contains("remote origin"));
        assert!(text.contains("Default branch renamed to main"));
    }

    #[tokio::test]
    async fn pull_failure_surfaces_captured_stderr() {
        let (service, _executor, _tmp) = service_with(vec![fail(
            "",
            "fatal: unable to access 'https://example.com/': Could not resolve host",
            "git pull exited with status 128: fatal: unable to access 'https://example.com/': Could not resolve host",
        )]);

        let err = service.pull("origin", None).await.unwrap_err();

        assert!(err.to_string().contains("Could not resolve host"));
    }

    #[tokio::test]
    async fn pull_appends_branch_only_when_provided() {
        let (service, executor, _tmp) = service_with(vec![ok("Already up to date.\n"), ok("")]);

        service.pull("origin", None).await.unwrap();
        service.pull("origin", Some("develop")).await.unwrap();

        let calls = executor.calls();
        assert_eq!(calls[0], vec!["pull".to_string(), "origin".to_string()]);
        assert_eq!(
            calls[1],
            vec!["pull".to_string(), "origin".to_string(), "develop".to_string()]
        );
    }

    #[tokio::test]
    async fn pull_treats_benign_stderr_as_informational() {
        let (service, _executor, _tmp) = service_with(vec![CommandOutcome::success(
            "Updating 1a2b3c..4d5e6f\nFast-forward\n".to_string(),
            "From example.com:repo\n   1a2b3c..4d5e6f  main -> origin/main\n".to_string(),
        )]);

        let text = service.pull("origin", None).await.unwrap();

        assert!(text.contains("Fast-forward"));
    }

    #[tokio::test]
    async fn load_config_resolves_relative_paths_against_startup_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let executor = Arc::new(ScriptedExecutor::new(vec![]));
        let service = GitService::new(
            executor,
            WorkspaceConfig::new(tmp.path().to_path_buf()),
            tmp.path().to_path_buf(),
        );

        let text = service.load_config("./rel").await.unwrap();

        let expected = tmp.path().join("rel");
        assert!(expected.is_dir());
        assert!(text.contains(&expected.display().to_string()));

        let reported = service.get_config().await;
        assert!(reported.contains(&expected.display().to_string()));
        assert!(reported.contains("gitdock.log"));
    }
}
