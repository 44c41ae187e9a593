use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tokio::time::timeout;

use crate::config::Config;
use crate::utils::LogError;

/// Source of repository state. Every lookup is independent and yields
/// `None` instead of failing.
pub trait RepoProbe {
    async fn commit(&self) -> Option<String>;
    async fn branch(&self) -> Option<String>;
    /// True when the working tree has anything to report.
    async fn is_dirty(&self) -> bool;
    async fn describe(&self) -> Option<String>;
}

#[derive(Debug, Clone)]
pub struct Git {
    program: PathBuf,
    repo_dir: Option<PathBuf>,
    timeout: Duration,
}

impl Git {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Git {
            program: program.into(),
            repo_dir: None,
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let git = Git::new(&config.git_program).timeout(config.lookup_timeout);
        match &config.repo_dir {
            Some(dir) => git.repo_dir(dir),
            None => git,
        }
    }

    pub fn repo_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.repo_dir = Some(dir.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Run once, trimmed stdout on success. Anything else (missing program,
    /// non-zero exit, timeout, non-UTF-8, blank output) is `None`.
    async fn run(&self, args: &[&str]) -> Option<String> {
        let ctx = format!("{} {}", self.program.display(), args.join(" "));
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.repo_dir {
            cmd.current_dir(dir);
        }

        let output = timeout(self.timeout, cmd.output())
            .await
            .ok_or_log(&ctx)?
            .ok_or_log(&ctx)?;
        if !output.status.success() {
            log::debug!(
                "{}: {} {}",
                ctx,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return None;
        }

        let stdout = String::from_utf8(output.stdout).ok_or_log(&ctx)?;
        let value = stdout.trim();
        if value.is_empty() {
            log::debug!("{}: no output", ctx);
            return None;
        }
        log::debug!("{}: {}", ctx, value);
        Some(value.to_string())
    }
}

impl RepoProbe for Git {
    async fn commit(&self) -> Option<String> {
        self.run(&["rev-parse", "--short", "HEAD"]).await
    }

    async fn branch(&self) -> Option<String> {
        self.run(&["rev-parse", "--abbrev-ref", "HEAD"]).await
    }

    async fn is_dirty(&self) -> bool {
        self.run(&["status", "--porcelain"]).await.is_some()
    }

    async fn describe(&self) -> Option<String> {
        self.run(&["describe", "--tags", "--always"]).await
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_program_yields_nothing() {
        let git = Git::new("ncl-no-such-vcs-tool");
        assert_eq!(git.commit().await, None);
        assert_eq!(git.branch().await, None);
        assert_eq!(git.describe().await, None);
        assert!(!git.is_dirty().await);
    }

    #[tokio::test]
    async fn failing_program_yields_nothing() {
        let git = Git::new("false");
        assert_eq!(git.commit().await, None);
        assert_eq!(git.describe().await, None);
        assert!(!git.is_dirty().await);
    }

    #[tokio::test]
    async fn lookups_pass_their_own_arguments() {
        // echo hands the arguments back, one invocation per lookup
        let git = Git::new("echo");
        assert_eq!(git.commit().await.as_deref(), Some("rev-parse --short HEAD"));
        assert_eq!(git.branch().await.as_deref(), Some("rev-parse --abbrev-ref HEAD"));
        assert_eq!(git.describe().await.as_deref(), Some("describe --tags --always"));
        assert!(git.is_dirty().await);
    }

    #[tokio::test]
    async fn blank_output_counts_as_missing() {
        let git = Git::new("echo");
        assert_eq!(git.run(&["   "]).await, None);
        assert_eq!(git.run(&[]).await, None);
    }

    #[tokio::test]
    async fn slow_lookup_times_out() {
        let git = Git::new("sleep").timeout(Duration::from_millis(100));
        assert_eq!(git.run(&["5"]).await, None);
    }

    fn git_available() -> bool {
        std::process::Command::new("git")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    fn git_in(dir: &std::path::Path, args: &[&str]) {
        let output = std::process::Command::new("git")
            .args([
                "-c", "user.name=NCL",
                "-c", "user.email=ncl@example.com",
                "-c", "commit.gpgsign=false",
                "-c", "tag.gpgsign=false",
            ])
            .args(args)
            .current_dir(dir)
            .output()
            .expect("git should run");
        assert!(output.status.success(), "git {:?}: {}", args, String::from_utf8_lossy(&output.stderr));
    }

    #[tokio::test]
    async fn reads_a_real_repository() {
        if !git_available() {
            eprintln!("git not on PATH, skipping");
            return;
        }
        let dir = tempfile::tempdir().expect("should create temp dir");
        git_in(dir.path(), &["init", "-q"]);
        git_in(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        std::fs::write(dir.path().join("README"), "ncl\n").unwrap();
        git_in(dir.path(), &["add", "README"]);
        git_in(dir.path(), &["commit", "-q", "-m", "initial"]);

        let config = Config { repo_dir: Some(dir.path().to_path_buf()), ..Config::default() };
        let git = Git::from_config(&config);

        let commit = git.commit().await.expect("commit should resolve");
        assert!(commit.len() >= 4 && commit.chars().all(|c| c.is_ascii_hexdigit()), "{}", commit);
        assert_eq!(git.branch().await.as_deref(), Some("main"));
        assert!(!git.is_dirty().await);
        // no tags yet: describe falls back to the short hash
        assert_eq!(git.describe().await, Some(commit.clone()));

        git_in(dir.path(), &["tag", "v1.2.0"]);
        assert_eq!(git.describe().await.as_deref(), Some("v1.2.0"));

        std::fs::write(dir.path().join("scratch.txt"), "untracked\n").unwrap();
        assert!(git.is_dirty().await);

        std::fs::remove_file(dir.path().join("scratch.txt")).unwrap();
        assert!(!git.is_dirty().await);
        std::fs::write(dir.path().join("README"), "changed\n").unwrap();
        assert!(git.is_dirty().await);
    }

    #[tokio::test]
    async fn runs_inside_repo_dir() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let git = Git::new("pwd").repo_dir(dir.path());
        let cwd = git.run(&[]).await.expect("pwd should print");
        let expected = dir.path().canonicalize().expect("should canonicalize");
        assert_eq!(PathBuf::from(cwd), expected);
    }
}
