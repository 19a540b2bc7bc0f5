use assert_cmd::Command;
use serde_json::Value;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};
use tempfile::TempDir;

#[derive(Debug)]
pub struct ItRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl ItRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    /// Parse stdout as JSON.
    pub fn json(&self) -> Value {
        serde_json::from_str(&extract_json_payload(&self.stdout))
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}): {}", self.stdout))
    }

    /// Parse the structured error written to stderr.
    pub fn error_json(&self) -> Value {
        serde_json::from_str(&extract_json_payload(&self.stderr))
            .unwrap_or_else(|e| panic!("stderr is not JSON ({e}): {}", self.stderr))
    }
}

/// An isolated home directory and project root for CLI runs.
pub struct ItWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl ItWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// Create `.issuetrack/` so the database lands inside the workspace.
    pub fn init_project(&self) -> PathBuf {
        let dir = self.root.join(".issuetrack");
        fs::create_dir_all(&dir).expect("project dir");
        dir
    }

    pub fn session_file(&self) -> PathBuf {
        self.root
            .join(".config")
            .join("issuetrack")
            .join("session.json")
    }
}

pub fn run_it<I, S>(workspace: &ItWorkspace, args: I, label: &str) -> ItRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_it_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_it_with_env<I, S, E, K, V>(
    workspace: &ItWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> ItRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("it"));
    cmd.current_dir(&workspace.root);
    cmd.args(args);
    for key in ["IT_BACKEND", "IT_DB", "ISSUETRACK_URL", "ISSUETRACK_API_KEY", "ISSUETRACK_DIR"] {
        cmd.env_remove(key);
    }
    cmd.envs(env_vars);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "issuetrack=debug");
    cmd.env("RUST_BACKTRACE", "1");
    cmd.env("HOME", &workspace.root);

    let start = Instant::now();
    let output = cmd.output().expect("run it");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let log_body = format!(
        "label: {label}\nstarted: {:?}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        SystemTime::now(),
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    ItRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

/// Sign up (and so sign in) a local account in the workspace.
pub fn sign_up(workspace: &ItWorkspace, email: &str) -> ItRun {
    let run = run_it(
        workspace,
        ["auth", "signup", "--email", email, "--password", "hunter22"],
        &format!("signup_{}", email.replace(['@', '.'], "_")),
    );
    assert!(run.status.success(), "signup failed: {}", run.stderr);
    run
}

/// Create an issue through the CLI and return its id.
pub fn create_issue(workspace: &ItWorkspace, title: &str, description: &str) -> String {
    let run = run_it(
        workspace,
        ["--json", "create", title, "--description", description],
        &format!("create_{}", title.replace(' ', "_")),
    );
    assert!(run.status.success(), "create failed: {}", run.stderr);
    run.json()["issue"]["id"]
        .as_str()
        .expect("issue id")
        .to_string()
}

/// Stderr may carry log lines before the JSON error document.
pub fn extract_json_payload(output: &str) -> String {
    let lines: Vec<&str> = output.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            return lines[idx..].join("\n").trim().to_string();
        }
    }
    output.trim().to_string()
}
