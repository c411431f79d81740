use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn hookline_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("hookline");
    cmd.args(["--color", "never"]);
    cmd
}

/// A throwaway repository with one commit on `master`.
struct Repo {
    _tmp: TempDir,
    path: PathBuf,
}

impl Repo {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().canonicalize().unwrap();
        let repo = Self { _tmp: tmp, path };
        repo.git(&["init", "--quiet"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/master"]);
        repo.git(&["config", "user.name", "Hookline Test"]);
        repo.git(&["config", "user.email", "test@example.com"]);
        repo.git(&["config", "commit.gpgsign", "false"]);
        repo.write("README.md", "# Project\n");
        repo.write("a.txt", "one\ntwo\n");
        repo.git(&["add", "README.md", "a.txt"]);
        repo.git(&["commit", "--quiet", "-m", "Initial commit"]);
        repo
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn git(&self, args: &[&str]) -> String {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.path)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    fn write(&self, name: &str, content: &str) {
        std::fs::write(self.path.join(name), content).unwrap();
    }

    /// Config with one check that flags every line containing `BAD`.
    fn write_grep_config(&self) {
        let config = serde_json::json!({
            "checks": [{
                "name": "no-bad",
                "command": [
                    "sh", "-c",
                    r#"for f in "$@"; do grep -n BAD "$f" | sed "s|^\([0-9]*\):.*|$f:\1: E bad word|"; done; exit 0"#,
                    "no-bad"
                ],
                "pattern": r"^(?P<file>[^:]+):(?P<line>\d+): (?P<type>[EW])",
                "include": [".txt"]
            }]
        });
        self.write(".hookline.json", &config.to_string());
    }
}

#[test]
fn files_run_all_lists_tracked_files() {
    let repo = Repo::new();

    hookline_cmd()
        .current_dir(repo.path())
        .args(["files", "run-all"])
        .assert()
        .success()
        .stdout(predicate::eq("README.md\na.txt\n"));
}

#[test]
fn files_pre_commit_lists_staged_files_only() {
    let repo = Repo::new();
    repo.write("b.txt", "new\n");
    repo.write("unstaged.txt", "not added\n");
    repo.git(&["add", "b.txt"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["files", "pre-commit"])
        .assert()
        .success()
        .stdout(predicate::eq("b.txt\n"));
}

#[test]
fn files_respects_repo_flag() {
    let repo = Repo::new();

    hookline_cmd()
        .args(["--repo", repo.path().to_str().unwrap(), "files", "run-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.txt"));
}

#[test]
fn files_json_output() {
    let repo = Repo::new();
    repo.write("a.txt", "one\ntwo\nthree\n");
    repo.git(&["add", "a.txt"]);

    let output = hookline_cmd()
        .current_dir(repo.path())
        .args(["--json", "files", "pre-commit"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["data"], serde_json::json!(["a.txt"]));
}

#[test]
fn lines_pre_commit_prints_added_lines() {
    let repo = Repo::new();
    repo.write("a.txt", "zero\none\ntwo\nthree\n");
    repo.git(&["add", "a.txt"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["lines", "pre-commit", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::eq("1\n4\n"));
}

#[test]
fn lines_for_unmodified_file_fails() {
    let repo = Repo::new();
    repo.write("b.txt", "new\n");
    repo.git(&["add", "b.txt"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["lines", "pre-commit", "a.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("a.txt is not modified"));
}

#[test]
fn lines_post_merge_squash() {
    let repo = Repo::new();
    repo.git(&["checkout", "--quiet", "-b", "feature"]);
    repo.write("a.txt", "one\ntwo\nthree\n");
    repo.git(&["commit", "--quiet", "-am", "Add a line"]);
    repo.git(&["checkout", "--quiet", "master"]);
    repo.git(&["merge", "--quiet", "--squash", "feature"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["lines", "post-merge", "a.txt", "1"])
        .assert()
        .success()
        .stdout(predicate::eq("3\n"));
}

#[test]
fn files_pre_push_reads_refs_from_stdin() {
    let repo = Repo::new();
    let remote = repo.git(&["rev-parse", "HEAD"]);
    repo.write("pushed.txt", "content\n");
    repo.git(&["add", "pushed.txt"]);
    repo.git(&["commit", "--quiet", "-m", "Add pushed.txt"]);
    let local = repo.git(&["rev-parse", "HEAD"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["files", "pre-push", "origin", "https://example.com/repo.git"])
        .write_stdin(format!(
            "refs/heads/master {local} refs/heads/master {remote}\n"
        ))
        .assert()
        .success()
        .stdout(predicate::eq("pushed.txt\n"));
}

#[test]
fn run_without_config_passes() {
    let repo = Repo::new();

    hookline_cmd()
        .current_dir(repo.path())
        .args(["run", "run-all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No checks configured for run-all"));
}

#[test]
fn run_fails_on_finding_in_modified_line() {
    let repo = Repo::new();
    repo.write_grep_config();
    repo.write("a.txt", "one\ntwo\nBAD\n");
    repo.git(&["add", "a.txt"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["run", "pre-commit"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-bad: failed"))
        .stderr(predicate::str::contains("bad word"));
}

#[test]
fn run_only_warns_on_untouched_lines() {
    let repo = Repo::new();
    repo.write("a.txt", "BAD\none\ntwo\n");
    repo.git(&["commit", "--quiet", "-am", "Sneak in a bad line"]);
    repo.write_grep_config();
    repo.write("a.txt", "BAD\none\ntwo\nthree\n");
    repo.git(&["add", "a.txt"]);

    hookline_cmd()
        .current_dir(repo.path())
        .args(["run", "pre-commit"])
        .assert()
        .success()
        .stderr(predicate::str::contains("(unmodified line)"));
}

#[test]
fn run_json_reports_check_status() {
    let repo = Repo::new();
    repo.write_grep_config();
    repo.write("a.txt", "one\ntwo\nBAD\n");
    repo.git(&["add", "a.txt"]);

    let output = hookline_cmd()
        .current_dir(repo.path())
        .args(["--json", "run", "pre-commit"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let report = &json["data"]["reports"][0];
    assert_eq!(report["name"], "no-bad");
    assert_eq!(report["status"], "fail");
    assert_eq!(report["findings"][0]["line"], 3);
    assert_eq!(report["findings"][0]["status"], "modified");
}

#[test]
fn outside_a_repository_fails() {
    let tmp = TempDir::new().unwrap();

    hookline_cmd()
        .current_dir(tmp.path())
        .args(["files", "run-all"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR:"));
}

#[test]
fn unknown_event_is_rejected() {
    hookline_cmd()
        .args(["files", "pre-rebase"])
        .assert()
        .failure();
}

#[test]
fn invalid_post_checkout_args_fail() {
    let repo = Repo::new();

    hookline_cmd()
        .current_dir(repo.path())
        .args(["files", "post-checkout", "only-one-arg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("post-checkout"));
}

#[test]
fn completions_bash() {
    hookline_cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hookline"));
}
