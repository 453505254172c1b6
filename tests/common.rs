#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use ticket::git::Repo;

/// A throwaway repository driven through the real `git` executable.
pub struct TestRepo {
  pub repo_path: TempDir
}

impl Default for TestRepo {
  fn default() -> Self {
    let repo = Self { repo_path: TempDir::new().unwrap() };
    repo.git(&["init", "--quiet"]);
    repo
  }
}

impl TestRepo {
  pub fn path(&self) -> &Path {
    self.repo_path.path()
  }

  pub fn git(&self, args: &[&str]) -> String {
    let output = Command::new("git")
      .args(args)
      .current_dir(self.path())
      .env_remove("GIT_DIR")
      .env_remove("GIT_WORK_TREE")
      .env_remove("GIT_INDEX_FILE")
      .output()
      .expect("Failed to execute git");

    assert!(
      output.status.success(),
      "git {:?} failed: {}",
      args,
      String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).trim().to_string()
  }

  pub fn checkout_new_branch(&self, branch: &str) {
    self.git(&["checkout", "--quiet", "-b", branch]);
  }

  pub fn commit_empty(&self, message: &str) {
    self.git(&[
      "-c",
      "user.name=Your Name",
      "-c",
      "user.email=email@example.com",
      "-c",
      "commit.gpgsign=false",
      "commit",
      "--quiet",
      "--no-verify",
      "--allow-empty",
      "-m",
      message
    ]);
  }

  pub fn detach_head(&self) {
    self.commit_empty("Initial commit");
    self.git(&["checkout", "--quiet", "--detach"]);
  }

  /// Writes `contents` to `.git/COMMIT_EDITMSG` and returns its path.
  pub fn message_file(&self, contents: &str) -> PathBuf {
    let path = self.path().join(".git").join("COMMIT_EDITMSG");
    std::fs::write(&path, contents).unwrap();
    path
  }

  pub fn read(&self, path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
  }

  pub fn repo(&self) -> Repo {
    Repo::new_with_path(self.path()).expect("Could not open repo")
  }
}
