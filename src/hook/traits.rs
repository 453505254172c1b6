use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::git::GitError;

pub trait FilePath {
  fn write(&self, msg: String) -> Result<()>;
  fn read(&self) -> Result<String>;
}

impl FilePath for PathBuf {
  fn write(&self, msg: String) -> Result<()> {
    fs::write(self, msg).with_context(|| format!("Failed to write commit message file {}", self.display()))
  }

  fn read(&self) -> Result<String> {
    fs::read_to_string(self).with_context(|| format!("Failed to read commit message file {}", self.display()))
  }
}

/// The two things the hook needs from git.
pub trait TicketRepository {
  /// Short name of the current branch, or `None` when it cannot be determined (detached HEAD included).
  fn current_branch(&self) -> Option<String>;

  /// Adds a `key:value` trailer to the message file in place, keeping existing trailers.
  fn append_trailer(&self, file: &Path, key: &str, value: &str) -> Result<(), GitError>;
}
