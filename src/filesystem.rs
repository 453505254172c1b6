use std::path::{Path, PathBuf};
use std::{env, fs};
use std::os::unix::fs::symlink as symlink_unix;

use anyhow::{bail, Context, Result};
use git2::{Repository, RepositoryOpenFlags as Flags};

use crate::profile;

/// Error messages for filesystem operations
const ERR_CURRENT_DIR: &str = "Failed to get current directory";

/// Name of the hook binary, installed next to `git-ticket`.
pub const HOOK_BIN_NAME: &str = "git-ticket-hook";

/// Name git looks up in the hooks directory.
pub const HOOK_NAME: &str = "commit-msg";

/// Paths involved in installing the hook into the current repository.
#[derive(Debug, Clone)]
pub struct Filesystem {
  hook_bin_path:  PathBuf,
  git_hooks_path: PathBuf
}

/// A file in the filesystem.
#[derive(Debug, Clone)]
pub struct File {
  path: PathBuf
}

impl File {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  /// True if the file exists, or is a symlink (even a dangling one).
  pub fn exists(&self) -> bool {
    self.path.symlink_metadata().is_ok()
  }

  pub fn delete(&self) -> Result<()> {
    profile!("Delete file");
    log::debug!("Removing file at {}", self);
    fs::remove_file(&self.path).with_context(|| format!("Failed to remove file at {}", self))
  }

  /// Creates a symbolic link at this path pointing to `target`.
  pub fn symlink(&self, target: &File) -> Result<()> {
    profile!("Create symlink");
    log::debug!("Symlinking {} to {}", target, self);
    symlink_unix(&target.path, &self.path).with_context(|| format!("Failed to symlink {} to {}", target, self))
  }

  /// Whether this file is a symlink to `target`, or to any binary named like it.
  pub fn links_to(&self, target: &File) -> bool {
    match fs::read_link(&self.path) {
      Ok(link) => link == target.path || link.file_name() == target.path.file_name(),
      Err(_) => false
    }
  }

  /// Path relative to the current directory.
  pub fn relative_path(&self) -> Result<Dir> {
    let current_dir = env::current_dir().context(ERR_CURRENT_DIR)?;
    let relative = self
      .path
      .strip_prefix(&current_dir)
      .with_context(|| format!("Failed to strip prefix from {}", self.path.display()))?;

    Ok(Dir::new(relative.to_path_buf()))
  }
}

impl std::fmt::Display for File {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self.relative_path() {
      Ok(relative) => write!(f, "{}", relative),
      Err(_) => write!(f, "{}", self.path.display())
    }
  }
}

/// A directory in the filesystem.
#[derive(Debug, Clone)]
pub struct Dir {
  path: PathBuf
}

impl Dir {
  pub fn new(path: PathBuf) -> Self {
    Self { path }
  }

  pub fn exists(&self) -> bool {
    self.path.exists()
  }

  pub fn create_dir_all(&self) -> Result<()> {
    profile!("Create directory recursively");
    log::debug!("Creating directory at {}", self);
    fs::create_dir_all(&self.path).with_context(|| format!("Failed to create directory at {}", self))
  }
}

impl std::fmt::Display for Dir {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.path.display())
  }
}

impl Filesystem {
  /// Locates the repository around the current directory and the hook binary next to the running executable.
  pub fn new() -> Result<Self> {
    profile!("Initialize filesystem");

    let current_dir = env::current_dir().context(ERR_CURRENT_DIR)?;
    let bin_path = env::current_exe().context("Failed to get current executable")?;

    let repo = Repository::open_ext(&current_dir, Flags::empty(), Vec::<&Path>::new())
      .with_context(|| format!("Failed to open repository at {}", current_dir.display()))?;

    let hook_bin_path = {
      let hook_path = bin_path
        .parent()
        .with_context(|| format!("Failed to get parent directory of {}", bin_path.display()))?
        .join(HOOK_BIN_NAME);

      if !hook_path.exists() {
        bail!("Hook binary not found at {}", hook_path.display());
      }
      hook_path
    };

    Ok(Self {
      hook_bin_path,
      git_hooks_path: hooks_dir(&repo, &current_dir)?
    })
  }

  pub fn hook_bin_path(&self) -> File {
    File::new(self.hook_bin_path.clone())
  }

  pub fn git_hooks_path(&self) -> Dir {
    Dir::new(self.git_hooks_path.clone())
  }

  /// Gets the path to the commit-msg hook, failing if the hooks directory is missing.
  pub fn commit_msg_path(&self) -> Result<File> {
    if !self.git_hooks_path.exists() {
      bail!("Hooks directory not found at {}", self.git_hooks_path.display());
    }

    Ok(File::new(self.git_hooks_path.join(HOOK_NAME)))
  }
}

/// `core.hooksPath` when configured, `$GIT_DIR/hooks` otherwise.
pub fn hooks_dir(repo: &Repository, current_dir: &Path) -> Result<PathBuf> {
  let configured = repo
    .config()
    .context("Failed to read git config")?
    .get_path("core.hooksPath")
    .ok();

  let path = match configured {
    Some(path) if path.is_relative() => repo.workdir().unwrap_or(repo.path()).join(path),
    Some(path) => path,
    None => repo.path().join("hooks")
  };

  Ok(if path.is_relative() { current_dir.join(path) } else { path })
}
