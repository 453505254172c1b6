use std::path::Path;
use std::process::{Command, ExitStatus};

use git2::{ErrorCode, Repository, RepositoryOpenFlags as Flag};
use log::debug;
use thiserror::Error;

use crate::hook::traits::TicketRepository;

#[derive(Error, Debug)]
pub enum GitError {
  #[error("Git error: {0}")]
  Git(#[from] git2::Error),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("git interpret-trailers exited with {status}: {stderr}")]
  InterpretTrailers { status: ExitStatus, stderr: String }
}

pub type Result<T, E = GitError> = std::result::Result<T, E>;

/// The repository the hook runs in.
///
/// Opening may fail (for instance when the hook is invoked by hand outside a work tree);
/// branch lookups then report no branch and trailers are still written by `git` itself.
pub struct Repo {
  repo: Option<Repository>
}

impl Repo {
  /// Opens the repository described by `GIT_DIR` and friends, or the one around the current directory.
  pub fn try_from_env() -> Result<Self> {
    Ok(Repo { repo: Some(Repository::open_from_env()?) })
  }

  /// Like [`Repo::try_from_env`], but a missing repository only means there is no branch to read.
  pub fn from_env() -> Self {
    Self::try_from_env().unwrap_or_else(|err| {
      debug!("[repo] No repository found: {}", err);
      Self { repo: None }
    })
  }

  pub fn new_with_path(path: impl AsRef<Path>) -> Result<Self> {
    Ok(Repo {
      repo: Some(Repository::open_ext(path.as_ref(), Flag::empty(), Vec::<&Path>::new())?)
    })
  }

  /// Short name of the checked-out branch.
  ///
  /// `Ok(None)` means HEAD is detached. An unborn branch still has a name and is reported,
  /// matching `git symbolic-ref --short HEAD`.
  pub fn branch(&self) -> Result<Option<String>> {
    let Some(repo) = &self.repo else {
      return Ok(None);
    };

    match repo.head() {
      Ok(head) if head.is_branch() => Ok(head.shorthand().map(str::to_string)),
      Ok(_) => Ok(None),
      Err(err) if err.code() == ErrorCode::UnbornBranch => {
        let head = repo.find_reference("HEAD")?;
        Ok(
          head
            .symbolic_target()
            .and_then(|target| target.strip_prefix("refs/heads/"))
            .map(str::to_string)
        )
      },
      Err(err) => Err(err.into())
    }
  }

  fn workdir(&self) -> Option<&Path> {
    self.repo.as_ref().and_then(Repository::workdir)
  }
}

impl TicketRepository for Repo {
  fn current_branch(&self) -> Option<String> {
    match self.branch() {
      Ok(branch) => {
        debug!("[repo] Current branch: {:?}", branch);
        branch
      },
      Err(err) => {
        debug!("[repo] Could not determine current branch: {}", err);
        None
      },
    }
  }

  fn append_trailer(&self, file: &Path, key: &str, value: &str) -> Result<()> {
    // git resolves the file against its own working directory
    let file = file.canonicalize()?;
    let trailer = format!("{key}:{value}");
    debug!("[trailer] Appending {} to {}", trailer, file.display());

    let mut command = Command::new("git");
    command
      .arg("interpret-trailers")
      .arg("--in-place")
      .arg("--trailer")
      .arg(&trailer)
      .arg(&file);

    if let Some(workdir) = self.workdir() {
      command.current_dir(workdir);
    }

    let output = command.output()?;
    if !output.status.success() {
      return Err(GitError::InterpretTrailers {
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string()
      });
    }

    Ok(())
  }
}
