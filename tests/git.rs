mod common;

use std::path::PathBuf;

use common::TestRepo;
use tempfile::TempDir;
use ticket::filesystem::hooks_dir;
use ticket::git::Repo;
use ticket::hook::traits::TicketRepository;

#[test]
fn test_branch_on_unborn_repository() {
  let repository = TestRepo::default();
  repository.checkout_new_branch("DX-4821-refactor");

  let branch = repository.repo().branch().unwrap();
  assert_eq!(branch.as_deref(), Some("DX-4821-refactor"));
}

#[test]
fn test_branch_after_commit() {
  let repository = TestRepo::default();
  repository.checkout_new_branch("feature/login");
  repository.commit_empty("Initial commit");

  assert_eq!(repository.repo().current_branch().as_deref(), Some("feature/login"));
}

#[test]
fn test_detached_head_has_no_branch() {
  let repository = TestRepo::default();
  repository.detach_head();

  assert_eq!(repository.repo().branch().unwrap(), None);
  assert_eq!(repository.repo().current_branch(), None);
}

#[test]
fn test_opening_outside_a_repository_fails() {
  let dir = TempDir::new().unwrap();
  let path = dir.path().join("not-a-repo");
  std::fs::create_dir(&path).unwrap();
  assert!(Repo::new_with_path(&path).is_err());
}

#[test]
fn test_append_trailer_keeps_existing_trailers() {
  let repository = TestRepo::default();
  let file = repository.message_file("Fix crash\n\nSigned-off-by: Your Name <email@example.com>\n");

  repository.repo().append_trailer(&file, "Ticket", "DX-12").unwrap();

  let message = repository.read(&file);
  let signed_off = message.find("Signed-off-by: Your Name <email@example.com>").unwrap();
  let ticket = message.find("Ticket: DX-12").unwrap();
  assert!(message.starts_with("Fix crash\n"));
  assert!(signed_off < ticket);
}

#[test]
fn test_append_trailer_missing_file() {
  let repository = TestRepo::default();
  let file = repository.path().join("missing");
  assert!(repository.repo().append_trailer(&file, "Ticket", "DX-12").is_err());
}

#[test]
fn test_hooks_dir_defaults_to_git_dir() {
  let repository = TestRepo::default();
  let repo = git2::Repository::open(repository.path()).unwrap();

  let dir = hooks_dir(&repo, repository.path()).unwrap();
  assert_eq!(dir, repo.path().join("hooks"));
}

#[test]
fn test_hooks_dir_respects_core_hooks_path() {
  let repository = TestRepo::default();
  repository.git(&["config", "core.hooksPath", ".githooks"]);
  let repo = git2::Repository::open(repository.path()).unwrap();

  let dir = hooks_dir(&repo, repository.path()).unwrap();
  let expected: PathBuf = repo.workdir().unwrap().join(".githooks");
  assert_eq!(dir, expected);
}
