// Hook: commit-msg
pub mod traits;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;

use clap::Parser;
use log::debug;
use thiserror::Error;

use crate::config::Strategy;
use crate::git::GitError;
use crate::hook::traits::{FilePath, TicketRepository};
use crate::message::CommitMessage;
use crate::ticket::{Ticket, TicketPattern, TICKET_PREFIX, TRAILER_KEY};

#[derive(Parser, Debug, Default)]
#[command(author, version, about = "Adds the ticket from the branch name to the commit message", long_about = None)]
pub struct Args {
  /// Commit message file, passed by git
  #[arg(required = false)]
  pub commit_msg_file: Option<PathBuf>,

  /// Overrides the configured annotation strategy
  #[arg(long, value_enum)]
  pub strategy: Option<Strategy>
}

#[derive(Error, Debug)]
pub enum HookError {
  #[error("Unable to determine git commit message file.")]
  MissingMessageFile,

  #[error("Invalid ticket pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("Failed to append ticket trailer: {0}")]
  Trailer(#[from] GitError),

  #[error(transparent)]
  Anyhow(#[from] anyhow::Error)
}

/// Where a ticket was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
  Branch,
  Message
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The message was rewritten to carry `ticket`.
  Annotated {
    ticket:   Ticket,
    source:   Source,
    strategy: Strategy
  },

  /// The message already carried a ticket and was left untouched.
  AlreadyTagged(Ticket),

  /// Neither the branch nor the message named a ticket.
  NoTicket { branch: Option<String> }
}

impl Outcome {
  /// What to tell the user, if anything.
  pub fn warning(&self) -> Option<String> {
    let Outcome::NoTicket { branch } = self else {
      return None;
    };

    let expected = format!("{TICKET_PREFIX}[NUMBER]");
    Some(match branch {
      Some(branch) => format!(
        "Your branch needs to start with {expected} or the commit message must mention {expected}, found '{branch}'"
      ),
      None => format!("Unable to determine the current branch and the commit message does not mention {expected}")
    })
  }
}

/// Picks the ticket for this commit. The branch wins over the message.
pub fn resolve(branch: Option<&str>, message: &CommitMessage, pattern: &TicketPattern) -> Option<(Ticket, Source)> {
  branch
    .and_then(|branch| pattern.from_branch(branch))
    .map(|ticket| (ticket, Source::Branch))
    .or_else(|| message.ticket(pattern).map(|ticket| (ticket, Source::Message)))
}

pub fn run(args: &Args, repo: &impl TicketRepository, strategy: Strategy) -> Result<Outcome, HookError> {
  let path = args
    .commit_msg_file
    .as_ref()
    .ok_or(HookError::MissingMessageFile)?;

  let pattern = TicketPattern::new(TICKET_PREFIX)?;
  let contents = path.read()?;
  let message = CommitMessage::new(&contents);

  if let Some(ticket) = message.existing_annotation(&pattern) {
    debug!("[hook] Message already references {}", ticket);
    return Ok(Outcome::AlreadyTagged(ticket));
  }

  let branch = repo.current_branch();
  let Some((ticket, source)) = resolve(branch.as_deref(), &message, &pattern) else {
    debug!("[hook] No ticket found (branch: {:?})", branch);
    return Ok(Outcome::NoTicket { branch });
  };

  debug!("[hook] Using {} from {:?} with the {} strategy", ticket, source, strategy);

  match strategy {
    Strategy::Trailer => repo.append_trailer(path, TRAILER_KEY, &ticket.trailer_value())?,
    Strategy::Prefix => path.write(message.prefixed(&ticket))?
  }

  Ok(Outcome::Annotated { ticket, source, strategy })
}

/// Runs `f`, turning a panic into its message.
///
/// The default panic report is replaced by a debug log for the duration of the call,
/// so stderr only ever carries the hook's own warnings.
pub fn catch_panics<T>(f: impl FnOnce() -> T) -> Result<T, String> {
  let previous = panic::take_hook();
  panic::set_hook(Box::new(|info| debug!("[hook] {}", info)));

  // git2 handles are not unwind safe, but nothing is reused after a panic
  let result = panic::catch_unwind(AssertUnwindSafe(f));
  panic::set_hook(previous);

  result.map_err(|payload| panic_message(&*payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  payload
    .downcast_ref::<&str>()
    .map(|message| message.to_string())
    .or_else(|| payload.downcast_ref::<String>().cloned())
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_branch_wins_over_message() {
    let pattern = TicketPattern::new(TICKET_PREFIX).unwrap();
    let message = CommitMessage::new("Fix DX-2");
    let (ticket, source) = resolve(Some("DX-1-fix"), &message, &pattern).unwrap();
    assert_eq!(ticket.number(), "1");
    assert_eq!(source, Source::Branch);
  }

  #[test]
  fn test_message_fallback() {
    let pattern = TicketPattern::new(TICKET_PREFIX).unwrap();
    let message = CommitMessage::new("Fix DX-2");
    let (ticket, source) = resolve(Some("feature/login"), &message, &pattern).unwrap();
    assert_eq!(ticket.number(), "2");
    assert_eq!(source, Source::Message);
  }

  #[test]
  fn test_warning_names_expected_format() {
    let outcome = Outcome::NoTicket { branch: Some("feature/login".to_string()) };
    let warning = outcome.warning().unwrap();
    assert!(warning.contains("DX-[NUMBER]"));
    assert!(warning.contains("'feature/login'"));

    let outcome = Outcome::NoTicket { branch: None };
    assert!(outcome.warning().unwrap().contains("DX-[NUMBER]"));
  }

  #[test]
  fn test_catch_panics_returns_message() {
    let result: Result<(), String> = catch_panics(|| panic!("index out of bounds"));
    assert_eq!(result, Err("index out of bounds".to_string()));

    let result: Result<(), String> = catch_panics(|| panic!("branch {} vanished", "DX-1"));
    assert_eq!(result, Err("branch DX-1 vanished".to_string()));
  }

  #[test]
  fn test_catch_panics_passes_value_through() {
    assert_eq!(catch_panics(|| 42), Ok(42));
  }

  #[test]
  fn test_no_warning_when_annotated() {
    let outcome = Outcome::AlreadyTagged(Ticket::new(TICKET_PREFIX, "1"));
    assert_eq!(outcome.warning(), None);
  }
}
