//! Ticket identifiers and the patterns used to recognise them in branch names and commit messages.

use std::fmt;

use regex::{Regex, RegexBuilder};

/// Prefix of every ticket in the issue tracker. Change it here and rebuild.
pub const TICKET_PREFIX: &str = "DX-";

/// Key of the trailer written by the trailer strategy.
pub const TRAILER_KEY: &str = "Ticket";

/// A ticket number together with the prefix it was found under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
  prefix: String,
  number: String
}

impl Ticket {
  pub fn new(prefix: &str, number: impl Into<String>) -> Self {
    Self { prefix: prefix.to_uppercase(), number: number.into() }
  }

  pub fn number(&self) -> &str {
    &self.number
  }

  /// `DX-1234`, the value of the `Ticket:` trailer.
  pub fn trailer_value(&self) -> String {
    format!("{}{}", self.prefix, self.number)
  }

  /// `DX1234`, the tag put in front of the subject line.
  pub fn subject_tag(&self) -> String {
    format!("{}{}", bare_prefix(&self.prefix), self.number)
  }
}

impl fmt::Display for Ticket {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{}", self.prefix, self.number)
  }
}

/// Compiled matchers for one ticket prefix.
///
/// All patterns are case-insensitive, so a branch named `dx-12-fix` yields ticket `12`
/// just like `DX-12-fix` does.
#[derive(Debug, Clone)]
pub struct TicketPattern {
  prefix:  String,
  branch:  Regex,
  trailer: Regex,
  mention: Regex,
  leading: Regex
}

impl TicketPattern {
  pub fn new(prefix: &str) -> Result<Self, regex::Error> {
    let escaped = regex::escape(prefix);
    let bare = regex::escape(bare_prefix(prefix));
    let leading = if bare.is_empty() || bare == escaped {
      format!(r"^\s*{escaped}(\d+)")
    } else {
      format!(r"^\s*(?:{escaped}|{bare})(\d+)")
    };

    Ok(Self {
      prefix:  prefix.to_string(),
      branch:  case_insensitive(&format!(r"^{escaped}(\d+).*"))?,
      trailer: case_insensitive(&format!(r"^\s*{TRAILER_KEY}:\s*{escaped}(\d+)\s*$"))?,
      mention: case_insensitive(&format!(r"{escaped}(\d+)"))?,
      leading: case_insensitive(&leading)?
    })
  }

  /// Ticket encoded at the start of a branch name, e.g. `DX-1234-fix-bug`.
  pub fn from_branch(&self, branch: &str) -> Option<Ticket> {
    self.capture(&self.branch, branch.trim())
  }

  /// Ticket from a `Ticket: DX-1234` trailer line.
  pub fn from_trailer_line(&self, line: &str) -> Option<Ticket> {
    self.capture(&self.trailer, line)
  }

  /// Last free-text mention of a ticket on a single line.
  pub fn last_mention(&self, line: &str) -> Option<Ticket> {
    self
      .mention
      .captures_iter(line)
      .last()
      .and_then(|caps| caps.get(1))
      .map(|number| self.ticket(number.as_str()))
  }

  /// Ticket tag at the very start of a subject line, either `DX-1234` or `DX1234`.
  pub fn from_leading(&self, line: &str) -> Option<Ticket> {
    self.capture(&self.leading, line)
  }

  fn capture(&self, regex: &Regex, haystack: &str) -> Option<Ticket> {
    regex
      .captures(haystack)
      .and_then(|caps| caps.get(1))
      .map(|number| self.ticket(number.as_str()))
  }

  fn ticket(&self, number: &str) -> Ticket {
    Ticket::new(&self.prefix, number)
  }
}

/// The prefix without its trailing separator: `DX-` becomes `DX`.
fn bare_prefix(prefix: &str) -> &str {
  prefix.trim_end_matches(|c: char| !c.is_alphanumeric())
}

fn case_insensitive(pattern: &str) -> Result<Regex, regex::Error> {
  RegexBuilder::new(pattern).case_insensitive(true).build()
}
