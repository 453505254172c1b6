use crate::ticket::{Ticket, TicketPattern};

const COMMENT_CHAR: char = '#';
const SCISSORS: &str = "------------------------ >8 ------------------------";

/// Read-only view over the text of a commit message file.
#[derive(Debug, Clone, Copy)]
pub struct CommitMessage<'a> {
  raw: &'a str
}

impl<'a> CommitMessage<'a> {
  pub fn new(raw: &'a str) -> Self {
    Self { raw }
  }

  /// Lines git keeps after cleanup: comment lines are skipped and nothing below the scissors line is read.
  pub fn lines(&self) -> impl Iterator<Item = &'a str> {
    self
      .raw
      .lines()
      .take_while(|line| !is_scissors(line))
      .filter(|line| !line.starts_with(COMMENT_CHAR))
  }

  /// First non-blank line.
  pub fn subject(&self) -> Option<&'a str> {
    self.lines().find(|line| !line.trim().is_empty())
  }

  /// Ticket referenced by the message: the last `Ticket:` trailer wins, then the last free-text mention.
  pub fn ticket(&self, pattern: &TicketPattern) -> Option<Ticket> {
    self
      .trailer_ticket(pattern)
      .or_else(|| self.mentioned_ticket(pattern))
  }

  pub fn trailer_ticket(&self, pattern: &TicketPattern) -> Option<Ticket> {
    self
      .lines()
      .filter_map(|line| pattern.from_trailer_line(line))
      .last()
  }

  pub fn mentioned_ticket(&self, pattern: &TicketPattern) -> Option<Ticket> {
    self.lines().filter_map(|line| pattern.last_mention(line)).last()
  }

  /// Ticket the message is already annotated with, either as a trailer or as a subject tag.
  ///
  /// Amend and reword flows run the hook again on a message it already annotated,
  /// so anything found here must be left alone.
  pub fn existing_annotation(&self, pattern: &TicketPattern) -> Option<Ticket> {
    self
      .trailer_ticket(pattern)
      .or_else(|| self.subject().and_then(|subject| pattern.from_leading(subject)))
  }

  /// The message with `DX1234 ` in front of it, the original text kept byte for byte.
  pub fn prefixed(&self, ticket: &Ticket) -> String {
    format!("{} {}", ticket.subject_tag(), self.raw)
  }
}

fn is_scissors(line: &str) -> bool {
  line
    .strip_prefix(COMMENT_CHAR)
    .is_some_and(|rest| rest.trim() == SCISSORS)
}
