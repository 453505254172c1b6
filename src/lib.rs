pub mod config;
pub mod filesystem;
pub mod git;
pub mod hook;
pub mod message;
pub mod profiling;
pub mod style;
pub mod ticket;

// Re-exports
pub use profiling::Profile;
pub use ticket::{Ticket, TicketPattern, TICKET_PREFIX};
