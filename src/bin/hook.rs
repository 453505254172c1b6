// Hook: commit-msg
//
// Advisory only: every path through this binary ends with exit code 0.

use clap::error::ErrorKind;
use clap::Parser;
use ticket::config::{App, Strategy};
use ticket::git::Repo;
use ticket::hook::{self, Args, HookError, Outcome};
use ticket::style::print_hook_warning;
use ticket::Profile;

fn main() {
  env_logger::init();
  let _profile = Profile::new("commit-msg hook");

  let args = match Args::try_parse() {
    Ok(args) => args,
    Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
      let _ = err.print();
      return;
    },
    Err(err) => {
      let reason = err.to_string();
      let reason = reason.lines().next().unwrap_or_default().trim_start_matches("error: ");
      print_hook_warning(&format!("Unable to parse commit-msg hook arguments: {reason}"));
      return;
    },
  };

  let strategy = args.strategy.unwrap_or_else(configured_strategy);

  let result = hook::catch_panics(|| {
    let repo = Repo::from_env();
    hook::run(&args, &repo, strategy)
  });

  match result {
    Ok(Ok(outcome)) => report(&outcome),
    Ok(Err(err @ HookError::MissingMessageFile)) => print_hook_warning(&err.to_string()),
    Ok(Err(err)) => print_hook_warning(&format!("Error in commit-msg hook: {err:#}")),
    Err(message) => print_hook_warning(&format!("Unknown error in commit-msg hook {message}"))
  }
}

fn configured_strategy() -> Strategy {
  App::new()
    .and_then(|app| app.strategy())
    .unwrap_or_else(|err| {
      log::warn!("Falling back to the default strategy: {:#}", err);
      Strategy::default()
    })
}

fn report(outcome: &Outcome) {
  match outcome {
    Outcome::Annotated { ticket, source, strategy } => {
      log::info!("Tagged commit with {} from {:?} ({})", ticket, source, strategy);
    },
    Outcome::AlreadyTagged(ticket) => {
      log::info!("Commit message already references {}", ticket);
    },
    Outcome::NoTicket { .. } => {
      if let Some(warning) = outcome.warning() {
        print_hook_warning(&warning);
      }
    },
  }
}
