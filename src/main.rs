mod install;
mod reinstall;
mod uninstall;

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use colored::Colorize;
use log::{debug, LevelFilter};
use ticket::config::{App, Strategy};
use ticket::git::Repo;
use ticket::{TicketPattern, TICKET_PREFIX};

fn cli() -> Command {
  Command::new("git-ticket")
    .about("A git extension that tags every commit with the ticket from the branch name")
    .version(env!("CARGO_PKG_VERSION"))
    .subcommand_required(true)
    .arg_required_else_help(true)
    .arg(
      Arg::new("verbose")
        .short('v')
        .long("verbose")
        .global(true)
        .action(ArgAction::SetTrue)
        .help("Enables verbose logging")
    )
    .subcommand(Command::new("install").about("Installs the git-ticket commit-msg hook"))
    .subcommand(Command::new("uninstall").about("Uninstalls the git-ticket commit-msg hook"))
    .subcommand(Command::new("reinstall").about("Replaces any existing commit-msg hook with git-ticket's"))
    .subcommand(Command::new("current").about("Prints the ticket for the current branch"))
    .subcommand(
      Command::new("config")
        .about("Sets or resets configuration options")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
          Command::new("strategy").about("How the ticket is added to the message").arg(
            Arg::new("value")
              .required(true)
              .value_parser(value_parser!(Strategy))
          )
        )
        .subcommand(Command::new("reset").about("Resets the configuration to defaults"))
    )
}

fn init_logging(args: &ArgMatches) {
  if args.get_flag("verbose") {
    env_logger::builder()
      .filter_level(LevelFilter::Debug)
      .format_target(false)
      .format_timestamp(None)
      .init();
    debug!("Verbose logging enabled");
  } else {
    env_logger::init();
  }
}

fn current() -> Result<()> {
  let pattern = TicketPattern::new(TICKET_PREFIX)?;

  let repo = Repo::try_from_env().context("Not inside a git repository")?;

  match repo.branch()? {
    Some(branch) => match pattern.from_branch(&branch) {
      Some(ticket) => println!("{}", ticket.to_string().green()),
      None => println!("Branch '{}' does not start with {}[NUMBER]", branch.italic(), TICKET_PREFIX)
    },
    None => println!("HEAD is detached; the hook will look for {}[NUMBER] in the commit message", TICKET_PREFIX)
  }

  Ok(())
}

fn config(args: &ArgMatches) -> Result<()> {
  match args.subcommand() {
    Some(("strategy", args)) => {
      let value = args.get_one::<Strategy>("value").copied().unwrap_or_default();
      App::new()?.update_strategy(value)
    },
    Some(("reset", _)) => App::reset(),
    _ => Ok(())
  }
}

fn main() -> Result<()> {
  let args = cli().get_matches();
  init_logging(&args);

  match args.subcommand() {
    Some(("install", _)) => {
      install::run()?;
    },
    Some(("uninstall", _)) => {
      uninstall::run()?;
    },
    Some(("reinstall", _)) => {
      reinstall::run()?;
    },
    Some(("current", _)) => {
      current()?;
    },
    Some(("config", args)) => {
      config(args)?;
    },
    _ => {
      debug!("No subcommand given");
    }
  }

  Ok(())
}
