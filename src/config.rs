use std::fmt;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use config::{Config, Environment, FileFormat, Map};
use console::Emoji;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

// Constants
const DEFAULT_STRATEGY: &str = "trailer";
const ENV_PREFIX: &str = "TICKET";

/// How the ticket ends up in the commit message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
  /// Append a `Ticket: DX-1234` trailer
  #[default]
  Trailer,
  /// Put `DX1234 ` in front of the message
  Prefix
}

impl fmt::Display for Strategy {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Strategy::Trailer => write!(f, "trailer"),
      Strategy::Prefix => write!(f, "prefix")
    }
  }
}

#[derive(Debug, Default, Deserialize, PartialEq, Eq, Serialize)]
pub struct App {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub strategy: Option<String>
}

#[derive(Debug)]
pub struct ConfigPaths {
  pub dir:  PathBuf,
  pub file: PathBuf
}

lazy_static! {
  static ref PATHS: Option<ConfigPaths> = ConfigPaths::new();
}

impl ConfigPaths {
  fn new() -> Option<Self> {
    let dir = home::home_dir()?.join(".config/git-ticket");
    let file = dir.join("config.ini");
    Some(Self { dir, file })
  }

  fn ensure_exists(&self) -> Result<()> {
    if !self.dir.exists() {
      std::fs::create_dir_all(&self.dir).with_context(|| format!("Failed to create config directory at {:?}", self.dir))?;
    }
    Ok(())
  }
}

fn paths() -> Result<&'static ConfigPaths> {
  PATHS.as_ref().context("Failed to determine home directory")
}

impl App {
  /// Loads the user config file, then `TICKET_*` environment variables on top of it.
  pub fn new() -> Result<Self> {
    let file = PATHS.as_ref().map(|paths| paths.file.as_path());
    Self::load(file, None)
  }

  /// Like [`App::new`], reading from `file` and, when given, from `env` instead of the process environment.
  pub fn load(file: Option<&Path>, env: Option<Map<String, String>>) -> Result<Self> {
    let mut builder = Config::builder().set_default("strategy", DEFAULT_STRATEGY)?;

    if let Some(file) = file {
      builder = builder.add_source(config::File::new(file.to_string_lossy().as_ref(), FileFormat::Ini).required(false));
    }

    let config = builder
      .add_source(Environment::with_prefix(ENV_PREFIX).source(env))
      .build()?;

    config
      .try_deserialize()
      .context("Failed to deserialize existing config. Please run `git ticket config reset` and try again")
  }

  pub fn strategy(&self) -> Result<Strategy> {
    match &self.strategy {
      Some(value) => Strategy::from_str(value.trim(), true)
        .map_err(|_| anyhow::anyhow!("Unknown strategy '{}', expected 'trailer' or 'prefix'", value)),
      None => Ok(Strategy::default())
    }
  }

  pub fn save(&self) -> Result<()> {
    let paths = paths()?;
    paths.ensure_exists()?;
    self.save_to(&paths.file)
  }

  pub fn save_to(&self, path: &Path) -> Result<()> {
    let contents = serde_ini::to_string(&self).context(format!("Failed to serialize config: {:?}", self))?;
    let mut file = File::create(path).with_context(|| format!("Failed to create config file at {:?}", path))?;
    file
      .write_all(contents.as_bytes())
      .context("Failed to write config file")
  }

  pub fn update_strategy(&mut self, value: Strategy) -> Result<()> {
    self.strategy = Some(value.to_string());
    self.save_with_message("strategy")
  }

  pub fn reset() -> Result<()> {
    App::default().save_with_message("defaults")
  }

  fn save_with_message(&self, option: &str) -> Result<()> {
    println!("{} Configuration option {} updated!", Emoji("✨", ":-)"), option);
    self.save()
  }
}
