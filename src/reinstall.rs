use anyhow::Result;
use colored::*;
use console::Emoji;
use ticket::filesystem::Filesystem;

const EMOJI: Emoji<'_, '_> = Emoji("🔗", "");

pub fn run() -> Result<()> {
  let fs = Filesystem::new()?;

  if !fs.git_hooks_path().exists() {
    fs.git_hooks_path().create_dir_all()?;
  }

  let hook_bin = fs.hook_bin_path();
  let hook_file = fs.commit_msg_path()?;

  if hook_file.exists() {
    log::debug!("Removing existing hook file: {}", hook_file);
    hook_file.delete()?;
  }

  hook_file.symlink(&hook_bin)?;

  println!("{EMOJI} Hook symlinked successfully to {}", hook_file.to_string().italic());

  Ok(())
}
