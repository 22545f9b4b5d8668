//! ImageMagick invocation.

use std::ffi::OsString;
use std::path::PathBuf;

use cloudmaker_registry::OperationError;
use tokio::process::Command;
use tracing::debug;

/// How to reach the ImageMagick `convert` tool and where to keep scratch files.
#[derive(Debug, Clone, PartialEq)]
pub struct MagickConfig {
  /// Executable to run, e.g. `convert` or `magick`.
  pub program: PathBuf,

  /// Arguments placed before the operation's own arguments,
  /// e.g. `["convert"]` for ImageMagick 7's `magick convert`.
  pub leading_args: Vec<OsString>,

  /// Directory for downloaded and rendered files.
  pub temp_dir: PathBuf,
}

impl Default for MagickConfig {
  fn default() -> Self {
    Self {
      program: PathBuf::from("convert"),
      leading_args: Vec::new(),
      temp_dir: std::env::temp_dir(),
    }
  }
}

impl MagickConfig {
  /// Build a config from a command line such as `"magick convert"`.
  ///
  /// Returns `None` for a blank command.
  pub fn from_command(command: &str) -> Option<Self> {
    let mut parts = command.split_whitespace();
    let program = PathBuf::from(parts.next()?);
    Some(Self {
      program,
      leading_args: parts.map(OsString::from).collect(),
      ..Self::default()
    })
  }

  pub fn with_temp_dir(mut self, temp_dir: impl Into<PathBuf>) -> Self {
    self.temp_dir = temp_dir.into();
    self
  }

  /// Run the tool with the given arguments.
  pub async fn run(&self, args: &[OsString]) -> Result<(), OperationError> {
    debug!(program = %self.program.display(), args = ?args, "running image tool");

    let output = Command::new(&self.program)
      .args(&self.leading_args)
      .args(args)
      .kill_on_drop(true)
      .output()
      .await?;

    if output.status.success() {
      Ok(())
    } else {
      Err(OperationError::Tool {
        program: self.program.display().to_string(),
        status: output.status.to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
      })
    }
  }
}
