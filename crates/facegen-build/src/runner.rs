//! External tool invocation.
//!
//! Every subprocess the pipeline launches goes through [`ToolRunner`], so
//! staleness behavior (an unchanged module must launch nothing) is testable
//! without the CAD toolchain installed. The system implementation blocks
//! until the tool exits; there are no timeouts and no retries.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::error::BuildError;

#[derive(Debug, Clone)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl ToolCommand {
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    /// Builds a command from a configured tool prefix (program + leading
    /// arguments, e.g. a flatpak wrapper).
    #[must_use]
    pub fn from_prefix(prefix: &[String]) -> Self {
        let mut parts = prefix.iter();
        let program = parts.next().cloned().unwrap_or_default();
        let mut cmd = Self::new(program);
        cmd.args.extend(parts.cloned());
        cmd
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I: IntoIterator<Item = S>, S: Into<String>>(mut self, args: I) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Shell-style rendering for error messages and logs.
    #[must_use]
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.clone()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub success: bool,
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

pub trait ToolRunner {
    /// Launches the command and waits for it. `Err` means the tool could
    /// not run at all; a nonzero exit is reported in the returned output so
    /// callers can distinguish "failed" from "answered no" (git diff).
    fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, BuildError>;

    /// Launches the command and treats any nonzero exit as fatal, with the
    /// known-benign toolkit warning noise filtered out of the report.
    fn run_checked(&mut self, command: &ToolCommand) -> Result<ToolOutput, BuildError> {
        let output = self.run(command)?;
        if output.success {
            return Ok(output);
        }
        let mut report = filter_tool_noise(&output.stdout);
        let stderr = filter_tool_noise(&output.stderr);
        if !stderr.trim().is_empty() {
            if !report.trim().is_empty() {
                report.push('\n');
            }
            report.push_str(&stderr);
        }
        Err(BuildError::ToolFailed {
            command: command.display(),
            output: report,
        })
    }
}

/// Runs commands on the real system.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&mut self, command: &ToolCommand) -> Result<ToolOutput, BuildError> {
        debug!(command = %command.display(), "running tool");
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args);
        if let Some(cwd) = &command.cwd {
            cmd.current_dir(cwd);
        }
        for (key, value) in &command.env {
            cmd.env(key, value);
        }

        let output = cmd.output().map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                BuildError::MissingTool {
                    program: command.program.clone(),
                }
            } else {
                BuildError::Launch {
                    program: command.program.clone(),
                    source,
                }
            }
        })?;

        Ok(ToolOutput {
            success: output.status.success(),
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Drops GTK session chatter that KiCad and Inkscape print on headless
/// systems; real diagnostics pass through.
#[must_use]
pub fn filter_tool_noise(output: &str) -> String {
    output
        .lines()
        .filter(|line| !line.starts_with("Gtk-Message:"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_splits_program_and_leading_args() {
        let prefix = vec![
            "flatpak".to_string(),
            "run".to_string(),
            "org.kicad.KiCad".to_string(),
        ];
        let cmd = ToolCommand::from_prefix(&prefix).arg("fab");
        assert_eq!(cmd.program, "flatpak");
        assert_eq!(cmd.args, vec!["run", "org.kicad.KiCad", "fab"]);
        assert_eq!(cmd.display(), "flatpak run org.kicad.KiCad fab");
    }

    #[test]
    fn gtk_noise_is_filtered() {
        let noisy = "Gtk-Message: Failed to load module\nreal error";
        assert_eq!(filter_tool_noise(noisy), "real error");
    }

    struct FailingRunner;
    impl ToolRunner for FailingRunner {
        fn run(&mut self, _command: &ToolCommand) -> Result<ToolOutput, BuildError> {
            Ok(ToolOutput {
                success: false,
                code: Some(2),
                stdout: "Gtk-Message: noise\n".to_string(),
                stderr: "boom".to_string(),
            })
        }
    }

    #[test]
    fn run_checked_reports_filtered_output() {
        let err = FailingRunner
            .run_checked(&ToolCommand::new("inkscape"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("inkscape"));
        assert!(message.contains("boom"));
        assert!(!message.contains("Gtk-Message"));
    }
}
