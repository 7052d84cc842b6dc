// Clipboard text source backed by an external command (pbpaste, xclip, ...)

use async_trait::async_trait;
use std::time::Duration;
use tokio::process::Command;

use crate::services::watcher::TextSource;
use crate::utils::scan_errors::WatcherError;

const READ_TIMEOUT: Duration = Duration::from_secs(2);

pub struct CommandTextSource {
    program: String,
    args: Vec<String>,
}

impl CommandTextSource {
    /// Split a shell-like command line on whitespace; no quoting support
    pub fn from_command_line(command_line: &str) -> Result<Self, WatcherError> {
        let mut parts = command_line.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| WatcherError::SourceRead("empty clipboard command".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

#[async_trait]
impl TextSource for CommandTextSource {
    async fn read_text(&self) -> Result<String, WatcherError> {
        let mut command = Command::new(&self.program);
        command.args(&self.args).kill_on_drop(true);

        let output = tokio::time::timeout(READ_TIMEOUT, command.output())
            .await
            .map_err(|_| WatcherError::SourceRead(format!("{} timed out", self.program)))?
            .map_err(|e| WatcherError::SourceRead(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            return Err(WatcherError::SourceRead(format!(
                "{} exited with {}",
                self.program, output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
