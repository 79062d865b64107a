use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::{Command, Output};

/// Trait for executing system commands, allowing for mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments and an explicit set of extra
    /// environment variables, capturing its output
    fn execute_with_env(
        &self,
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
        working_dir: &Path,
    ) -> Result<Output>;
}

/// Real command executor using std::process::Command
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute_with_env(
        &self,
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
        working_dir: &Path,
    ) -> Result<Output> {
        let output = Command::new(command)
            .args(args)
            .envs(env)
            .current_dir(working_dir)
            .output()
            .with_context(|| format!("Failed to execute {}", command))?;

        Ok(output)
    }
}

/// A single invocation recorded by MockCommandExecutor
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct RecordedCommand {
    pub command: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

/// Pre-configured result for a mocked command
#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockCommandResult {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Side effect run when a mocked command executes (e.g. writing output files)
#[cfg(test)]
pub type CommandEffect = Box<dyn Fn(&[String]) + Send + Sync>;

/// Mock command executor for testing
#[cfg(test)]
pub struct MockCommandExecutor {
    outputs: std::sync::Mutex<Vec<MockCommandResult>>,
    calls: std::sync::Mutex<Vec<RecordedCommand>>,
    effect: Option<CommandEffect>,
}

#[cfg(test)]
#[allow(dead_code)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self {
            outputs: std::sync::Mutex::new(Vec::new()),
            calls: std::sync::Mutex::new(Vec::new()),
            effect: None,
        }
    }

    pub fn with_outputs(outputs: Vec<MockCommandResult>) -> Self {
        Self {
            outputs: std::sync::Mutex::new(outputs),
            ..Self::new()
        }
    }

    /// Run `effect` with the call's arguments whenever a command executes
    pub fn with_effect(mut self, effect: CommandEffect) -> Self {
        self.effect = Some(effect);
        self
    }

    /// All invocations seen so far
    pub fn calls(&self) -> Vec<RecordedCommand> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute_with_env(
        &self,
        command: &str,
        args: &[String],
        env: &BTreeMap<String, String>,
        _working_dir: &Path,
    ) -> Result<Output> {
        self.calls.lock().unwrap().push(RecordedCommand {
            command: command.to_string(),
            args: args.to_vec(),
            env: env.clone(),
        });

        if let Some(effect) = &self.effect {
            effect(args);
        }

        let mut outputs = self.outputs.lock().unwrap();

        if let Some(result) = outputs.iter().position(|r| r.command == command) {
            let mock_result = outputs.remove(result);
            return Ok(Output {
                status: create_exit_status(mock_result.exit_code),
                stdout: mock_result.stdout.into_bytes(),
                stderr: mock_result.stderr.into_bytes(),
            });
        }

        // Default: successful empty output
        Ok(Output {
            status: create_exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

#[cfg(test)]
fn create_exit_status(code: i32) -> std::process::ExitStatus {
    // ExitStatus can't be constructed directly; raw unix status keeps the code in the high byte
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}
