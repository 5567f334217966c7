// Runs perccli on the remote host through sshpass + ssh

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

use super::{FetchError, RemoteTarget};
use crate::config::PerccliConfig;

/// Executes one perccli invocation and returns its raw stdout.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, target: &RemoteTarget, args: &str) -> Result<String, FetchError>;
}

#[derive(Debug, Clone)]
pub struct SshRunner {
    perccli_path: String,
    ssh_program: String,
    ssh_options: Vec<String>,
    timeout: Duration,
}

impl SshRunner {
    pub fn new(config: &PerccliConfig) -> Self {
        Self {
            perccli_path: config.path.clone(),
            ssh_program: config.ssh_program.clone(),
            ssh_options: config.ssh_options.clone(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn command(&self, target: &RemoteTarget, args: &str) -> Command {
        let mut cmd = Command::new("sshpass");
        // -e: password comes from SSHPASS, so it never shows up in the process list
        cmd.arg("-e")
            .arg(&self.ssh_program)
            .args(&self.ssh_options)
            .arg(format!("{}@{}", target.username, target.host))
            .arg(format!("{} {}", self.perccli_path, args))
            .env("SSHPASS", &target.password)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for SshRunner {
    async fn run(&self, target: &RemoteTarget, args: &str) -> Result<String, FetchError> {
        let mut cmd = self.command(target, args);
        // Dropping the output future on timeout kills ssh and with it the remote session.
        let output = match timeout(self.timeout, cmd.output()).await {
            Ok(result) => result.map_err(FetchError::Spawn)?,
            Err(_) => {
                tracing::warn!(host = %target.host, args, "perccli timed out; ssh killed");
                return Err(FetchError::Timeout {
                    host: target.host.clone(),
                    secs: self.timeout.as_secs(),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        // perccli exits non-zero for some failures but still prints its JSON status,
        // so only give up here when there is nothing to parse.
        if !output.status.success() && stdout.trim().is_empty() {
            return Err(FetchError::ExitStatus {
                host: target.host.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(stdout)
    }
}
