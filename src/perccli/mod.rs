// perccli invocation over SSH and response envelope handling

mod runner;
pub mod schema;

pub use runner::{CommandRunner, SshRunner};

use serde_json::Value;
use std::fmt;
use std::time::Instant;
use thiserror::Error;

/// Full controller tree.
pub const SHOW_CONTROLLERS: &str = "/cALL show all J";
/// Every drive on every enclosure of every controller.
pub const SHOW_DRIVES: &str = "/cALL/eALL/sALL show all J";

/// A host to poll and the login used for it.
#[derive(Clone)]
pub struct RemoteTarget {
    pub host: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for RemoteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteTarget")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to spawn ssh: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("perccli on {host} timed out after {secs}s")]
    Timeout { host: String, secs: u64 },

    #[error("ssh to {host} exited with {status}: {stderr}")]
    ExitStatus {
        host: String,
        status: String,
        stderr: String,
    },

    #[error("perccli output is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("perccli output has no controllers")]
    MissingControllers,

    #[error("perccli reported command status {0:?}")]
    CommandFailed(String),
}

/// Validated perccli output: the `Controllers` array of a successful command.
#[derive(Debug, Clone)]
pub struct Response {
    controllers: Vec<Value>,
}

impl Response {
    pub fn controllers(&self) -> &[Value] {
        &self.controllers
    }

    /// `Response Data` of the controller at `position` in the `Controllers` array.
    pub fn response_data(&self, position: usize) -> Option<&Value> {
        self.controllers.get(position)?.get("Response Data")
    }
}

/// Parse stdout and check the tool's own status. Only the first controller's
/// `Command Status` is consulted.
pub fn parse_response(stdout: &str) -> Result<Response, FetchError> {
    let value: Value = serde_json::from_str(stdout)?;
    let controllers = match value.get("Controllers") {
        Some(Value::Array(c)) if !c.is_empty() => c.clone(),
        _ => return Err(FetchError::MissingControllers),
    };
    let status = controllers[0]
        .pointer("/Command Status/Status")
        .and_then(Value::as_str)
        .unwrap_or("<missing>");
    if status != "Success" {
        return Err(FetchError::CommandFailed(status.to_string()));
    }
    Ok(Response { controllers })
}

/// perccli bound to one target for the duration of a scrape.
pub struct Perccli<'a> {
    runner: &'a dyn CommandRunner,
    target: &'a RemoteTarget,
}

impl<'a> Perccli<'a> {
    pub fn new(runner: &'a dyn CommandRunner, target: &'a RemoteTarget) -> Self {
        Self { runner, target }
    }

    pub fn host(&self) -> &str {
        &self.target.host
    }

    pub async fn show_controllers(&self) -> Result<Response, FetchError> {
        self.fetch(SHOW_CONTROLLERS).await
    }

    pub async fn show_drives(&self) -> Result<Response, FetchError> {
        self.fetch(SHOW_DRIVES).await
    }

    async fn fetch(&self, args: &str) -> Result<Response, FetchError> {
        tracing::info!(host = %self.target.host, args, "running perccli");
        let started = Instant::now();
        let stdout = self.runner.run(self.target, args).await?;
        tracing::debug!(
            host = %self.target.host,
            args,
            elapsed_ms = started.elapsed().as_millis() as u64,
            bytes = stdout.len(),
            "perccli finished"
        );
        parse_response(&stdout)
    }
}
