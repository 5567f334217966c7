// TOML app config with environment overrides

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub perccli: PerccliConfig,
    pub credentials: CredentialsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 10424,
            host: "0.0.0.0".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PerccliConfig {
    /// perccli binary on the remote host.
    pub path: String,
    /// Upper bound for one remote invocation; ssh is killed when it expires.
    pub timeout_secs: u64,
    pub ssh_program: String,
    /// Extra arguments passed to ssh before the destination, e.g. `["-o", "StrictHostKeyChecking=no"]`.
    pub ssh_options: Vec<String>,
}

impl Default for PerccliConfig {
    fn default() -> Self {
        Self {
            path: "/opt/lsi/perccli/perccli".into(),
            timeout_secs: 60,
            ssh_program: "ssh".into(),
            ssh_options: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    /// YAML file with per-target logins.
    pub file: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            file: "config.yaml".into(),
        }
    }
}

impl AppConfig {
    /// Reads `CONFIG_FILE` (default `config.toml`, optional when not set explicitly),
    /// then applies `PORT`, `PERCCLI_FILE_PATH` and `CONFIG_FILE_PATH` overrides.
    pub fn load() -> anyhow::Result<Self> {
        let mut config: AppConfig = match std::env::var("CONFIG_FILE") {
            Ok(path) => {
                let s = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading config file {}", path))?;
                toml::from_str(&s)?
            }
            Err(_) => match std::fs::read_to_string("config.toml") {
                Ok(s) => toml::from_str(&s)?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
                Err(e) => return Err(e).context("reading config.toml"),
            },
        };
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(port) = std::env::var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", port))?;
        }
        if let Ok(path) = std::env::var("PERCCLI_FILE_PATH") {
            self.perccli.path = path;
        }
        if let Ok(path) = std::env::var("CONFIG_FILE_PATH") {
            self.credentials.file = path;
        }
        Ok(())
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.perccli.path.is_empty(),
            "perccli.path must be non-empty"
        );
        anyhow::ensure!(
            self.perccli.timeout_secs > 0,
            "perccli.timeout_secs must be > 0, got {}",
            self.perccli.timeout_secs
        );
        anyhow::ensure!(
            !self.perccli.ssh_program.is_empty(),
            "perccli.ssh_program must be non-empty"
        );
        anyhow::ensure!(
            !self.credentials.file.is_empty(),
            "credentials.file must be non-empty"
        );
        Ok(())
    }
}
