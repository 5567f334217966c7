// Per-target SSH logins from the YAML credentials file

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

use crate::perccli::RemoteTarget;

#[derive(Clone, Deserialize)]
pub struct TargetCredentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for TargetCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TargetCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// ```yaml
/// targets:
///   esxi01.lan:
///     username: root
///     password: secret
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    targets: HashMap<String, TargetCredentials>,
}

impl Credentials {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading credentials file {}", path))?;
        Self::load_from_str(&s).with_context(|| format!("parsing credentials file {}", path))
    }

    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let credentials: Credentials = serde_yaml::from_str(s)?;
        for (host, login) in &credentials.targets {
            anyhow::ensure!(
                !login.username.is_empty(),
                "targets.{}.username must be non-empty",
                host
            );
        }
        Ok(credentials)
    }

    pub fn lookup(&self, target: &str) -> Option<&TargetCredentials> {
        self.targets.get(target)
    }

    /// Remote target for `host`, or `None` when no login is stored for it.
    pub fn target(&self, host: &str) -> Option<RemoteTarget> {
        self.lookup(host).map(|login| RemoteTarget {
            host: host.to_string(),
            username: login.username.clone(),
            password: login.password.clone(),
        })
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}
