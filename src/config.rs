use serde::Deserialize;

/// Routes served besides the metrics path.
const RESERVED_PATHS: [&str; 2] = ["/version", "/api/interfaces"];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub paths: PathsConfig,
    pub docker: DockerConfig,
    pub commands: CommandsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub metrics_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 9551,
            host: "0.0.0.0".into(),
            metrics_path: "/metrics".into(),
        }
    }
}

/// Host mount points. Inside a container these are typically `/host/proc` and `/host`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub procfs: String,
    /// Host root filesystem. Anything other than `/` makes subprocesses run under chroot
    /// and moves sysfs to `<rootfs>/sys`.
    pub rootfs: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            procfs: "/proc".into(),
            rootfs: "/".into(),
        }
    }
}

impl PathsConfig {
    pub fn is_chrooted(&self) -> bool {
        !self.rootfs.is_empty() && self.rootfs != "/"
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DockerConfig {
    pub socket: String,
    /// Per-request timeout against the engine API.
    pub timeout_secs: u64,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            socket: "/var/run/docker.sock".into(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// Upper bound for each midclt/virsh invocation; the child is killed past it.
    pub timeout_secs: u64,
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self { timeout_secs: 5 }
    }
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.host.is_empty(),
            "server.host must be non-empty"
        );
        anyhow::ensure!(
            self.server.metrics_path.starts_with('/') && self.server.metrics_path.len() > 1,
            "server.metrics_path must start with '/' and name a path, got {:?}",
            self.server.metrics_path
        );
        anyhow::ensure!(
            !RESERVED_PATHS.contains(&self.server.metrics_path.as_str()),
            "server.metrics_path {:?} collides with a built-in route",
            self.server.metrics_path
        );
        anyhow::ensure!(
            !self.paths.procfs.is_empty(),
            "paths.procfs must be non-empty"
        );
        anyhow::ensure!(
            !self.docker.socket.is_empty(),
            "docker.socket must be non-empty"
        );
        anyhow::ensure!(
            self.docker.timeout_secs > 0,
            "docker.timeout_secs must be > 0, got {}",
            self.docker.timeout_secs
        );
        anyhow::ensure!(
            self.commands.timeout_secs > 0,
            "commands.timeout_secs must be > 0, got {}",
            self.commands.timeout_secs
        );
        Ok(())
    }
}
