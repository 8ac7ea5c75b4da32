use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level service configuration.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfigInner {
    pub server: ServerConfig,
    pub dataset: DatasetConfig,
    pub profiler: ProfilerConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(flatten, default)]
    inner: Arc<ApiConfigInner>,
}

impl Deref for ApiConfig {
    type Target = ApiConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for ApiConfig {
    fn deref_mut(&mut self) -> &mut ApiConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Upper bound for draining open connections after a shutdown signal.
    pub shutdown_timeout_secs: u64,
}

/// Size of the synthetic user collection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub size: u32,
}

/// Process-lifetime CPU profiler.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    pub enabled: bool,
    /// Samples per second.
    pub frequency: i32,
    pub output_dir: PathBuf,
    /// Shared objects whose frames are dropped from samples.
    pub blocklist: Vec<String>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directives; `RUST_LOG` applies when unset.
    pub filter: Option<String>,
    /// Enables rolling log files in this directory.
    pub directory: Option<PathBuf>,
    pub json: bool,
}

// --- Default ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self { address: IpAddr::V4(Ipv4Addr::UNSPECIFIED), port: 3000, shutdown_timeout_secs: 10 }
    }
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self { size: 10_000 }
    }
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frequency: 1000,
            output_dir: PathBuf::from("."),
            blocklist: ["libc", "libgcc", "pthread", "vdso"].map(str::to_owned).to_vec(),
        }
    }
}
