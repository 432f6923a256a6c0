use crate::{Result, VirtdeckError, log_debug};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Hard ceiling on the number of rows the dashboard lists.
pub const MAX_MACHINES: usize = 99;

pub const CONFIG_ENV_VAR: &str = "VIRTDECK_CONFIG";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VirtdeckConfig {
    #[serde(default)]
    pub hypervisor: HypervisorConfig,
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypervisorConfig {
    #[serde(default = "default_virsh")]
    pub program: String,
    #[serde(default = "default_clone_program")]
    pub clone_program: String,
    /// libvirt connection URI, e.g. `qemu:///system`
    #[serde(default)]
    pub connect_uri: Option<String>,
    /// Interfaces whose `domiflist` row contains this text carry the MAC we resolve.
    #[serde(default = "default_interface_prefix")]
    pub interface_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_arp_program")]
    pub arp_program: String,
    #[serde(default = "default_neighbor_program")]
    pub neighbor_program: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_max_machines")]
    pub max_machines: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_virsh() -> String {
    "virsh".to_string()
}

fn default_clone_program() -> String {
    "virt-clone".to_string()
}

fn default_interface_prefix() -> String {
    "vnet".to_string()
}

fn default_arp_program() -> String {
    "arp".to_string()
}

fn default_neighbor_program() -> String {
    "ip".to_string()
}

fn default_max_machines() -> usize {
    MAX_MACHINES
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for HypervisorConfig {
    fn default() -> Self {
        Self {
            program: default_virsh(),
            clone_program: default_clone_program(),
            connect_uri: None,
            interface_prefix: default_interface_prefix(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            arp_program: default_arp_program(),
            neighbor_program: default_neighbor_program(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            max_machines: default_max_machines(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

impl DashboardConfig {
    /// Row limit actually applied, always within `1..=MAX_MACHINES`.
    pub fn machine_limit(&self) -> usize {
        self.max_machines.clamp(1, MAX_MACHINES)
    }
}

impl VirtdeckConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    pub fn from_str(contents: &str) -> Result<Self> {
        let config: VirtdeckConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// `$VIRTDECK_CONFIG`, else the per-user config directory.
    pub fn default_path() -> Option<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Some(PathBuf::from(path));
        }
        dirs::config_dir().map(|dir| dir.join("virtdeck").join("config.toml"))
    }

    /// Loads the config at `path` when it exists; a missing file means defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) if path.exists() => {
                log_debug!("Loading configuration from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<()> {
        let programs = [
            ("hypervisor.program", &self.hypervisor.program),
            ("hypervisor.clone_program", &self.hypervisor.clone_program),
            ("network.arp_program", &self.network.arp_program),
            ("network.neighbor_program", &self.network.neighbor_program),
        ];
        for (key, value) in programs {
            if value.trim().is_empty() {
                return Err(VirtdeckError::ConfigError(format!("{} must not be empty", key)));
            }
        }
        if self.hypervisor.interface_prefix.trim().is_empty() {
            return Err(VirtdeckError::ConfigError(
                "hypervisor.interface_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_yields_defaults() {
        let config = VirtdeckConfig::from_str("").unwrap();
        assert_eq!(config.hypervisor.program, "virsh");
        assert_eq!(config.hypervisor.clone_program, "virt-clone");
        assert_eq!(config.hypervisor.interface_prefix, "vnet");
        assert!(config.hypervisor.connect_uri.is_none());
        assert_eq!(config.network.arp_program, "arp");
        assert_eq!(config.network.neighbor_program, "ip");
        assert_eq!(config.dashboard.machine_limit(), MAX_MACHINES);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_config_parsing() {
        let toml_str = r#"
[hypervisor]
connect_uri = "qemu:///system"
interface_prefix = "tap"

[dashboard]
max_machines = 10

[logging]
level = "debug"
file = "/tmp/virtdeck-test.log"
"#;

        let config = VirtdeckConfig::from_str(toml_str).unwrap();
        assert_eq!(config.hypervisor.connect_uri.as_deref(), Some("qemu:///system"));
        assert_eq!(config.hypervisor.interface_prefix, "tap");
        assert_eq!(config.hypervisor.program, "virsh");
        assert_eq!(config.dashboard.machine_limit(), 10);
        assert_eq!(config.logging.file, Some(PathBuf::from("/tmp/virtdeck-test.log")));
    }

    #[test]
    fn machine_limit_is_clamped() {
        let over = DashboardConfig { max_machines: 500 };
        assert_eq!(over.machine_limit(), MAX_MACHINES);
        let zero = DashboardConfig { max_machines: 0 };
        assert_eq!(zero.machine_limit(), 1);
    }

    #[test]
    fn blank_program_is_rejected() {
        let err = VirtdeckConfig::from_str("[network]\narp_program = \"  \"\n").unwrap_err();
        assert!(matches!(err, VirtdeckError::ConfigError(_)));
        assert!(err.to_string().contains("network.arp_program"));
    }

    #[test]
    fn load_reads_file_and_missing_file_means_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");

        let config = VirtdeckConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.hypervisor.program, "virsh");

        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[hypervisor]\nprogram = \"/usr/local/bin/virsh\"").unwrap();

        let config = VirtdeckConfig::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.hypervisor.program, "/usr/local/bin/virsh");
    }
}
