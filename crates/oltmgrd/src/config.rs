//! Topology configuration and request files.
//!
//! ```yaml
//! abstract_chassis:
//!   clli: ABSTRACT1
//!   rack: 1
//!   shelf: 1
//! physical_chassis:
//!   clli: NYCMNY01
//!   vcore_address: 10.0.0.1:9191
//!   data_switch:
//!     hostname: switch1.lab
//!   olts:
//!     - hostname: olt1.lab
//!       address: 10.0.0.5:9191
//!       pon_ports: 16
//!     - hostname: olt2.lab
//! hosts:
//!   olt2.lab: 10.0.0.6:9191
//! orch:
//!   max_retries: 3
//! ```

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use olt_backend::{ProvisioningBackend, StaticResolver};
use olt_chassis::{AbstractChassis, ChassisError, DataSwitch, PhysicalChassis, Topology};
use olt_orch::{ProvisionOrchConfig, ProvisionRequest};
use olt_types::{Clli, MAX_PORTS, MAX_SLOTS};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// Errors raised while loading configuration or request files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse YAML {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported request file extension: {path} (expected .json, .yaml or .yml)")]
    UnsupportedFormat { path: PathBuf },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to build topology: {0}")]
    Topology(#[from] ChassisError),
}

impl ConfigError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ConfigError::Invalid(message.into())
    }
}

/// Result type alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

fn default_rack() -> u32 {
    1
}

fn default_shelf() -> u32 {
    1
}

fn default_pon_ports() -> u32 {
    MAX_PORTS as u32
}

fn default_max_retries() -> u32 {
    ProvisionOrchConfig::default().max_retries
}

fn default_retry_interval_ms() -> u64 {
    100
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbstractChassisConfig {
    pub clli: Clli,
    #[serde(default = "default_rack")]
    pub rack: u32,
    #[serde(default = "default_shelf")]
    pub shelf: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OltConfig {
    pub hostname: String,
    /// Resolved through `hosts` when absent.
    #[serde(default)]
    pub address: Option<SocketAddr>,
    #[serde(default = "default_pon_ports")]
    pub pon_ports: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalChassisConfig {
    pub clli: Clli,
    pub vcore_address: SocketAddr,
    #[serde(default)]
    pub data_switch: DataSwitch,
    #[serde(default)]
    pub olts: Vec<OltConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchConfig {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Pause between orchestrator passes while retries are pending.
    #[serde(default = "default_retry_interval_ms")]
    pub retry_interval_ms: u64,
}

impl Default for OrchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_interval_ms: default_retry_interval_ms(),
        }
    }
}

/// Top-level daemon configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OltMgrConfig {
    pub abstract_chassis: AbstractChassisConfig,
    pub physical_chassis: PhysicalChassisConfig,
    /// Static hostname to address table for OLTs configured without one.
    #[serde(default)]
    pub hosts: BTreeMap<String, SocketAddr>,
    #[serde(default)]
    pub orch: OrchConfig,
}

impl OltMgrConfig {
    /// Parses a YAML topology document.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Reads and validates a YAML topology file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&contents).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        debug!(
            "loaded {} with {} OLT(s)",
            path.display(),
            config.physical_chassis.olts.len()
        );
        Ok(config)
    }

    /// Checks limits that the chassis model would otherwise only report
    /// partway through building the topology.
    pub fn validate(&self) -> ConfigResult<()> {
        let olts = &self.physical_chassis.olts;
        if olts.len() > MAX_SLOTS {
            return Err(ConfigError::invalid(format!(
                "{} OLTs configured, physical chassis holds {}",
                olts.len(),
                MAX_SLOTS
            )));
        }
        let mut seen = std::collections::HashSet::new();
        for olt in olts {
            if olt.pon_ports == 0 {
                return Err(ConfigError::invalid(format!(
                    "OLT {} has no PON ports",
                    olt.hostname
                )));
            }
            if !seen.insert(olt.hostname.as_str()) {
                return Err(ConfigError::invalid(format!(
                    "OLT {} configured twice",
                    olt.hostname
                )));
            }
        }
        Ok(())
    }

    pub fn orch_config(&self) -> ProvisionOrchConfig {
        ProvisionOrchConfig {
            max_retries: self.orch.max_retries,
        }
    }

    /// Builds the chassis pair and adds every configured OLT, binding its
    /// PON ports onto the abstract chassis.
    pub fn build_topology(&self, backend: Arc<dyn ProvisioningBackend>) -> ConfigResult<Topology> {
        let abstract_chassis = AbstractChassis::new(
            self.abstract_chassis.clli.clone(),
            self.abstract_chassis.rack,
            self.abstract_chassis.shelf,
        )
        .with_backend(backend.clone());
        let physical_chassis = PhysicalChassis::new(
            self.physical_chassis.clli.clone(),
            self.physical_chassis.vcore_address,
            self.physical_chassis.data_switch.clone(),
        )
        .with_backend(backend);
        let resolver: StaticResolver = self
            .hosts
            .iter()
            .map(|(hostname, address)| (hostname.clone(), *address))
            .collect();

        let mut topology =
            Topology::new(abstract_chassis, physical_chassis).with_resolver(Arc::new(resolver));
        for olt in &self.physical_chassis.olts {
            let slot = topology.add_simple_olt(&olt.hostname, olt.address, olt.pon_ports)?;
            info!(
                "OLT {} installed in slot {} with {} PON port(s)",
                olt.hostname, slot, olt.pon_ports
            );
        }
        Ok(topology)
    }
}

/// Reads provisioning requests from a `.json`, `.yaml` or `.yml` file
/// holding a list of requests.
pub fn load_requests(path: impl AsRef<Path>) -> ConfigResult<Vec<ProvisionRequest>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    let contents = || {
        std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    match extension.as_deref() {
        Some("json") => serde_json::from_str(&contents()?).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        }),
        Some("yaml" | "yml") => {
            serde_yaml::from_str(&contents()?).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })
        }
        _ => Err(ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use olt_backend::{BackendOp, PonPortRef, RecordingBackend};
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const TOPOLOGY: &str = r#"
abstract_chassis:
  clli: ABSTRACT1
physical_chassis:
  clli: NYCMNY01
  vcore_address: 10.0.0.1:9191
  data_switch:
    hostname: switch1.lab
  olts:
    - hostname: olt1.lab
      address: 10.0.0.5:9191
      pon_ports: 2
    - hostname: olt2.lab
      pon_ports: 1
hosts:
  olt2.lab: 10.0.0.6:9191
"#;

    fn write_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_with_defaults() {
        let config = OltMgrConfig::from_yaml(TOPOLOGY).unwrap();
        assert_eq!(config.abstract_chassis.rack, 1);
        assert_eq!(config.abstract_chassis.shelf, 1);
        assert_eq!(config.physical_chassis.olts[1].address, None);
        assert_eq!(config.orch, OrchConfig::default());
        assert_eq!(config.orch_config().max_retries, 3);
    }

    #[test]
    fn test_invalid_clli_rejected() {
        let yaml = TOPOLOGY.replace("ABSTRACT1", "NOT-A-CLLI");
        assert!(OltMgrConfig::from_yaml(&yaml).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let file = write_file(".yaml", TOPOLOGY);
        let config = OltMgrConfig::load(file.path()).unwrap();
        assert_eq!(config.physical_chassis.olts.len(), 2);
    }

    #[test]
    fn test_load_missing_file() {
        let err = OltMgrConfig::load("/nonexistent/oltmgrd.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_validate_duplicate_olt() {
        let mut config = OltMgrConfig::from_yaml(TOPOLOGY).unwrap();
        config.physical_chassis.olts[1].hostname = "olt1.lab".to_string();
        let err = config.validate().unwrap_err();
        assert_eq!(err.to_string(), "invalid configuration: OLT olt1.lab configured twice");
    }

    #[test]
    fn test_build_topology() {
        let backend = Arc::new(RecordingBackend::new());
        let config = OltMgrConfig::from_yaml(TOPOLOGY).unwrap();
        let topology = config.build_topology(backend.clone()).unwrap();

        assert_eq!(topology.physical_chassis().olt_count(), 2);
        assert_eq!(
            topology.physical_chassis().linecard(2).unwrap().address(),
            "10.0.0.6:9191".parse().unwrap()
        );
        assert_eq!(
            topology
                .abstract_port_for(&PonPortRef::new("olt2.lab", 1))
                .unwrap()
                .numbers(),
            (1, 3)
        );
        assert_eq!(backend.count(BackendOp::AddOlt), 2);
    }

    #[test]
    fn test_build_topology_unresolved_host() {
        let yaml = TOPOLOGY.replace("  olt2.lab: 10.0.0.6:9191\n", "");
        let config = OltMgrConfig::from_yaml(&yaml).unwrap();
        let err = config
            .build_topology(Arc::new(RecordingBackend::new()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Topology(_)));
    }

    #[test]
    fn test_load_requests_json_and_yaml() {
        let json = write_file(
            ".json",
            r#"[{"op": "activate", "slot": 1, "port": 1, "ont": 1, "serial_number": "ABC123"}]"#,
        );
        let yaml = write_file(".yml", "- op: activate_slot\n  slot: 1\n");

        assert_eq!(load_requests(json.path()).unwrap().len(), 1);
        assert_eq!(
            load_requests(yaml.path()).unwrap(),
            vec![ProvisionRequest::ActivateSlot { slot: 1 }]
        );
    }

    #[test]
    fn test_load_requests_unknown_extension() {
        let file = write_file(".txt", "[]");
        let err = load_requests(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
    }
}
