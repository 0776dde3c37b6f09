// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Compose service record and the union types its fields can take

#![allow(missing_docs)]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =========================================================================
// Shared union shapes
// =========================================================================

/// A single string or a list of strings (`command`, `dns`, `tmpfs`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrList {
    /// `command: "npm start"`
    String(String),
    /// `command: ["npm", "start"]`
    List(Vec<String>),
}

impl Default for StringOrList {
    fn default() -> Self {
        Self::String(String::new())
    }
}

/// A string or a number (`expose`, `shm_size`, environment values)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StringOrNumber {
    /// Textual form
    String(String),
    /// Numeric form
    Number(serde_json::Number),
}

/// `KEY: VALUE` map or `KEY=VALUE` list (`labels`, `sysctls`, `extra_hosts`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyValueSpec {
    /// Mapping form
    Map(IndexMap<String, String>),
    /// List form
    List(Vec<String>),
}

impl Default for KeyValueSpec {
    fn default() -> Self {
        Self::Map(IndexMap::new())
    }
}

// =========================================================================
// Identity
// =========================================================================

/// `build` is either a context path or a full build section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BuildSpec {
    /// Context path only
    Path(String),
    /// Full build configuration
    Config(BuildConfig),
}

/// Long-form build section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<IndexMap<String, StringOrNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shm_size: Option<StringOrNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_from: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<IndexMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_hosts: Option<KeyValueSpec>,
}

// =========================================================================
// Networking
// =========================================================================

/// Per-network attachment settings in the keyed `networks` form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkAttachment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aliases: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv4_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6_address: Option<String>,
}

/// The networks a service joins
///
/// Compose accepts a plain list of names or a map keyed by network name with
/// per-attachment settings. Both forms carry the same set of names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NetworksSpec {
    /// `networks: [front, back]`
    List(Vec<String>),
    /// `networks: { front: { aliases: [web] } }`
    Keyed(IndexMap<String, Option<NetworkAttachment>>),
}

impl Default for NetworksSpec {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl NetworksSpec {
    /// Network names in declaration order, whichever form is used
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::List(names) => names.iter().map(String::as_str).collect(),
            Self::Keyed(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Whether the service joins `network`
    #[must_use]
    pub fn contains(&self, network: &str) -> bool {
        match self {
            Self::List(names) => names.iter().any(|n| n == network),
            Self::Keyed(map) => map.contains_key(network),
        }
    }

    /// Add a network, keeping the current form. Returns false if already present.
    pub fn insert(&mut self, network: &str) -> bool {
        if self.contains(network) {
            return false;
        }
        match self {
            Self::List(names) => names.push(network.to_string()),
            Self::Keyed(map) => {
                map.insert(network.to_string(), None);
            }
        }
        true
    }

    /// Drop a network. Returns true if something was removed.
    pub fn remove(&mut self, network: &str) -> bool {
        match self {
            Self::List(names) => {
                let before = names.len();
                names.retain(|n| n != network);
                names.len() < before
            }
            Self::Keyed(map) => map.shift_remove(network).is_some(),
        }
    }

    /// Number of networks joined
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::List(names) => names.len(),
            Self::Keyed(map) => map.len(),
        }
    }

    /// No networks joined
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Long-form port mapping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<StringOrNumber>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
}

/// One entry of `ports`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortSpec {
    /// `"8080:80"`
    Short(String),
    /// `80`
    Number(u32),
    /// `{ target: 80, published: 8080 }`
    Long(PortConfig),
}

// =========================================================================
// Storage
// =========================================================================

/// Bind-mount options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BindOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub propagation: Option<String>,
}

/// Named-volume options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nocopy: Option<bool>,
}

/// Long-form volume mount
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolumeMountConfig {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub mount_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub read_only: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bind: Option<BindOptions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<VolumeOptions>,
}

/// One entry of a service's `volumes`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VolumeMount {
    /// `./data:/app/data:ro`
    Short(String),
    /// Long form
    Long(VolumeMountConfig),
}

/// Long-form config or secret grant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileGrant {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<u32>,
}

/// One entry of a service's `configs` or `secrets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileReference {
    /// Name only
    Short(String),
    /// Long form
    Long(FileGrant),
}

// =========================================================================
// Runtime
// =========================================================================

/// `environment` map or list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvironmentSpec {
    /// `FOO: bar`; a null value passes the variable through from the host
    Map(IndexMap<String, Option<StringOrNumber>>),
    /// `FOO=bar`
    List(Vec<String>),
}

impl Default for EnvironmentSpec {
    fn default() -> Self {
        Self::Map(IndexMap::new())
    }
}

/// Long-form env file reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvFileConfig {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

/// One entry of `env_file`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvFileEntry {
    /// Path only
    Path(String),
    /// Path with `required` flag
    Config(EnvFileConfig),
}

/// `env_file` as a single path or a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EnvFileSpec {
    /// Single path
    Single(String),
    /// List of entries
    List(Vec<EnvFileEntry>),
}

impl Default for EnvFileSpec {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Container restart policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RestartPolicy {
    /// Never restart
    #[default]
    #[serde(rename = "no")]
    No,
    /// Always restart
    #[serde(rename = "always")]
    Always,
    /// Restart on non-zero exit
    #[serde(rename = "on-failure")]
    OnFailure,
    /// Restart unless explicitly stopped
    #[serde(rename = "unless-stopped")]
    UnlessStopped,
}

/// A ulimit as a single value or a soft/hard pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Ulimit {
    /// Same soft and hard limit
    Single(i64),
    /// Separate soft and hard limits
    Range {
        /// Soft limit
        soft: i64,
        /// Hard limit
        hard: i64,
    },
}

/// Logging driver section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<IndexMap<String, StringOrNumber>>,
}

// =========================================================================
// Deploy
// =========================================================================

/// CPU and memory figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpus: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

/// Resource limits and reservations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limits: Option<ResourceSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reservations: Option<ResourceSpec>,
}

/// Swarm-style restart policy
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployRestartPolicy {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

/// `deploy` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeployConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<Resources>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replicas: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart_policy: Option<DeployRestartPolicy>,
}

/// `healthcheck` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Healthcheck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub test: Option<StringOrList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_period: Option<String>,
}

// =========================================================================
// Dependencies
// =========================================================================

/// Condition a dependency must reach before the dependent starts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyState {
    /// Container started
    ServiceStarted,
    /// Healthcheck passing
    ServiceHealthy,
    /// Exited with status 0
    ServiceCompletedSuccessfully,
}

/// Per-dependency settings in the keyed `depends_on` form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DependencyCondition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<DependencyState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<bool>,
}

/// `depends_on` as a list of names or a keyed map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DependsOnSpec {
    /// `depends_on: [db]`
    List(Vec<String>),
    /// `depends_on: { db: { condition: service_healthy } }`
    Keyed(IndexMap<String, Option<DependencyCondition>>),
}

impl Default for DependsOnSpec {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl DependsOnSpec {
    /// Dependency names in declaration order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::List(names) => names.iter().map(String::as_str).collect(),
            Self::Keyed(map) => map.keys().map(String::as_str).collect(),
        }
    }

    /// Drop a dependency. Returns true if something was removed.
    pub fn remove(&mut self, service: &str) -> bool {
        match self {
            Self::List(names) => {
                let before = names.len();
                names.retain(|n| n != service);
                names.len() < before
            }
            Self::Keyed(map) => map.shift_remove(service).is_some(),
        }
    }

    /// No dependencies left
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(names) => names.is_empty(),
            Self::Keyed(map) => map.is_empty(),
        }
    }
}

// =========================================================================
// Service icon (canvas metadata, not Compose)
// =========================================================================

/// Icon drawn on the canvas node for a service
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceIcon {
    /// Generic container
    #[default]
    Container,
    /// Database
    Database,
    /// Server
    Server,
    /// Cloud
    Cloud,
    /// Cube
    Cube,
    /// Circle
    Circle,
    /// Hexagon
    Hexagon,
}

impl ServiceIcon {
    /// All icons in picker order
    pub const ALL: [Self; 7] = [
        Self::Container,
        Self::Database,
        Self::Server,
        Self::Cloud,
        Self::Cube,
        Self::Circle,
        Self::Hexagon,
    ];

    /// Lowercase identifier
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Container => "container",
            Self::Database => "database",
            Self::Server => "server",
            Self::Cloud => "cloud",
            Self::Cube => "cube",
            Self::Circle => "circle",
            Self::Hexagon => "hexagon",
        }
    }

    /// Parse an icon from its identifier
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|icon| icon.code() == code)
    }

    /// Graphviz node shape used in DOT export
    #[must_use]
    pub fn dot_shape(&self) -> &'static str {
        match self {
            Self::Container => "box",
            Self::Database => "cylinder",
            Self::Server => "box3d",
            Self::Cloud => "egg",
            Self::Cube => "component",
            Self::Circle => "circle",
            Self::Hexagon => "hexagon",
        }
    }
}

// =========================================================================
// ServiceNode
// =========================================================================

/// One Compose service
///
/// Every field is optional and independent; the model enforces no
/// cross-field rules. `icon` belongs to the canvas and is stripped from
/// Compose output. Keys this record does not know (e.g. `x-` extensions)
/// are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<ServiceIcon>,

    // Identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<KeyValueSpec>,

    // Networking
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub networks: Option<NetworksSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<Vec<PortSpec>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expose: Option<Vec<StringOrNumber>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_hosts: Option<KeyValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<StringOrList>,

    // Storage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Vec<VolumeMount>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tmpfs: Option<StringOrList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configs: Option<Vec<FileReference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secrets: Option<Vec<FileReference>>,

    // Runtime
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<StringOrList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<StringOrList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_file: Option<EnvFileSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub restart: Option<RestartPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_grace_period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_signal: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tty: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stdin_open: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privileged: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_add: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cap_drop: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub init: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sysctls: Option<KeyValueSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ulimits: Option<IndexMap<String, Ulimit>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingConfig>,

    // Resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deploy: Option<DeployConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healthcheck: Option<Healthcheck>,

    // Dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOnSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_links: Option<Vec<String>>,

    /// Keys not modelled above
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl ServiceNode {
    /// A freshly added service: every field present with its empty default
    ///
    /// The properties panel relies on never seeing an unset field for a new
    /// service.
    #[must_use]
    pub fn with_defaults() -> Self {
        let empty_resources = || ResourceSpec {
            cpus: Some(String::new()),
            memory: Some(String::new()),
        };

        Self {
            icon: Some(ServiceIcon::Container),
            container_name: Some(String::new()),
            image: Some(String::new()),
            build: Some(BuildSpec::Path(String::new())),
            labels: Some(KeyValueSpec::default()),
            networks: Some(NetworksSpec::default()),
            ports: Some(Vec::new()),
            expose: Some(Vec::new()),
            extra_hosts: Some(KeyValueSpec::List(Vec::new())),
            dns: Some(StringOrList::List(Vec::new())),
            volumes: Some(Vec::new()),
            tmpfs: Some(StringOrList::List(Vec::new())),
            configs: Some(Vec::new()),
            secrets: Some(Vec::new()),
            command: Some(StringOrList::default()),
            entrypoint: Some(StringOrList::default()),
            environment: Some(EnvironmentSpec::default()),
            env_file: Some(EnvFileSpec::default()),
            restart: Some(RestartPolicy::No),
            stop_grace_period: Some(String::new()),
            stop_signal: Some(String::new()),
            user: Some(String::new()),
            working_dir: Some(String::new()),
            tty: Some(false),
            stdin_open: Some(false),
            privileged: Some(false),
            cap_add: Some(Vec::new()),
            cap_drop: Some(Vec::new()),
            init: Some(false),
            sysctls: Some(KeyValueSpec::default()),
            ulimits: Some(IndexMap::new()),
            profiles: Some(Vec::new()),
            logging: Some(LoggingConfig {
                driver: Some(String::new()),
                options: Some(IndexMap::new()),
            }),
            deploy: Some(DeployConfig {
                resources: Some(Resources {
                    limits: Some(empty_resources()),
                    reservations: Some(empty_resources()),
                }),
                replicas: Some(1),
                restart_policy: Some(DeployRestartPolicy {
                    condition: Some(String::new()),
                    delay: Some(String::new()),
                    max_attempts: Some(0),
                    window: Some(String::new()),
                }),
            }),
            healthcheck: Some(Healthcheck {
                test: Some(StringOrList::default()),
                interval: Some(String::new()),
                timeout: Some(String::new()),
                retries: Some(0),
                start_period: Some(String::new()),
            }),
            depends_on: Some(DependsOnSpec::default()),
            links: Some(Vec::new()),
            external_links: Some(Vec::new()),
            extra: IndexMap::new(),
        }
    }

    /// Networks this service joins, flattened to names
    #[must_use]
    pub fn network_names(&self) -> Vec<&str> {
        self.networks.as_ref().map(NetworksSpec::names).unwrap_or_default()
    }
}
