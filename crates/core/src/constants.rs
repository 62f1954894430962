/// Constants used throughout the edgescope codebase
// Capability tag marking an identity as an edge gateway
pub const EDGE_CAPABILITY: &str = "iotEdge";

// Identity and chain formatting
pub const MODULE_ID_SEPARATOR: char = '/';
pub const AUTH_CHAIN_SEPARATOR: char = ';';

// Hierarchy limits
pub const DEFAULT_MAX_EDGE_DEPTH: usize = 5;

// Refresh timing defaults (seconds)
pub const DEFAULT_REFRESH_RATE_SECS: u64 = 3600;
pub const DEFAULT_REFRESH_DELAY_SECS: u64 = 120;

// Persisted envelope format version
pub const STORED_IDENTITY_VERSION: u32 = 1;

// Environment variable names
pub const EDGESCOPE_LOG_VAR: &str = "EDGESCOPE_LOG";
pub const EDGESCOPE_EDGE_DEVICE_ID_VAR: &str = "EDGESCOPE_EDGE_DEVICE_ID";
pub const EDGESCOPE_REFRESH_RATE_VAR: &str = "EDGESCOPE_REFRESH_RATE_SECS";
pub const EDGESCOPE_REFRESH_DELAY_VAR: &str = "EDGESCOPE_REFRESH_DELAY_SECS";
pub const EDGESCOPE_MAX_EDGE_DEPTH_VAR: &str = "EDGESCOPE_MAX_EDGE_DEPTH";
pub const EDGESCOPE_STORE_DIR_VAR: &str = "EDGESCOPE_STORE_DIR";
