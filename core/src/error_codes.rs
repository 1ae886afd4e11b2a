//! Stable error codes attached to every error variant.

pub const CONFIG_INVALID_THRESHOLD: &str = "GCMP_CFG_001";
pub const CONFIG_NON_POSITIVE_LIMIT: &str = "GCMP_CFG_002";

pub const GRID_DUPLICATE_COORDINATE: &str = "GCMP_GRID_001";

pub const LOAD_FAILED: &str = "GCMP_LOAD_001";

pub const COMPARE_INVALID_CONFIG: &str = "GCMP_CMP_002";
pub const COMPARE_INVALID_ALIGNMENT: &str = "GCMP_CMP_003";
pub const COMPARE_LOAD: &str = "GCMP_CMP_004";
pub const COMPARE_CANCELLED: &str = "GCMP_CMP_005";
