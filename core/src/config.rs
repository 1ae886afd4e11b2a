//! Configuration for the comparison engine.
//!
//! `CompareConfig` carries the behavioral flags callers set (gap handling,
//! strict naming, speed) together with the matching thresholds, so no
//! constants are hardcoded in the alignment code.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error_codes;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompareConfig {
    /// Align rows allowing inserted/removed rows. When false rows pair by index.
    pub consider_row_gaps: bool,
    /// Align columns allowing inserted/removed columns. When false columns pair by index.
    pub consider_column_gaps: bool,
    /// Pair child names by equality only, at every hierarchy level.
    pub match_names_strictly: bool,
    /// Use the windowed (approximate) row/column alignment.
    pub prioritize_speed: bool,
    /// Lower-case child names before pairing them.
    pub ignore_name_case: bool,
    pub name_match_threshold: f64,
    pub row_match_threshold: f64,
    pub column_match_threshold: f64,
    /// Half-width of the candidate window used when `prioritize_speed` is set.
    pub fast_mode_window: u32,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            consider_row_gaps: true,
            consider_column_gaps: false,
            match_names_strictly: false,
            prioritize_speed: false,
            ignore_name_case: false,
            name_match_threshold: 0.5,
            row_match_threshold: 0.5,
            column_match_threshold: 0.5,
            fast_mode_window: 16,
        }
    }
}

impl CompareConfig {
    pub fn fastest() -> Self {
        Self {
            prioritize_speed: true,
            fast_mode_window: 8,
            ..Default::default()
        }
    }

    pub fn balanced() -> Self {
        Self::default()
    }

    pub fn most_precise() -> Self {
        Self {
            consider_column_gaps: true,
            prioritize_speed: false,
            ..Default::default()
        }
    }

    pub fn builder() -> CompareConfigBuilder {
        CompareConfigBuilder {
            inner: CompareConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ensure_unit_interval(self.name_match_threshold, "name_match_threshold")?;
        ensure_unit_interval(self.row_match_threshold, "row_match_threshold")?;
        ensure_unit_interval(self.column_match_threshold, "column_match_threshold")?;

        if self.fast_mode_window == 0 {
            return Err(ConfigError::NonPositiveLimit {
                field: "fast_mode_window",
                value: 0,
            });
        }

        Ok(())
    }

    /// The candidate window for row/column alignment, if speed is prioritized.
    pub(crate) fn alignment_window(&self) -> Option<usize> {
        self.prioritize_speed
            .then_some(self.fast_mode_window as usize)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("[GCMP_CFG_001] {field} must be in [0.0, 1.0] and finite (got {value})")]
    InvalidThreshold { field: &'static str, value: f64 },
    #[error("[GCMP_CFG_002] {field} must be greater than zero (got {value})")]
    NonPositiveLimit { field: &'static str, value: u64 },
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::InvalidThreshold { .. } => error_codes::CONFIG_INVALID_THRESHOLD,
            ConfigError::NonPositiveLimit { .. } => error_codes::CONFIG_NON_POSITIVE_LIMIT,
        }
    }
}

fn ensure_unit_interval(value: f64, field: &'static str) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::InvalidThreshold { field, value });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct CompareConfigBuilder {
    inner: CompareConfig,
}

impl Default for CompareConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CompareConfigBuilder {
    pub fn new() -> Self {
        CompareConfig::builder()
    }

    pub fn consider_row_gaps(mut self, value: bool) -> Self {
        self.inner.consider_row_gaps = value;
        self
    }

    pub fn consider_column_gaps(mut self, value: bool) -> Self {
        self.inner.consider_column_gaps = value;
        self
    }

    pub fn match_names_strictly(mut self, value: bool) -> Self {
        self.inner.match_names_strictly = value;
        self
    }

    pub fn prioritize_speed(mut self, value: bool) -> Self {
        self.inner.prioritize_speed = value;
        self
    }

    pub fn ignore_name_case(mut self, value: bool) -> Self {
        self.inner.ignore_name_case = value;
        self
    }

    pub fn name_match_threshold(mut self, value: f64) -> Self {
        self.inner.name_match_threshold = value;
        self
    }

    pub fn row_match_threshold(mut self, value: f64) -> Self {
        self.inner.row_match_threshold = value;
        self
    }

    pub fn column_match_threshold(mut self, value: f64) -> Self {
        self.inner.column_match_threshold = value;
        self
    }

    pub fn fast_mode_window(mut self, value: u32) -> Self {
        self.inner.fast_mode_window = value;
        self
    }

    pub fn build(self) -> Result<CompareConfig, ConfigError> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_consider_rows_but_not_columns() {
        let cfg = CompareConfig::default();
        assert!(cfg.consider_row_gaps);
        assert!(!cfg.consider_column_gaps);
        assert!(!cfg.match_names_strictly);
        assert!(!cfg.prioritize_speed);
        assert_eq!(cfg.alignment_window(), None);
    }

    #[test]
    fn serde_roundtrip_preserves_defaults() {
        let cfg = CompareConfig::default();
        let json = serde_json::to_string(&cfg).expect("serialize default config");
        let parsed: CompareConfig =
            serde_json::from_str(&json).expect("deserialize default config");
        assert_eq!(cfg, parsed);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let cfg: CompareConfig =
            serde_json::from_str(r#"{ "match_names_strictly": true }"#).expect("partial config");
        assert!(cfg.match_names_strictly);
        assert!(cfg.consider_row_gaps);
        assert_eq!(cfg.fast_mode_window, 16);
    }

    #[test]
    fn builder_rejects_invalid_threshold() {
        let err = CompareConfig::builder()
            .row_match_threshold(1.5)
            .build()
            .expect_err("threshold above one must be rejected");
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold { field: "row_match_threshold", .. }
        ));
        assert_eq!(err.code(), error_codes::CONFIG_INVALID_THRESHOLD);

        let err = CompareConfig::builder()
            .name_match_threshold(f64::NAN)
            .build()
            .expect_err("NaN must be rejected");
        assert!(matches!(err, ConfigError::InvalidThreshold { .. }));
    }

    #[test]
    fn builder_rejects_zero_window() {
        let err = CompareConfig::builder()
            .fast_mode_window(0)
            .build()
            .expect_err("zero window must be rejected");
        assert_eq!(
            err,
            ConfigError::NonPositiveLimit {
                field: "fast_mode_window",
                value: 0
            }
        );
    }

    #[test]
    fn fastest_enables_windowed_alignment() {
        let cfg = CompareConfig::fastest();
        assert_eq!(cfg.alignment_window(), Some(8));
        assert!(CompareConfig::most_precise().consider_column_gaps);
        assert_eq!(CompareConfig::balanced(), CompareConfig::default());
    }
}
