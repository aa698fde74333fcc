//! Configuration primitives for the ADNS driver.

use crate::params::Resolution;

/// User-facing configuration applied at initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Tracking resolution programmed into chips with a mouse-control
    /// register; chips without one ignore it.
    pub resolution: Resolution,
    /// Per-pixel retry budget during frame capture. A pixel that never
    /// reports valid data within this many reads aborts the capture.
    pub pixel_retry_limit: u16,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.pixel_retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            resolution: Resolution::Dpi2000,
            pixel_retry_limit: 256,
        }
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the tracking resolution.
    pub fn resolution(mut self, resolution: Resolution) -> Self {
        self.config.resolution = resolution;
        self
    }

    /// Overrides the per-pixel retry budget.
    pub fn pixel_retry_limit(mut self, limit: u16) -> Self {
        self.config.pixel_retry_limit = limit;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Validation errors generated while verifying a [`Config`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// A zero retry budget would make every capture fail immediately.
    ZeroRetryLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let config = Config::new()
            .resolution(Resolution::Dpi500)
            .pixel_retry_limit(16)
            .build();
        assert_eq!(config.resolution, Resolution::Dpi500);
        assert_eq!(config.pixel_retry_limit, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_retry_budget_is_rejected() {
        let config = Config::new().pixel_retry_limit(0).build();
        assert_eq!(config.validate(), Err(ConfigError::ZeroRetryLimit));
    }
}
