//! Configuration for the marketplace core.

use serde::{Deserialize, Serialize};

/// Pricing knobs for the credit marketplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketConfig {
    /// How many GBP one credit represents
    pub gbp_per_credit: u32,
    /// Lowest derivable credits-per-hour rate
    pub min_credits_per_hour: u32,
    /// Highest derivable credits-per-hour rate
    pub max_credits_per_hour: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            gbp_per_credit: 10,
            min_credits_per_hour: 1,
            max_credits_per_hour: 10,
        }
    }
}

impl MarketConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Derive an offer's credits-per-hour rate from its GBP rate.
    ///
    /// Rounds to the nearest credit and clamps into the configured range, so
    /// every listing costs at least one credit per hour.
    pub fn credits_per_hour(&self, gbp_per_hour: u32) -> u32 {
        let per_credit = self.gbp_per_credit.max(1);
        let rounded = (gbp_per_hour + per_credit / 2) / per_credit;
        let max = self.max_credits_per_hour.max(self.min_credits_per_hour);
        rounded.clamp(self.min_credits_per_hour, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_derivation() {
        let config = MarketConfig::default();
        assert_eq!(config.credits_per_hour(80), 8);
        assert_eq!(config.credits_per_hour(50), 5);
        assert_eq!(config.credits_per_hour(55), 6); // rounds half up
    }

    #[test]
    fn test_rate_clamped() {
        let config = MarketConfig::default();
        assert_eq!(config.credits_per_hour(0), 1);
        assert_eq!(config.credits_per_hour(4), 1);
        assert_eq!(config.credits_per_hour(500), 10);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let config = MarketConfig::default();
        let yaml = config.to_yaml().unwrap();
        let parsed = MarketConfig::from_yaml(&yaml).unwrap();
        assert_eq!(parsed.gbp_per_credit, config.gbp_per_credit);
        assert_eq!(parsed.max_credits_per_hour, config.max_credits_per_hour);
    }
}
