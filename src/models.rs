use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_CUSTOMERS: usize = 500;

#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct SimConfig {
    #[serde(default = "default_customers")]
    pub customers: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_interarrival")]
    pub interarrival: DistributionConfig,
    #[serde(default = "default_service")]
    pub service: DistributionConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            customers: default_customers(),
            seed: None,
            interarrival: default_interarrival(),
            service: default_service(),
        }
    }
}

/// Duration distribution in minutes of logical time.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DistributionConfig {
    /// Uniform on `[low, high)`.
    Uniform { low: f64, high: f64 },
    Constant { value: f64 },
}

impl DistributionConfig {
    pub fn validate(&self, name: &'static str) -> crate::error::Result<()> {
        let reason = match *self {
            DistributionConfig::Uniform { low, high } => {
                if !low.is_finite() || !high.is_finite() {
                    Some(format!("bounds must be finite (got {}, {})", low, high))
                } else if low <= 0.0 {
                    Some(format!("low must be > 0 (got {})", low))
                } else if high <= low {
                    Some(format!("high must be > low (got {} <= {})", high, low))
                } else {
                    None
                }
            }
            DistributionConfig::Constant { value } => {
                if !value.is_finite() || value <= 0.0 {
                    Some(format!("value must be finite and > 0 (got {})", value))
                } else {
                    None
                }
            }
        };

        match reason {
            Some(reason) => Err(crate::error::Error::InvalidDistribution { name, reason }),
            None => Ok(()),
        }
    }
}

impl fmt::Display for DistributionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionConfig::Uniform { low, high } => write!(f, "uniform[{}, {})", low, high),
            DistributionConfig::Constant { value } => write!(f, "constant({})", value),
        }
    }
}

fn default_customers() -> usize {
    DEFAULT_CUSTOMERS
}

fn default_interarrival() -> DistributionConfig {
    DistributionConfig::Uniform {
        low: 1.0,
        high: 8.0,
    }
}

fn default_service() -> DistributionConfig {
    DistributionConfig::Uniform {
        low: 1.0,
        high: 6.0,
    }
}
