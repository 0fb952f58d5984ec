//! Purchase configuration

use std::time::Duration;

use crate::domain::value_object::reward_policy::RewardPolicy;

#[derive(Debug, Clone)]
pub struct PurchaseConfig {
    pub reward_policy: RewardPolicy,
    /// Upper bound on broadcast + receipt wait during Close
    pub settlement_timeout: Duration,
}

impl Default for PurchaseConfig {
    fn default() -> Self {
        Self {
            reward_policy: RewardPolicy::Absolute,
            settlement_timeout: Duration::from_secs(120),
        }
    }
}

impl PurchaseConfig {
    /// Shorter timeout so a stuck dev node fails fast
    pub fn development() -> Self {
        Self {
            settlement_timeout: Duration::from_secs(30),
            ..Default::default()
        }
    }
}
