//! Agent configuration
//!
//! The financial assumptions used by the analytics agents. Constructed once
//! at startup and passed by value to the dispatcher; never mutated afterwards.

use std::env;

/// Fixed financial assumptions shared by the analytics agents.
#[derive(Debug, Clone, Copy)]
pub struct AgentConfig {
    /// Savings goal for the budget plan, in LEI.
    pub savings_goal: f64,
    /// Months available to reach the savings goal.
    pub savings_horizon_months: u32,
    /// Assumed fixed monthly income, in LEI.
    pub monthly_income: f64,
    /// Annual return rate used for investment projections.
    pub annual_rate: f64,
    /// Projection horizons, in years.
    pub projection_years: [u32; 3],
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            savings_goal: 10_000.0,
            savings_horizon_months: 12,
            monthly_income: 10_000.0,
            annual_rate: 0.10,
            projection_years: [5, 10, 20],
        }
    }
}

impl AgentConfig {
    /// Build a config from the environment, falling back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            savings_goal: env_f64("AGENT_SAVINGS_GOAL", defaults.savings_goal),
            savings_horizon_months: env_u32(
                "AGENT_SAVINGS_HORIZON_MONTHS",
                defaults.savings_horizon_months,
            ),
            monthly_income: env_f64("AGENT_MONTHLY_INCOME", defaults.monthly_income),
            annual_rate: env_f64("AGENT_ANNUAL_RATE", defaults.annual_rate),
            projection_years: defaults.projection_years,
        }
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
