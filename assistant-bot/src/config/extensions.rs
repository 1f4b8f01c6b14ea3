//! Assistant settings: reminder timing, history context caps, session TTL.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use prompt::ContextLimits;
use reminder_scheduler::{LatePolicy, SchedulerConfig};

use crate::core::ConfigError;

/// Upper bound for `REMINDER_LEAD_MINUTES` (one year).
pub const MAX_REMINDER_LEAD_MINUTES: i64 = 525_600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantSettings {
    /// REMINDER_LEAD_MINUTES: how long before the stated time the reminder fires.
    pub reminder_lead_minutes: i64,
    /// REMINDER_POLL_INTERVAL_MS
    pub reminder_poll_interval_ms: u64,
    /// REMINDER_LATE_POLICY: `fire` or `reject`
    pub reminder_late_policy: LatePolicy,
    /// HISTORY_CONTEXT_MAX_PAIRS
    pub history_max_pairs: usize,
    /// HISTORY_CONTEXT_MAX_TOKENS
    pub history_max_tokens: usize,
    /// SESSION_IDLE_TTL_SECS
    pub session_idle_ttl_secs: u64,
}

impl Default for AssistantSettings {
    fn default() -> Self {
        Self {
            reminder_lead_minutes: 30,
            reminder_poll_interval_ms: 1000,
            reminder_late_policy: LatePolicy::FireImmediately,
            history_max_pairs: 10,
            history_max_tokens: 2000,
            session_idle_ttl_secs: 86_400,
        }
    }
}

/// Reads `var`; unset means `default`, set but unparsable is an error.
fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::invalid(var, value.as_str(), e.to_string())),
        Err(_) => Ok(default),
    }
}

impl AssistantSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let settings = Self {
            reminder_lead_minutes: parse_var("REMINDER_LEAD_MINUTES", defaults.reminder_lead_minutes)?,
            reminder_poll_interval_ms: parse_var(
                "REMINDER_POLL_INTERVAL_MS",
                defaults.reminder_poll_interval_ms,
            )?,
            reminder_late_policy: parse_var("REMINDER_LATE_POLICY", defaults.reminder_late_policy)?,
            history_max_pairs: parse_var("HISTORY_CONTEXT_MAX_PAIRS", defaults.history_max_pairs)?,
            history_max_tokens: parse_var("HISTORY_CONTEXT_MAX_TOKENS", defaults.history_max_tokens)?,
            session_idle_ttl_secs: parse_var("SESSION_IDLE_TTL_SECS", defaults.session_idle_ttl_secs)?,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0..=MAX_REMINDER_LEAD_MINUTES).contains(&self.reminder_lead_minutes) {
            return Err(ConfigError::invalid(
                "REMINDER_LEAD_MINUTES",
                self.reminder_lead_minutes.to_string(),
                format!("must be between 0 and {}", MAX_REMINDER_LEAD_MINUTES),
            ));
        }
        if self.reminder_poll_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "REMINDER_POLL_INTERVAL_MS",
                "0",
                "must be positive",
            ));
        }
        if self.session_idle_ttl_secs == 0 {
            return Err(ConfigError::invalid("SESSION_IDLE_TTL_SECS", "0", "must be positive"));
        }
        Ok(())
    }

    /// Lead as a duration, clamped to the range `validate` accepts.
    pub fn reminder_lead(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.reminder_lead_minutes.clamp(0, MAX_REMINDER_LEAD_MINUTES))
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: Duration::from_millis(self.reminder_poll_interval_ms),
            late_policy: self.reminder_late_policy,
        }
    }

    pub fn context_limits(&self) -> ContextLimits {
        ContextLimits {
            max_pairs: self.history_max_pairs,
            max_tokens: self.history_max_tokens,
        }
    }

    pub fn session_idle_ttl(&self) -> Duration {
        Duration::from_secs(self.session_idle_ttl_secs)
    }
}
