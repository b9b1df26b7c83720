use serde::{Deserialize, Serialize};

/// How the host re-invokes a function after a failure
///
/// Interval values are duration literals carried through verbatim. They are
/// parsed by the consuming host, never here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "camelCase")]
pub enum RetryPolicy {
    #[default]
    None,

    #[serde(rename_all = "camelCase")]
    FixedDelay {
        max_retry_count: i32,
        delay_interval: String,
    },

    #[serde(rename_all = "camelCase")]
    ExponentialBackoff {
        max_retry_count: i32,
        minimum_interval: String,
        maximum_interval: String,
    },
}

impl RetryPolicy {
    pub fn fixed_delay(max_retry_count: i32, delay_interval: impl Into<String>) -> Self {
        RetryPolicy::FixedDelay {
            max_retry_count,
            delay_interval: delay_interval.into(),
        }
    }

    pub fn exponential_backoff(
        max_retry_count: i32,
        minimum_interval: impl Into<String>,
        maximum_interval: impl Into<String>,
    ) -> Self {
        RetryPolicy::ExponentialBackoff {
            max_retry_count,
            minimum_interval: minimum_interval.into(),
            maximum_interval: maximum_interval.into(),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, RetryPolicy::None)
    }

    /// Interval literals carried by this policy, labelled by field name
    pub fn intervals(&self) -> Vec<(&'static str, &str)> {
        match self {
            RetryPolicy::None => Vec::new(),
            RetryPolicy::FixedDelay { delay_interval, .. } => {
                vec![("DelayInterval", delay_interval.as_str())]
            }
            RetryPolicy::ExponentialBackoff {
                minimum_interval,
                maximum_interval,
                ..
            } => vec![
                ("MinimumInterval", minimum_interval.as_str()),
                ("MaximumInterval", maximum_interval.as_str()),
            ],
        }
    }
}
