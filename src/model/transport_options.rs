use crate::error::PublisherError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub const DEFAULT_LINGER_MS: u32 = 2000;
pub const DEFAULT_SEND_QUEUE_CAPACITY: u32 = 1000;
pub const DEFAULT_SEND_TIMEOUT_MS: u32 = 2000;

/// What `send` does once the local queue holds `send_queue_capacity` messages.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "lowercase")]
pub enum SendPolicy {
    /// Wait up to `send_timeout_ms` for space, then fail with `QueueFull`.
    #[default]
    Block,
    /// Fail with `QueueFull` straight away.
    Reject,
}

impl FromStr for SendPolicy {
    type Err = PublisherError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "block" => Ok(SendPolicy::Block),
            "reject" => Ok(SendPolicy::Reject),
            other => Err(PublisherError::Config(format!(
                "unknown send policy {:?}, expected block or reject",
                other
            ))),
        }
    }
}

/// Socket level policies, applied before connecting.
#[derive(Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptions {
    pub linger_ms: u32,
    pub send_queue_capacity: u32,
    pub send_policy: SendPolicy,
    pub send_timeout_ms: u32,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            linger_ms: DEFAULT_LINGER_MS,
            send_queue_capacity: DEFAULT_SEND_QUEUE_CAPACITY,
            send_policy: SendPolicy::default(),
            send_timeout_ms: DEFAULT_SEND_TIMEOUT_MS,
        }
    }
}

impl TransportOptions {
    /// Checks that every bound is finite and representable by the socket.
    pub fn validate(&self) -> Result<(), PublisherError> {
        if self.send_queue_capacity == 0 {
            return Err(PublisherError::Config(
                "send queue capacity must be greater than zero".into(),
            ));
        }

        for (name, value) in [
            ("linger", self.linger_ms),
            ("send queue capacity", self.send_queue_capacity),
            ("send timeout", self.send_timeout_ms),
        ] {
            if i32::try_from(value).is_err() {
                return Err(PublisherError::Config(format!(
                    "{} {} is out of range",
                    name, value
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn defaults_match_collector_expectations() {
        let options = TransportOptions::default();

        check!(options.linger_ms == 2000);
        check!(options.send_queue_capacity == 1000);
        check!(options.send_policy == SendPolicy::Block);
        check!(options.validate().is_ok());
    }

    #[test]
    fn validate_rejects_unbounded_queue() {
        let options = TransportOptions {
            send_queue_capacity: 0,
            ..TransportOptions::default()
        };

        let_assert!(Err(PublisherError::Config(_)) = options.validate());
    }

    #[test]
    fn validate_rejects_values_beyond_socket_range() {
        let options = TransportOptions {
            linger_ms: u32::MAX,
            ..TransportOptions::default()
        };

        let_assert!(Err(PublisherError::Config(msg)) = options.validate());
        check!(msg.contains("linger"));
    }

    #[test]
    fn send_policy_parses_case_insensitively() {
        let_assert!(Ok(SendPolicy::Reject) = "Reject".parse::<SendPolicy>());
        let_assert!(Ok(SendPolicy::Block) = " block ".parse::<SendPolicy>());
        let_assert!(Err(PublisherError::Config(_)) = "drop".parse::<SendPolicy>());
    }
}
