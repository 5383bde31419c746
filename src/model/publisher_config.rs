use crate::config_client::SetDefaults;
use crate::model::{
    SendPolicy, TransportOptions, DEFAULT_LINGER_MS, DEFAULT_SEND_QUEUE_CAPACITY,
    DEFAULT_SEND_TIMEOUT_MS,
};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ENDPOINT: &str = "tcp://127.0.0.1:5557";

/// Publisher settings as they appear in a config file; unset fields are
/// filled in by `set_defaults`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PublisherConfig {
    pub endpoint: Option<String>,
    pub linger_ms: Option<u32>,
    pub send_queue_capacity: Option<u32>,
    pub send_policy: Option<SendPolicy>,
    pub send_timeout_ms: Option<u32>,
}

impl PublisherConfig {
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT)
    }

    pub fn transport_options(&self) -> TransportOptions {
        let defaults = TransportOptions::default();

        TransportOptions {
            linger_ms: self.linger_ms.unwrap_or(defaults.linger_ms),
            send_queue_capacity: self
                .send_queue_capacity
                .unwrap_or(defaults.send_queue_capacity),
            send_policy: self.send_policy.unwrap_or(defaults.send_policy),
            send_timeout_ms: self.send_timeout_ms.unwrap_or(defaults.send_timeout_ms),
        }
    }
}

impl SetDefaults for PublisherConfig {
    fn set_defaults(&mut self) {
        if self.endpoint.is_none() {
            self.endpoint = Some(DEFAULT_ENDPOINT.to_string());
        }
        if self.linger_ms.is_none() {
            self.linger_ms = Some(DEFAULT_LINGER_MS);
        }
        if self.send_queue_capacity.is_none() {
            self.send_queue_capacity = Some(DEFAULT_SEND_QUEUE_CAPACITY);
        }
        if self.send_policy.is_none() {
            self.send_policy = Some(SendPolicy::default());
        }
        if self.send_timeout_ms.is_none() {
            self.send_timeout_ms = Some(DEFAULT_SEND_TIMEOUT_MS);
        }
    }
}
