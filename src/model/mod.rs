mod configuration_record;
mod endpoint;
mod publisher_config;
mod transport_options;

pub use crate::model::configuration_record::ConfigurationRecord;
pub use crate::model::endpoint::Endpoint;
pub use crate::model::publisher_config::{PublisherConfig, DEFAULT_ENDPOINT};
pub use crate::model::transport_options::{
    SendPolicy, TransportOptions, DEFAULT_LINGER_MS, DEFAULT_SEND_QUEUE_CAPACITY,
    DEFAULT_SEND_TIMEOUT_MS,
};
