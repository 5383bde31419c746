pub mod config_client;
pub mod error;
pub mod memory_sink;
pub mod message_sink;
pub mod model;
pub mod publisher_service;
pub mod zmq_client;

pub use crate::error::PublisherError;
