use crate::config_client::{ConfigClient, ConfigClientConfig, SetDefaults};
use crate::error::PublisherError;
use crate::message_sink::MessageSink;
use crate::model::{Endpoint, PublisherConfig, SendPolicy, TransportOptions};
use std::env;
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct ZmqClientConfig {
    endpoint: String,
    options: TransportOptions,
}

impl ZmqClientConfig {
    pub fn new(endpoint: &str, options: TransportOptions) -> Result<Self, PublisherError> {
        debug!(
            "ZmqClientConfig::new(endpoint: {}, options: {:?})",
            endpoint, options
        );

        options.validate()?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            options,
        })
    }

    /// Reads the optional YAML file at `CONFIG_PATH`, then lets the `ZMQ_*`
    /// environment variables override it.
    pub fn from_env() -> Result<Self, PublisherError> {
        let file_config = match ConfigClientConfig::from_env()? {
            Some(config) => ConfigClient::new(config).read_config_from_file()?,
            None => PublisherConfig::default(),
        };

        Self::from_lookup(file_config, |key| env::var(key).ok())
    }

    fn from_lookup<F>(mut config: PublisherConfig, lookup: F) -> Result<Self, PublisherError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("ZMQ_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }
        if let Some(value) = lookup("ZMQ_LINGER_MS") {
            config.linger_ms = Some(parse_number("ZMQ_LINGER_MS", &value)?);
        }
        if let Some(value) = lookup("ZMQ_SNDHWM") {
            config.send_queue_capacity = Some(parse_number("ZMQ_SNDHWM", &value)?);
        }
        if let Some(value) = lookup("ZMQ_SEND_POLICY") {
            config.send_policy = Some(value.parse()?);
        }
        if let Some(value) = lookup("ZMQ_SEND_TIMEOUT_MS") {
            config.send_timeout_ms = Some(parse_number("ZMQ_SEND_TIMEOUT_MS", &value)?);
        }

        config.set_defaults();

        Self::new(config.endpoint(), config.transport_options())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn options(&self) -> TransportOptions {
        self.options
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32, PublisherError> {
    value.trim().parse().map_err(|_| {
        PublisherError::Config(format!(
            "{} must be a non-negative integer, got {:?}",
            key, value
        ))
    })
}

/// Owns the transport context. Connecting hands the context over to the
/// resulting sink, so closing the sink tears the whole transport down.
pub struct ZmqClient {
    config: ZmqClientConfig,
    context: zmq::Context,
}

impl ZmqClient {
    pub fn new(config: ZmqClientConfig) -> ZmqClient {
        ZmqClient {
            config,
            context: zmq::Context::new(),
        }
    }

    pub fn from_env() -> Result<Self, PublisherError> {
        Ok(Self::new(ZmqClientConfig::from_env()?))
    }

    /// Opens a push socket towards the configured endpoint. Returns without
    /// waiting for a peer; until one attaches, messages wait in the local
    /// queue.
    pub fn connect(self) -> Result<ZmqPushSink, PublisherError> {
        let ZmqClient { config, context } = self;
        let endpoint = Endpoint::parse(&config.endpoint)?;
        let options = config.options;

        // ranges checked by TransportOptions::validate in ZmqClientConfig::new
        let socket = context.socket(zmq::PUSH)?;
        socket.set_linger(options.linger_ms as i32)?;
        socket.set_sndhwm(options.send_queue_capacity as i32)?;
        if options.send_policy == SendPolicy::Block {
            socket.set_sndtimeo(options.send_timeout_ms as i32)?;
        }
        if endpoint.is_ipv6() {
            socket.set_ipv6(true)?;
        }

        socket
            .connect(&endpoint.to_string())
            .map_err(|e| PublisherError::Address {
                endpoint: config.endpoint.clone(),
                reason: e.to_string(),
            })?;

        info!(
            "Connected push socket to {} (linger {} ms, queue capacity {}, policy {:?})",
            endpoint, options.linger_ms, options.send_queue_capacity, options.send_policy
        );

        Ok(ZmqPushSink {
            socket,
            context,
            endpoint,
            options,
        })
    }
}

/// Push side of a push/pull channel. Fields drop in declaration order: the
/// socket closes before the context terminates, and terminating waits for the
/// linger window.
pub struct ZmqPushSink {
    socket: zmq::Socket,
    context: zmq::Context,
    endpoint: Endpoint,
    options: TransportOptions,
}

impl MessageSink for ZmqPushSink {
    fn send(&mut self, envelope: Vec<u8>) -> Result<(), PublisherError> {
        let flags = match self.options.send_policy {
            SendPolicy::Block => 0,
            SendPolicy::Reject => zmq::DONTWAIT,
        };
        let size = envelope.len();

        match self.socket.send(envelope, flags) {
            Ok(()) => {
                debug!("Queued envelope of {} bytes for {}", size, self.endpoint);
                Ok(())
            }
            Err(zmq::Error::EAGAIN) => {
                warn!(
                    "Send queue for {} is full at {} messages",
                    self.endpoint, self.options.send_queue_capacity
                );
                Err(PublisherError::QueueFull {
                    capacity: self.options.send_queue_capacity,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn close(self: Box<Self>) -> Result<(), PublisherError> {
        let ZmqPushSink {
            socket,
            context,
            endpoint,
            options,
        } = *self;

        info!(
            "Closing push socket to {}, flushing for up to {} ms",
            endpoint, options.linger_ms
        );

        drop(socket);
        drop(context);

        debug!("Released transport context for {}", endpoint);

        Ok(())
    }
}
