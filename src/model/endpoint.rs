use crate::error::PublisherError;
use std::fmt;
use url::Url;

/// A `tcp://<host>:<port>` address the push socket connects to.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn parse(raw: &str) -> Result<Self, PublisherError> {
        let invalid = |reason: &str| PublisherError::Address {
            endpoint: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw.trim()).map_err(|e| invalid(&e.to_string()))?;

        if url.scheme() != "tcp" {
            return Err(invalid("only tcp:// endpoints are supported"));
        }
        if !url.username().is_empty() || url.password().is_some() {
            return Err(invalid("credentials are not supported"));
        }
        if !url.path().is_empty() || url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("expected tcp://<host>:<port> without a path"));
        }

        let host = match url.host_str() {
            Some(host) if !host.is_empty() => host.to_string(),
            _ => return Err(invalid("missing host")),
        };
        let port = match url.port() {
            Some(0) | None => return Err(invalid("missing or zero port")),
            Some(port) => port,
        };

        Ok(Self { host, port })
    }

    /// Bracketed IPv6 literals need the socket's IPv6 option switched on.
    pub fn is_ipv6(&self) -> bool {
        self.host.starts_with('[')
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tcp://{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};

    #[test]
    fn parse_accepts_host_and_port() {
        let_assert!(Ok(endpoint) = Endpoint::parse("tcp://127.0.0.1:5557"));

        check!(!endpoint.is_ipv6());
        check!(endpoint.to_string() == "tcp://127.0.0.1:5557");
    }

    #[test]
    fn parse_accepts_names_and_ipv6() {
        let_assert!(Ok(named) = Endpoint::parse("tcp://collector.local:6000"));
        check!(named.to_string() == "tcp://collector.local:6000");
        check!(!named.is_ipv6());

        let_assert!(Ok(v6) = Endpoint::parse("tcp://[::1]:5557"));
        check!(v6.to_string() == "tcp://[::1]:5557");
        check!(v6.is_ipv6());
    }

    #[test]
    fn parse_rejects_malformed_addresses() {
        for raw in [
            "",
            "127.0.0.1:5557",
            "udp://127.0.0.1:5557",
            "ipc:///tmp/colmet",
            "tcp://127.0.0.1",
            "tcp://127.0.0.1:0",
            "tcp://127.0.0.1:70000",
            "tcp://127.0.0.1:port",
            "tcp://:5557",
            "tcp://127.0.0.1:5557/metrics",
            "tcp://user@127.0.0.1:5557",
        ] {
            let_assert!(Err(PublisherError::Address { endpoint, .. }) = Endpoint::parse(raw));
            check!(endpoint == raw);
        }
    }
}
