use crate::error::PublisherError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sampling configuration handed to the collector. Field order is the wire
/// order: `metrics` first, then `sample_period`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct ConfigurationRecord {
    metrics: String,
    sample_period: String,
}

impl ConfigurationRecord {
    /// Builds a validated record. The sample period may be given as a string
    /// or a number; it is carried as a string either way. Surrounding
    /// whitespace is dropped from both fields.
    pub fn new(
        metrics: impl Into<String>,
        sample_period: impl ToString,
    ) -> Result<Self, PublisherError> {
        let metrics = metrics.into().trim().to_string();
        let sample_period = sample_period.to_string().trim().to_string();

        if metrics.is_empty() {
            return Err(PublisherError::Validation(
                "metric name must not be empty".into(),
            ));
        }
        if sample_period.is_empty() {
            return Err(PublisherError::Validation(
                "sample period must not be empty".into(),
            ));
        }

        let seconds: f64 = sample_period.parse().map_err(|_| {
            PublisherError::Validation(format!(
                "sample period {:?} is not a number",
                sample_period
            ))
        })?;
        if !seconds.is_finite() || seconds <= 0.0 {
            return Err(PublisherError::Validation(format!(
                "sample period {:?} must be a positive number of seconds",
                sample_period
            )));
        }

        Ok(Self {
            metrics,
            sample_period,
        })
    }

    pub fn metrics(&self) -> &str {
        &self.metrics
    }

    pub fn sample_period(&self) -> &str {
        &self.sample_period
    }

    /// Encodes the record as a MessagePack map keyed by field name.
    pub fn to_envelope(&self) -> Result<Vec<u8>, PublisherError> {
        Ok(rmp_serde::to_vec_named(self)?)
    }

    /// Decodes an envelope produced by [`ConfigurationRecord::to_envelope`].
    /// Anything but the exact two-key shape is rejected.
    pub fn from_envelope(envelope: &[u8]) -> Result<Self, PublisherError> {
        let decoded: ConfigurationRecord = rmp_serde::from_slice(envelope)?;

        Self::new(decoded.metrics, decoded.sample_period)
    }
}

impl fmt::Display for ConfigurationRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
