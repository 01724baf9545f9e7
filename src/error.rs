use std::path::PathBuf;
use thiserror::Error;

/// Error type for every fallible operation in `mdpot`.
///
/// None of these are transient: integral evaluation is deterministic, so an
/// error always points at a configuration or programming mistake in the
/// caller.
#[derive(Error, Debug)]
pub enum MultipoleError {
    /// A requested capability exists in the interface but is not implemented,
    /// e.g. geometric derivatives of the multipole potential integrals.
    ///
    /// `location` is the source location of the offending call.
    #[error("{component}: {feature} is not implemented (called from {location})")]
    FeatureNotImplemented {
        component: &'static str,
        feature: String,
        location: String,
    },

    /// A shell pair (or shell index) lies outside what the integral object
    /// was sized for at construction.
    #[error("capacity exceeded for {what}: requested {requested}, capacity {capacity}")]
    CapacityExceeded {
        what: &'static str,
        requested: usize,
        capacity: usize,
    },

    /// A kernel parameter or charge-field entry is negative or not finite.
    #[error("invalid value for {name}: {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    /// A kernel parameter setter was called on an object using another kernel.
    #[error("kernel mismatch: operation requires the {expected} kernel, object uses {actual}")]
    KernelMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// The configuration file could not be read.
    #[error("I/O error at path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration is not valid TOML or does not match `MultipoleConfig`.
    #[error("failed to deserialize TOML configuration: {0}")]
    Deserialization(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, MultipoleError>;
