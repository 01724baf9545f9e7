//! Construction settings for multipole potential integrals, loadable from TOML.
//!
//! A configuration names the multipole order, the derivative order (which
//! must be 0), the interaction kernel and, optionally, a probe origin:
//!
//! ```toml
//! order = 2
//! origin = [0.0, 0.0, 1.4]
//!
//! [kernel]
//! type = "range_separated"
//! omega = 0.4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MultipoleError, Result};
use crate::recur::CoulombKernel;

/// Settings consumed by `MultipolePotentialInt::from_config`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MultipoleConfig {
    /// Highest derivative order of the potential (0 = monopole only).
    pub order: usize,
    /// Geometric derivative order of the integrals. Only 0 is implemented.
    pub deriv: usize,
    /// Single probe point with unit weight.
    ///
    /// When absent, the bare kernel probes (0, 0, 0) and the regularized and
    /// range-separated kernels use the nuclear charges of the first basis.
    pub origin: Option<[f64; 3]>,
    /// Interaction kernel, `type = "coulomb"` when omitted.
    pub kernel: CoulombKernel,
}

impl Default for MultipoleConfig {
    fn default() -> Self {
        MultipoleConfig {
            order: 0,
            deriv: 0,
            origin: None,
            kernel: CoulombKernel::Coulomb,
        }
    }
}

impl MultipoleConfig {
    /// Reads and parses a TOML file.
    ///
    /// # Errors
    ///
    /// `MultipoleError::Io` if the file cannot be read, otherwise the errors
    /// of [`MultipoleConfig::from_toml_str`].
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| MultipoleError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a TOML document and checks the kernel parameters.
    ///
    /// # Errors
    ///
    /// `MultipoleError::Deserialization` for malformed TOML or unknown keys,
    /// `MultipoleError::InvalidParameter` for a negative or non-finite η or ω.
    pub fn from_toml_str(toml_str: &str) -> Result<Self> {
        let config: MultipoleConfig = toml::from_str(toml_str)?;
        config.kernel.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string(self)
    }
}
