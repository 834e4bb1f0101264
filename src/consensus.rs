//! Validator admission: a fixed whitelist of identities allowed to propose blocks.

use crate::config::ValidatorConfig;
use crate::error::ChainError;
use std::collections::BTreeSet;
use tracing::warn;

/// Read-only set of authorized validators. There is no way to add or remove
/// members once the registry is built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatorRegistry {
    validators: BTreeSet<String>,
}

impl ValidatorRegistry {
    pub fn new<I, S>(validators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            validators: validators.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ValidatorConfig) -> Self {
        Self::new(config.authorized.iter().cloned())
    }

    pub fn is_authorized(&self, validator: &str) -> bool {
        self.validators.contains(validator)
    }

    pub fn ensure_authorized(&self, validator: &str) -> Result<(), ChainError> {
        if self.is_authorized(validator) {
            Ok(())
        } else {
            warn!("Validator {} is not in the authorized set", validator);
            Err(ChainError::UnauthorizedValidator(validator.to_string()))
        }
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.validators.iter().map(String::as_str)
    }
}
