use crate::core::domain::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MIN_VMID: u32 = 100;
const MAX_VMID: u32 = 999_999_999;

/// A validated guest identifier (VM or container).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "super::serde_helpers::StringOrNumber", into = "u32")]
pub struct Vmid(u32);

impl Vmid {
    /// Creates a validated guest identifier.
    pub fn new(vmid: u32) -> Result<Self, ValidationError> {
        validate_vmid(vmid)?;
        Ok(Self(vmid))
    }

    /// Creates a guest identifier without validation.
    #[allow(unused)]
    pub(crate) fn new_unchecked(vmid: u32) -> Self {
        Self(vmid)
    }

    /// Returns the numeric identifier.
    pub fn get(&self) -> u32 {
        self.0
    }
}

/// Validates a guest identifier against the range Proxmox hands out.
fn validate_vmid(vmid: u32) -> Result<(), ValidationError> {
    if !(MIN_VMID..=MAX_VMID).contains(&vmid) {
        return Err(ValidationError::ConstraintViolation(format!(
            "VMID {} is outside the range {}-{}",
            vmid, MIN_VMID, MAX_VMID
        )));
    }
    Ok(())
}

impl TryFrom<super::serde_helpers::StringOrNumber> for Vmid {
    type Error = ValidationError;

    fn try_from(value: super::serde_helpers::StringOrNumber) -> Result<Self, Self::Error> {
        let text = value.into_string();
        let vmid = text
            .trim()
            .parse::<u32>()
            .map_err(|_| ValidationError::Format(format!("VMID '{}' is not a number", text)))?;
        Vmid::new(vmid)
    }
}

impl From<Vmid> for u32 {
    fn from(vmid: Vmid) -> Self {
        vmid.0
    }
}

impl fmt::Display for Vmid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
