//! Display name value object.

use std::fmt;

use irori_shared::protocol::{NameError, validate_display_name};

/// A display name accepted by the handshake.
///
/// Never blank and never the reserved server name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse the raw first line sent by a client.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        validate_display_name(raw).map(|name| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DisplayName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
