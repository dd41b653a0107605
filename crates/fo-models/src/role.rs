//! Actor roles
//!
//! Permission class of the user requesting a status change.

use fo_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    Admin,
    ServicePerson,
    ZoneUser,
    Customer,
}

impl ActorRole {
    pub const ALL: [ActorRole; 4] = [
        ActorRole::Admin,
        ActorRole::ServicePerson,
        ActorRole::ZoneUser,
        ActorRole::Customer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Admin => "ADMIN",
            ActorRole::ServicePerson => "SERVICE_PERSON",
            ActorRole::ZoneUser => "ZONE_USER",
            ActorRole::Customer => "CUSTOMER",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, ActorRole::Admin)
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace(['-', ' '], "_");
        ActorRole::ALL
            .iter()
            .copied()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "role".into(),
                message: format!("unknown role '{}'", s),
            })
    }
}
