/******************************************************************************
 * Copyright ContinuousC. Licensed under the "Elastic License 2.0".           *
 ******************************************************************************/

use std::{convert::Infallible, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_with::{DeserializeFromStr, SerializeDisplay};

/// One inbound Zabbix notification, decoded from the webhook request
/// body. All fields except `event_id` may be empty; `event_id` is the
/// correlation key and is validated by the handler before any store
/// access.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Alert {
    pub trigger_id: String,
    pub trigger_name: String,
    pub status: AlertStatus,
    pub severity: String,
    pub host: String,
    pub event_id: String,
    pub message: String,
    pub secret: String,
}

/// The status field sent by Zabbix. Not a closed set at the wire
/// level: anything besides PROBLEM / RESOLVED is kept verbatim and
/// treated as informational.
#[derive(SerializeDisplay, DeserializeFromStr, PartialEq, Eq, Clone, Debug)]
pub enum AlertStatus {
    Problem,
    Resolved,
    Other(String),
}

impl Default for AlertStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl FromStr for AlertStatus {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "PROBLEM" => Self::Problem,
            "RESOLVED" => Self::Resolved,
            _ => Self::Other(s.to_string()),
        })
    }
}

impl Display for AlertStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Problem => write!(f, "PROBLEM"),
            Self::Resolved => write!(f, "RESOLVED"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}
