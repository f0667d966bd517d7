use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A monetization offer the bot sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Service {
    TikTok,
    Facebook,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::TikTok, Service::Facebook];

    /// Stored in the database, in callback data and in payment metadata.
    pub fn as_str(&self) -> &'static str {
        match self {
            Service::TikTok => "tiktok",
            Service::Facebook => "facebook",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Service::TikTok => "TikTok",
            Service::Facebook => "Facebook",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Service {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tiktok" => Ok(Service::TikTok),
            "facebook" => Ok(Service::Facebook),
            other => Err(anyhow::anyhow!("Unknown service: {}", other)),
        }
    }
}
