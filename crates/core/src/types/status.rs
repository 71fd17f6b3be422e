//! Contact message workflow status.

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not one of `new`, `read`, `replied`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid message status: {0} (expected new, read or replied)")]
pub struct ParseStatusError(pub String);

/// Where an inbound contact message sits in the admin's inbox.
///
/// Every message starts as [`MessageStatus::New`]; only an admin moves it on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    New,
    Read,
    Replied,
}

impl MessageStatus {
    /// All statuses in inbox order.
    pub const ALL: [Self; 3] = [Self::New, Self::Read, Self::Replied];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Read => "read",
            Self::Replied => "replied",
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MessageStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(Self::New),
            "read" => Ok(Self::Read),
            "replied" => Ok(Self::Replied),
            _ => Err(ParseStatusError(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_format() {
        assert_eq!(serde_json::to_string(&MessageStatus::Replied).unwrap(), "\"replied\"");
        let status: MessageStatus = serde_json::from_str("\"read\"").unwrap();
        assert_eq!(status, MessageStatus::Read);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("NEW".parse::<MessageStatus>().unwrap(), MessageStatus::New);
        assert_eq!(
            "archived".parse::<MessageStatus>(),
            Err(ParseStatusError("archived".to_owned()))
        );
    }
}
