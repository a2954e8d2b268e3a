//! iTIP methods (RFC 5546 §1.4).

use std::fmt;
use std::str::FromStr;

use crate::error::RfcError;

/// iTIP method carried in the METHOD property of a scheduling message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Publish,
    Request,
    Reply,
    Add,
    Cancel,
    Refresh,
    Counter,
    DeclineCounter,
}

impl Method {
    /// Returns the METHOD token.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Publish => "PUBLISH",
            Self::Request => "REQUEST",
            Self::Reply => "REPLY",
            Self::Add => "ADD",
            Self::Cancel => "CANCEL",
            Self::Refresh => "REFRESH",
            Self::Counter => "COUNTER",
            Self::DeclineCounter => "DECLINECOUNTER",
        }
    }
}

impl FromStr for Method {
    type Err = RfcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PUBLISH" => Ok(Self::Publish),
            "REQUEST" => Ok(Self::Request),
            "REPLY" => Ok(Self::Reply),
            "ADD" => Ok(Self::Add),
            "CANCEL" => Ok(Self::Cancel),
            "REFRESH" => Ok(Self::Refresh),
            "COUNTER" => Ok(Self::Counter),
            "DECLINECOUNTER" => Ok(Self::DeclineCounter),
            _ => Err(RfcError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
