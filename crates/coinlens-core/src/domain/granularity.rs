use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Time bucket size for historical series. Points carry a calendar day, so
/// nothing finer than a day is offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Granularity {
    #[default]
    #[serde(rename = "1DAY")]
    OneDay,
    #[serde(rename = "7DAY")]
    OneWeek,
    #[serde(rename = "1MTH")]
    OneMonth,
}

impl Granularity {
    /// CoinAPI `period_id` spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneDay => "1DAY",
            Self::OneWeek => "7DAY",
            Self::OneMonth => "1MTH",
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "1DAY" | "1D" => Ok(Self::OneDay),
            "7DAY" | "1W" => Ok(Self::OneWeek),
            "1MTH" | "1MO" => Ok(Self::OneMonth),
            other => Err(ValidationError::InvalidGranularity {
                value: other.to_owned(),
            }),
        }
    }
}
