//! Resolved ownership outcome of an iteration

use crate::error::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

/// How each element reaches the loop body
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OwnershipMode {
    /// Elements are duplicated, the container is untouched
    Copy,
    /// Elements (and growable storage) are moved out
    Move,
    /// Read-only references into existing storage
    Borrow,
    /// Exclusive references into existing storage
    MutableBorrow,
}

impl OwnershipMode {
    /// True when the source binding is invalidated afterwards
    pub fn consumes_container(self) -> bool {
        self == OwnershipMode::Move
    }
}

/// Result of resolving one query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub ownership_mode: OwnershipMode,
    pub mutates_elements: bool,
    pub container_usable_after: bool,
    /// Always `true` for outcomes from [`Resolver::resolve`]; a query that
    /// pairs an exclusive form with an immutable binding cannot be built, so
    /// it is rejected as [`InvalidQuery`] instead. Decoded outcomes keep
    /// whatever flag they were encoded with.
    ///
    /// [`Resolver::resolve`]: crate::resolve::Resolver::resolve
    /// [`InvalidQuery`]: crate::error::InvalidQuery
    pub valid: bool,
}

impl Outcome {
    pub(crate) fn of(mode: OwnershipMode) -> Self {
        Self {
            ownership_mode: mode,
            mutates_elements: mode == OwnershipMode::MutableBorrow,
            container_usable_after: !mode.consumes_container(),
            valid: true,
        }
    }

    /// Compact text form: `mode:mutates:usable:valid`, booleans as `0`/`1`
    ///
    /// # Example
    /// ```
    /// use iterown::outcome::{Outcome, OwnershipMode};
    ///
    /// let outcome = Outcome::decode("copy:0:1:1").unwrap();
    /// assert_eq!(outcome.ownership_mode, OwnershipMode::Copy);
    /// assert_eq!(outcome.encode(), "copy:0:1:1");
    /// ```
    pub fn encode(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.ownership_mode,
            flag(self.mutates_elements),
            flag(self.container_usable_after),
            flag(self.valid)
        )
    }

    /// Parse the compact form produced by [`Outcome::encode`]
    pub fn decode(code: &str) -> Result<Self, ParseError> {
        let malformed = |reason: &str| ParseError::MalformedCode {
            code: code.to_string(),
            reason: reason.to_string(),
        };

        let parts: Vec<&str> = code.trim().split(':').collect();
        let [mode, mutates, usable, valid] = parts.as_slice() else {
            return Err(malformed("expected four ':'-separated fields"));
        };

        let ownership_mode =
            OwnershipMode::from_str(*mode).map_err(|_| malformed("unknown ownership mode"))?;
        let parse_flag = |text: &str| match text {
            "0" => Ok(false),
            "1" => Ok(true),
            _ => Err(malformed("flags must be 0 or 1")),
        };

        Ok(Self {
            ownership_mode,
            mutates_elements: parse_flag(*mutates)?,
            container_usable_after: parse_flag(*usable)?,
            valid: parse_flag(*valid)?,
        })
    }
}

fn flag(value: bool) -> char {
    if value {
        '1'
    } else {
        '0'
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, mutates: {}, usable after: {}}}",
            self.ownership_mode, self.mutates_elements, self.container_usable_after
        )
    }
}

impl FromStr for Outcome {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Outcome::decode(s)
    }
}
