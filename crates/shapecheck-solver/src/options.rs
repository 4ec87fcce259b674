//! Policy knobs shared by the subtype engine and the value checker.

use crate::recursion::RecursionProfile;
use serde::{Deserialize, Serialize};

/// How a value is checked against a typed-record descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordMode {
    /// Only require the value to be a mapping.
    Nominal,
    /// Require a mapping whose keys and values follow the declared fields.
    #[default]
    Fields,
}

/// Options for a single check.
///
/// Every field has a default, so partial configuration documents deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckOptions {
    /// Depth limit of descriptor-vs-descriptor comparison.
    pub subtype_profile: RecursionProfile,
    /// Depth limit of value-vs-descriptor checking.
    pub value_profile: RecursionProfile,
    pub record_mode: RecordMode,
    /// Accept mapping keys a record does not declare.
    pub allow_extra_keys: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            subtype_profile: RecursionProfile::SubtypeCheck,
            value_profile: RecursionProfile::ValueCheck,
            record_mode: RecordMode::Fields,
            allow_extra_keys: false,
        }
    }
}

impl CheckOptions {
    /// Use the same custom depth limit for both engines.
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.subtype_profile = RecursionProfile::Custom { max_depth };
        self.value_profile = RecursionProfile::Custom { max_depth };
        self
    }

    pub fn with_subtype_profile(mut self, profile: RecursionProfile) -> Self {
        self.subtype_profile = profile;
        self
    }

    pub fn with_value_profile(mut self, profile: RecursionProfile) -> Self {
        self.value_profile = profile;
        self
    }

    pub fn with_record_mode(mut self, mode: RecordMode) -> Self {
        self.record_mode = mode;
        self
    }

    pub fn with_extra_keys(mut self, allow: bool) -> Self {
        self.allow_extra_keys = allow;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
