//! Chat id normalization.

use std::fmt;

use serde::{Deserialize, Serialize};

const USER_SUFFIX: &str = "@c.us";
const GROUP_SUFFIX: &str = "@g.us";

/// A fully-qualified chat id (`<number>@c.us` or `<group>@g.us`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(String);

impl ChatId {
    /// Normalize operator input into a chat id.
    ///
    /// Inputs already carrying a `@c.us`/`@g.us` suffix pass through
    /// unchanged. Bare ids containing a hyphen are treated as groups;
    /// everything else as a direct chat.
    pub fn normalize(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.ends_with(USER_SUFFIX) || trimmed.ends_with(GROUP_SUFFIX) {
            return Self(trimmed.to_string());
        }
        let suffix = if trimmed.contains('-') {
            GROUP_SUFFIX
        } else {
            USER_SUFFIX
        };
        Self(format!("{trimmed}{suffix}"))
    }

    pub fn is_group(&self) -> bool {
        self.0.ends_with(GROUP_SUFFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_number_becomes_user_chat() {
        assert_eq!(ChatId::normalize("4915112345678").as_str(), "4915112345678@c.us");
    }

    #[test]
    fn hyphenated_id_becomes_group_chat() {
        let id = ChatId::normalize("12345-67890");
        assert_eq!(id.as_str(), "12345-67890@g.us");
        assert!(id.is_group());
    }

    #[test]
    fn qualified_ids_pass_through() {
        assert_eq!(ChatId::normalize("123@c.us").as_str(), "123@c.us");
        assert_eq!(ChatId::normalize("12345-67890@g.us").as_str(), "12345-67890@g.us");
    }

    #[test]
    fn surrounding_whitespace_is_stripped() {
        assert_eq!(ChatId::normalize("  123 \n").as_str(), "123@c.us");
    }
}
