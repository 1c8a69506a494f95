use crate::robots::path_matcher;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RulePattern {
    path: String,
    allowed: bool,
}

impl RulePattern {
    pub fn new(path: &str, allowed: bool) -> Self {
        Self {
            path: path.to_owned(),
            allowed,
        }
    }

    pub fn allow(path: &str) -> Self {
        Self::new(path, true)
    }

    pub fn disallow(path: &str) -> Self {
        Self::new(path, false)
    }

    /// The path exactly as written in the directive.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn allowed(&self) -> bool {
        self.allowed
    }

    pub fn applies_to(&self, path: &str) -> bool {
        path_matcher::matches(&self.path, path)
    }
}

impl fmt::Display for RulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operation = if self.allowed { "Allow" } else { "Disallow" };
        write!(f, "{}:{}", operation, self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_directive_form() {
        assert_eq!(RulePattern::allow("/public").to_string(), "Allow:/public");
        assert_eq!(RulePattern::disallow("/private").to_string(), "Disallow:/private");
    }

    #[test]
    fn keeps_raw_path() {
        let rule = RulePattern::disallow("/s?*rh=n%3A1380045031");
        assert_eq!(rule.path(), "/s?*rh=n%3A1380045031");
        assert!(rule.applies_to("/s?x&rh=n:1380045031"));
    }
}
