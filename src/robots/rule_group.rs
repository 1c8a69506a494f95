use crate::robots::path_matcher::WILDCARD;
use crate::robots::rule_pattern::RulePattern;
use std::fmt;

/// The rules and crawl delay shared by one or more user agents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleGroup {
    agents: Vec<String>,
    rules: Vec<RulePattern>,
    crawl_delay: Option<String>,
}

impl RuleGroup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn agents(&self) -> &[String] {
        &self.agents
    }

    /// Rules in the order they were declared.
    pub fn rules(&self) -> &[RulePattern] {
        &self.rules
    }

    pub fn crawl_delay(&self) -> Option<&str> {
        self.crawl_delay.as_deref()
    }

    /// Only the product token, the part before the first `/`, is compared
    /// against the stored agent names.
    pub fn applies_to(&self, user_agent: &str) -> bool {
        let token = user_agent.split('/').next().unwrap_or_default();
        self.agents
            .iter()
            .any(|agent| agent == WILDCARD || token.starts_with(agent.as_str()))
    }

    /// First matching rule wins; no matching rule means allowed.
    pub fn is_allowed(&self, path: &str) -> bool {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(path))
            .is_none_or(RulePattern::allowed)
    }

    pub(crate) fn add_agent(&mut self, agent: &str) {
        self.agents.push(agent.to_owned());
    }

    pub(crate) fn add_rule(&mut self, rule: RulePattern) {
        self.rules.push(rule);
    }

    pub(crate) fn set_crawl_delay(&mut self, delay: &str) {
        self.crawl_delay = Some(delay.to_owned());
    }
}

impl fmt::Display for RuleGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AGENTS:")?;
        for (index, agent) in self.agents.iter().enumerate() {
            writeln!(f, "\t{}: {}", index, agent)?;
        }

        write!(f, "\n\nRULES:\n\n")?;
        for (index, rule) in self.rules.iter().enumerate() {
            writeln!(f, "\t{}: {}", index, rule)?;
        }

        writeln!(
            f,
            "\n\nCRAWL DELAY: {}",
            self.crawl_delay.as_deref().unwrap_or_default()
        )
    }
}
