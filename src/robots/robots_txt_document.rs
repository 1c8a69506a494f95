use crate::robots::directive_parser;
use crate::robots::path_matcher::WILDCARD;
use crate::robots::rule_group::RuleGroup;
use crate::robots::rule_pattern::RulePattern;
use std::fmt;
use std::time::Duration;

const ROOT_PATH: &str = "/";

/// Site-wide verdict taken from a `/` rule in a `*` group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum GlobalRule {
    #[default]
    None,
    AllowAll,
    DisallowAll,
}

impl GlobalRule {
    /// The last `/` rule of any wildcard group decides.
    fn from_groups(groups: &[RuleGroup]) -> Self {
        groups
            .iter()
            .filter(|group| group.applies_to(WILDCARD))
            .flat_map(|group| group.rules())
            .filter(|rule| rule.path() == ROOT_PATH)
            .last()
            .map(|rule| {
                if rule.allowed() {
                    GlobalRule::AllowAll
                } else {
                    GlobalRule::DisallowAll
                }
            })
            .unwrap_or_default()
    }
}

/// A parsed robots.txt file. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RobotsTxtDocument {
    groups: Vec<RuleGroup>,
    sitemaps: Vec<String>,
    global_rule: GlobalRule,
}

impl RobotsTxtDocument {
    pub fn new(groups: Vec<RuleGroup>, sitemaps: Vec<String>) -> Self {
        let global_rule = GlobalRule::from_groups(&groups);
        Self {
            groups,
            sitemaps,
            global_rule,
        }
    }

    /// Parses lines that have already been trimmed.
    pub fn parse<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        directive_parser::parse(lines)
    }

    pub fn parse_str(content: &str) -> Self {
        directive_parser::parse(content.lines().map(str::trim))
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub fn sitemaps(&self) -> &[String] {
        &self.sitemaps
    }

    pub fn allow_all(&self) -> bool {
        self.global_rule == GlobalRule::AllowAll
    }

    pub fn disallow_all(&self) -> bool {
        self.global_rule == GlobalRule::DisallowAll
    }

    pub fn matching_groups<'a>(
        &'a self,
        user_agent: &str,
    ) -> impl Iterator<Item = &'a RuleGroup> {
        self.groups
            .iter()
            .filter(move |group| group.applies_to(user_agent))
    }

    /// Only the first group that applies to `user_agent` is consulted.
    pub fn can_fetch(&self, user_agent: &str, path: &str) -> bool {
        match self.global_rule {
            GlobalRule::DisallowAll => false,
            GlobalRule::AllowAll => true,
            GlobalRule::None => self
                .matching_groups(user_agent)
                .next()
                .is_none_or(|group| group.is_allowed(path)),
        }
    }

    pub fn crawl_delay(&self, user_agent: &str) -> Option<&str> {
        self.matching_groups(user_agent)
            .next()
            .and_then(RuleGroup::crawl_delay)
    }

    /// The crawl delay read as a number of seconds.
    pub fn crawl_delay_duration(&self, user_agent: &str) -> Option<Duration> {
        let seconds: f64 = self.crawl_delay(user_agent)?.parse().ok()?;
        Duration::try_from_secs_f64(seconds).ok()
    }

    pub fn allowed_paths(&self, user_agent: &str) -> Vec<&str> {
        self.paths_where(user_agent, true)
    }

    pub fn disallowed_paths(&self, user_agent: &str) -> Vec<&str> {
        self.paths_where(user_agent, false)
    }

    fn paths_where(&self, user_agent: &str, allowed: bool) -> Vec<&str> {
        self.matching_groups(user_agent)
            .flat_map(RuleGroup::rules)
            .filter(|rule| rule.allowed() == allowed)
            .map(RulePattern::path)
            .collect()
    }
}

impl fmt::Display for RobotsTxtDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NUMBER OF ENTRIES: {} ", self.groups.len())?;
        write!(f, "NUMBER OF SITEMAPS: {} ", self.sitemaps.len())?;
        for (index, group) in self.groups.iter().enumerate() {
            writeln!(f, "ENTRY: {} ", index)?;
            write!(f, "{}", group)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OVERLAPPING: &str = "User-agent:* \n\
                               Disallow:/foo \n\
                               \n\
                               User-agent:Bot \n\
                               Allow:/foo/bar \n\
                               Crawl-delay: 1.5\n\
                               \n\
                               User-agent:Bot-1 \n\
                               Disallow:/foo/bar/baz \n";

    #[test]
    fn empty_document_allows_everything() {
        let document = RobotsTxtDocument::parse_str("");
        assert!(document.can_fetch("Bot", "/anything"));
        assert_eq!(document.crawl_delay("Bot"), None);
        assert!(document.allowed_paths("Bot").is_empty());
    }

    #[test]
    fn disallow_all_shortcut() {
        let document = RobotsTxtDocument::parse_str("User-agent: *\nDisallow: / \n");
        assert!(document.disallow_all());
        assert!(!document.allow_all());
        assert!(!document.can_fetch("*", "/"));
        assert!(!document.can_fetch("Googlebot/2.1", "/a/b"));
    }

    #[test]
    fn allow_all_shortcut() {
        let document = RobotsTxtDocument::parse_str("User-agent: *\nAllow: / \n");
        assert!(document.allow_all());
        assert!(!document.disallow_all());
        assert!(document.can_fetch("*", "/private"));
    }

    #[test]
    fn last_root_rule_wins() {
        let document = RobotsTxtDocument::parse_str(
            "User-agent: *\nDisallow: /\n\nUser-agent: *\nAllow: /\n",
        );
        assert!(document.allow_all());
        assert!(!document.disallow_all());
    }

    #[test]
    fn root_rule_in_named_group_is_not_global() {
        let document = RobotsTxtDocument::parse_str("User-agent: voltron\nDisallow: /\n");
        assert!(!document.disallow_all());
        assert!(!document.can_fetch("voltron", "/x"));
        assert!(document.can_fetch("bender", "/x"));
    }

    #[test]
    fn first_matching_group_decides() {
        let document = RobotsTxtDocument::parse_str(OVERLAPPING);
        assert_eq!(document.matching_groups("Bot-1").count(), 3);
        assert!(!document.can_fetch("Bot-1", "/foo/bar"));
        assert!(document.can_fetch("Bot-1", "/elsewhere"));
    }

    #[test]
    fn crawl_delay_of_first_matching_group() {
        let document = RobotsTxtDocument::parse_str(OVERLAPPING);
        assert_eq!(document.crawl_delay("Bot"), None);

        let document = RobotsTxtDocument::parse_str(
            "User-agent: slow\nCrawl-delay: 1.5\n\nUser-agent: *\nCrawl-delay: 10\n",
        );
        assert_eq!(document.crawl_delay("slow"), Some("1.5"));
        assert_eq!(
            document.crawl_delay_duration("slow"),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(document.crawl_delay("fast"), Some("10"));
    }

    #[test]
    fn unparsable_crawl_delay_has_no_duration() {
        let document = RobotsTxtDocument::parse_str(
            "User-agent: neg\nCrawl-delay: -1\n\nUser-agent: *\nCrawl-delay: soon\n",
        );
        assert_eq!(document.crawl_delay("*"), Some("soon"));
        assert_eq!(document.crawl_delay_duration("*"), None);
        assert_eq!(document.crawl_delay_duration("neg"), None);
    }

    #[test]
    fn paths_are_flattened_across_groups() {
        let document = RobotsTxtDocument::parse_str(OVERLAPPING);
        assert_eq!(document.allowed_paths("Bot-1"), ["/foo/bar"]);
        assert_eq!(document.disallowed_paths("Bot-1"), ["/foo", "/foo/bar/baz"]);
        assert_eq!(document.disallowed_paths("Other"), ["/foo"]);
    }

    #[test]
    fn display_summarises_document() {
        let document =
            RobotsTxtDocument::parse_str("User-agent: *\nDisallow: /x\nSitemap: /s.xml\n");
        let dump = document.to_string();
        assert!(
            dump.starts_with("NUMBER OF ENTRIES: 1 NUMBER OF SITEMAPS: 1 ENTRY: 0 \nAGENTS:")
        );
        assert!(dump.contains("\t0: Disallow:/x"));
    }

    #[test]
    fn results_outlive_the_agent_string() {
        let document = RobotsTxtDocument::parse_str(OVERLAPPING);
        let (groups, disallowed, delay) = {
            let agent = String::from("Bot-1/2.0");
            let groups: Vec<&RuleGroup> = document.matching_groups(&agent).collect();
            (groups, document.disallowed_paths(&agent), document.crawl_delay(&agent))
        };
        assert_eq!(groups.len(), 3);
        assert_eq!(disallowed, ["/foo", "/foo/bar/baz"]);
        assert_eq!(delay, None);
    }
}
