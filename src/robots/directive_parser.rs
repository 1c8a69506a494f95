use crate::robots::robots_txt_document::RobotsTxtDocument;
use crate::robots::rule_group::RuleGroup;
use crate::robots::rule_pattern::RulePattern;
use std::mem;
use tracing::{debug, trace};

const COMMENT_MARKER: char = '#';
const FIELD_SEPARATOR: char = ':';

/// A recognised `field: value` line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive<'a> {
    UserAgent(&'a str),
    Allow(&'a str),
    Disallow(&'a str),
    Sitemap(&'a str),
    CrawlDelay(&'a str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    Directive(Directive<'a>),
    /// Comment only, no separator, or an unknown field.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Start,
    InAgentBlock,
    InRuleBlock,
}

/// Classifies a single, already trimmed, line.
///
/// The field name is everything before the first `:`, so values such as
/// `http://example.com:8080/sitemap.xml` come through untouched.
pub fn classify_line(line: &str) -> LineKind<'_> {
    if line.is_empty() {
        return LineKind::Blank;
    }

    let content = match line.find(COMMENT_MARKER) {
        Some(index) => &line[..index],
        None => line,
    };

    let Some((field, value)) = content.split_once(FIELD_SEPARATOR) else {
        return LineKind::Ignored;
    };
    let value = value.trim();

    let directive = match field.trim().to_lowercase().as_str() {
        "user-agent" => Directive::UserAgent(value),
        "allow" => Directive::Allow(value),
        "disallow" => Directive::Disallow(value),
        "sitemap" => Directive::Sitemap(value),
        "crawl-delay" => Directive::CrawlDelay(value),
        _ => return LineKind::Ignored,
    };
    LineKind::Directive(directive)
}

/// Line-at-a-time state machine building a [`RobotsTxtDocument`].
#[derive(Debug)]
pub struct DirectiveParser {
    state: ParserState,
    current: RuleGroup,
    groups: Vec<RuleGroup>,
    sitemaps: Vec<String>,
}

impl DirectiveParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::Start,
            current: RuleGroup::new(),
            groups: Vec::new(),
            sitemaps: Vec::new(),
        }
    }

    pub fn feed(&mut self, line: &str) {
        match classify_line(line) {
            LineKind::Blank => self.end_block(),
            LineKind::Directive(directive) => {
                trace!(?directive, "directive");
                self.apply(directive);
            }
            LineKind::Ignored => {
                if !line.starts_with(COMMENT_MARKER) {
                    debug!(line, "skipping unrecognised line");
                }
            }
        }
    }

    pub fn finish(mut self) -> RobotsTxtDocument {
        if self.state == ParserState::InRuleBlock {
            self.finalize_group();
        } else if self.state == ParserState::InAgentBlock {
            debug!(agents = ?self.current.agents(), "dropping agent block without rules");
        }
        RobotsTxtDocument::new(self.groups, self.sitemaps)
    }

    fn end_block(&mut self) {
        match self.state {
            ParserState::Start => {}
            ParserState::InAgentBlock => {
                debug!(agents = ?self.current.agents(), "dropping agent block without rules");
                self.current = RuleGroup::new();
            }
            ParserState::InRuleBlock => self.finalize_group(),
        }
        self.state = ParserState::Start;
    }

    fn apply(&mut self, directive: Directive<'_>) {
        match directive {
            Directive::UserAgent(agent) => {
                if self.state == ParserState::InRuleBlock {
                    self.finalize_group();
                }
                self.state = ParserState::InAgentBlock;
                if !agent.is_empty() {
                    self.current.add_agent(agent);
                }
            }
            Directive::Allow(path) | Directive::Disallow(path) => {
                if self.state == ParserState::Start {
                    return;
                }
                self.state = ParserState::InRuleBlock;
                if !path.is_empty() {
                    let allowed = matches!(directive, Directive::Allow(_));
                    self.current.add_rule(RulePattern::new(path, allowed));
                }
            }
            Directive::Sitemap(location) => self.sitemaps.push(location.to_owned()),
            Directive::CrawlDelay(delay) => {
                if self.state == ParserState::Start {
                    return;
                }
                self.state = ParserState::InRuleBlock;
                self.current.set_crawl_delay(delay);
            }
        }
    }

    fn finalize_group(&mut self) {
        let group = mem::take(&mut self.current);
        self.groups.push(group);
    }
}

impl Default for DirectiveParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a document from lines that are already trimmed.
pub fn parse<I, S>(lines: I) -> RobotsTxtDocument
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut parser = DirectiveParser::new();
    for line in lines {
        parser.feed(line.as_ref());
    }
    parser.finish()
}
