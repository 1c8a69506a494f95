mod directive_parser;
mod path_matcher;
mod robots_txt_document;
mod rule_group;
mod rule_pattern;

pub use directive_parser::{Directive, DirectiveParser, LineKind, classify_line, parse};
pub use path_matcher::{END_ANCHOR, WILDCARD, decode_path, matches, normalize_path};
pub use robots_txt_document::RobotsTxtDocument;
pub use rule_group::RuleGroup;
pub use rule_pattern::RulePattern;
