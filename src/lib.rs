pub mod robots;
pub mod source;

pub use robots::{RobotsTxtDocument, RuleGroup, RulePattern};
pub use source::{RobotsTxtSource, SourceConfig, SourceError};
