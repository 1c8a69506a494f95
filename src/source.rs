mod robots_txt_source;
mod source_config;
mod source_error;

pub use robots_txt_source::{RobotsTxtSource, robots_txt_location};
pub use source_config::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, SourceConfig};
pub use source_error::SourceError;
