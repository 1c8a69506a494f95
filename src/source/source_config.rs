use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = "rusty-robots";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct SourceConfig {
    user_agent: String,
    timeout: Duration,
}

impl SourceConfig {
    pub fn new(user_agent: &str, timeout: Duration) -> Self {
        Self {
            user_agent: user_agent.to_owned(),
            timeout,
        }
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_USER_AGENT, DEFAULT_TIMEOUT)
    }
}
