use crate::robots::RobotsTxtDocument;
use crate::source::source_config::SourceConfig;
use crate::source::source_error::SourceError;
use reqwest::StatusCode;
use std::io::BufRead;
use std::path::Path;
use tracing::{debug, info, warn};
use url::Url;

const ROBOTS_TXT_PATH: &str = "/robots.txt";

/// The trimmed lines of a robots.txt file, ready to be parsed.
#[derive(Debug, Clone, Default)]
pub struct RobotsTxtSource {
    lines: Vec<String>,
}

impl RobotsTxtSource {
    pub fn from_content(content: &str) -> Self {
        Self {
            lines: content.lines().map(|line| line.trim().to_owned()).collect(),
        }
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, SourceError> {
        let lines = reader
            .lines()
            .map(|line| line.map(|line| line.trim().to_owned()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { lines })
    }

    pub async fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "reading robots.txt");
        let content = tokio::fs::read_to_string(path).await?;
        Ok(Self::from_content(&content))
    }

    /// Fetches robots.txt from `location`. A missing file (404) yields an
    /// empty source, which places no restrictions.
    pub async fn load_from_url(location: &str, config: &SourceConfig) -> Result<Self, SourceError> {
        let robots_txt_url = parse_location(location)?;
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .timeout(config.timeout())
            .build()?;

        info!(url = %robots_txt_url, "fetching robots.txt");
        let robots_response = client.get(robots_txt_url.clone()).send().await?;
        if !robots_response.status().is_success() {
            if robots_response.status() == StatusCode::NOT_FOUND {
                warn!(url = %robots_txt_url, "no robots.txt found, treating as empty");
                return Ok(Self::default());
            }
            return Err(SourceError::HttpError(robots_response.status().as_u16()));
        }
        let content = robots_response.text().await?;
        Ok(Self::from_content(&content))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn document(&self) -> RobotsTxtDocument {
        RobotsTxtDocument::parse(&self.lines)
    }
}

/// The robots.txt location governing `page_url`.
pub fn robots_txt_location(page_url: &Url) -> Result<Url, SourceError> {
    check_scheme(page_url)?;
    let mut robots_txt_url = page_url.clone();
    robots_txt_url.set_path(ROBOTS_TXT_PATH);
    robots_txt_url.set_query(None);
    robots_txt_url.set_fragment(None);
    Ok(robots_txt_url)
}

fn parse_location(location: &str) -> Result<Url, SourceError> {
    let url = Url::parse(location)
        .map_err(|e| SourceError::InvalidLocation(format!("{}: {}", location, e)))?;
    check_scheme(&url)?;
    Ok(url)
}

fn check_scheme(url: &Url) -> Result<(), SourceError> {
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(()),
        _ => Err(SourceError::InvalidLocation(url.to_string())),
    }
}
