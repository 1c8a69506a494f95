use clap::Parser;
use futures::future::join_all;
use rusty_robots::RobotsTxtDocument;
use rusty_robots::source::{
    DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, RobotsTxtSource, SourceConfig, robots_txt_location,
};
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CommandLineArgs {
    /// User agent to check permissions for and to send when fetching
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    agent: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,

    /// Read robots.txt from a local file
    #[arg(long, value_name = "PATH", conflicts_with = "robots")]
    file: Option<PathBuf>,

    /// Fetch robots.txt from this URL
    #[arg(long, value_name = "URL")]
    robots: Option<String>,

    /// Print the parsed document
    #[arg(long)]
    dump: bool,

    /// URLs (or paths, with --file/--robots) to check
    #[arg(value_name = "URL_OR_PATH")]
    targets: Vec<String>,
}

/// The part of `target` that robots.txt rules are matched against.
fn target_path(target: &str) -> String {
    match Url::parse(target) {
        Ok(url) if url.has_host() => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_owned(),
        },
        _ => target.to_owned(),
    }
}

fn print_report(
    origin: &str,
    document: &RobotsTxtDocument,
    targets: &[String],
    args: &CommandLineArgs,
) {
    println!("# {}", origin);
    if args.dump {
        println!("{}", document);
    }
    for target in targets {
        let verdict = if document.can_fetch(&args.agent, &target_path(target)) {
            "allowed"
        } else {
            "disallowed"
        };
        println!("{}: {}", target, verdict);
    }
    if let Some(delay) = document.crawl_delay(&args.agent).filter(|delay| !delay.is_empty()) {
        println!("crawl-delay: {}", delay);
    }
    for sitemap in document.sitemaps() {
        println!("sitemap: {}", sitemap);
    }
}

/// Groups targets by the robots.txt that governs them, keeping first-seen order.
fn group_by_site(targets: &[String]) -> anyhow::Result<Vec<(Url, Vec<String>)>> {
    let mut sites: Vec<(Url, Vec<String>)> = Vec::new();
    for target in targets {
        let location = robots_txt_location(&Url::parse(target)?)?;
        match sites.iter_mut().find(|(site, _)| *site == location) {
            Some((_, site_targets)) => site_targets.push(target.clone()),
            None => sites.push((location, vec![target.clone()])),
        }
    }
    Ok(sites)
}

async fn main_impl(args: &CommandLineArgs) -> anyhow::Result<()> {
    let config = SourceConfig::new(&args.agent, Duration::from_secs(args.timeout));

    if let Some(path) = &args.file {
        let source = RobotsTxtSource::load_from_file(path).await?;
        print_report(&path.display().to_string(), &source.document(), &args.targets, args);
        return Ok(());
    }

    if let Some(location) = &args.robots {
        let source = RobotsTxtSource::load_from_url(location, &config).await?;
        print_report(location, &source.document(), &args.targets, args);
        return Ok(());
    }

    let sites = group_by_site(&args.targets)?;
    let sources = join_all(
        sites
            .iter()
            .map(|(location, _)| RobotsTxtSource::load_from_url(location.as_str(), &config)),
    )
    .await;

    for ((location, targets), source) in sites.iter().zip(sources) {
        print_report(location.as_str(), &source?.document(), targets, args);
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = CommandLineArgs::parse();

    if let Err(e) = main_impl(&args).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_path_uses_path_and_query() {
        assert_eq!(target_path("https://example.com/a/b?x=1#frag"), "/a/b?x=1");
        assert_eq!(target_path("https://example.com"), "/");
        assert_eq!(target_path("/plain/path"), "/plain/path");
    }

    #[test]
    fn targets_are_grouped_per_site() {
        let targets = vec![
            "https://a.example/x".to_owned(),
            "https://b.example/y".to_owned(),
            "https://a.example/z?q".to_owned(),
        ];
        let sites = group_by_site(&targets).unwrap();
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].0.as_str(), "https://a.example/robots.txt");
        assert_eq!(sites[0].1, ["https://a.example/x", "https://a.example/z?q"]);
        assert_eq!(sites[1].1, ["https://b.example/y"]);
    }

    #[test]
    fn args_conflict_on_two_sources() {
        let parsed = CommandLineArgs::try_parse_from([
            "rusty-robots",
            "--file",
            "robots.txt",
            "--robots",
            "https://example.com/robots.txt",
        ]);
        assert!(parsed.is_err());
    }
}
