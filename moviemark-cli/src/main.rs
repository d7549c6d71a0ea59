use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use moviemark::scrape::{MovieParser, ParserConfig};

#[derive(Parser)]
#[command(name = "moviemark", about = "Detect title, description and poster for a movie link")]
struct Cli {
    /// Page to parse
    url: String,

    /// OpenGraph API endpoint used as the fallback
    #[arg(long)]
    api_url: Option<String>,

    /// Proxy for the page fetch, also forwarded to the OpenGraph API
    #[arg(long, conflicts_with = "no_proxy")]
    proxy: Option<String>,

    /// Fetch directly and forward no proxy
    #[arg(long)]
    no_proxy: bool,

    /// Page fetch timeout in seconds
    #[arg(long, value_parser = positive_seconds)]
    timeout: Option<f64>,

    /// OpenGraph API timeout in seconds
    #[arg(long, value_parser = positive_seconds)]
    api_timeout: Option<f64>,

    /// Skip TLS certificate and hostname verification
    #[arg(long)]
    insecure: bool,

    /// Pretty-print the JSON response
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

fn positive_seconds(raw: &str) -> Result<f64, String> {
    match raw.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds > 0.0 => Ok(seconds),
        _ => Err(format!("expected a positive number of seconds, got '{raw}'")),
    }
}

impl Cli {
    fn apply(&self, mut config: ParserConfig) -> ParserConfig {
        if let Some(url) = &self.api_url {
            config = config.with_opengraph_api_url(url.clone());
        }
        if let Some(proxy) = &self.proxy {
            config = config.with_proxy(proxy.clone());
        }
        if self.no_proxy {
            config = config.without_proxy();
        }
        if let Some(seconds) = self.timeout {
            config = config.with_timeout(seconds);
        }
        if let Some(seconds) = self.api_timeout {
            config = config.with_api_timeout(seconds);
        }
        if self.insecure {
            config = config.accept_invalid_certs(true);
        }
        config
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = cli.apply(ParserConfig::from_env().context("Invalid parser configuration")?);
    tracing::debug!(
        api_url = config.opengraph_api_url.as_str(),
        proxy = config.proxy.as_deref().unwrap_or("none"),
        "Parser configured"
    );

    let parser = MovieParser::from_config(&config).context("Failed to build parser")?;
    let response = parser.handle_request(Some(&cli.url)).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_flags_must_be_positive() {
        assert!(Cli::try_parse_from(["moviemark", "https://x.com", "--timeout", "0"]).is_err());
        assert!(Cli::try_parse_from(["moviemark", "https://x.com", "--api-timeout", "-2"]).is_err());

        let cli = Cli::try_parse_from(["moviemark", "https://x.com", "--timeout", "2.5"]).unwrap();
        assert_eq!(cli.timeout, Some(2.5));
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "moviemark",
            "https://x.com",
            "--no-proxy",
            "--insecure",
            "--api-url",
            "http://og.local/opengraph",
        ])
        .unwrap();
        let config = cli.apply(ParserConfig::default());
        assert_eq!(config.proxy, None);
        assert!(config.accept_invalid_certs);
        assert_eq!(config.opengraph_api_url, "http://og.local/opengraph");
        assert!(config.validate().is_ok());
    }
}
