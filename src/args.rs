//! Command line flags.

use clap::{Parser, ValueEnum};
use s3_lister::{ListRequest, S3Config, MAX_PAGE_SIZE};

/// List every object under a prefix, page by page, and report how long each
/// ListObjects call took.
///
/// Example:
///   s3_lister --host localhost:9000 --bucket logs --prefix 2024/ --maxkeys 500
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// S3 hostname, optionally with a port
    #[arg(long, default_value = "")]
    pub host: String,

    /// S3 bucket
    #[arg(long, default_value = "")]
    pub bucket: String,

    /// S3 prefix
    #[arg(long, default_value = "")]
    pub prefix: String,

    /// S3 access key
    #[arg(long, env = "AWS_ACCESS_KEY_ID", default_value = "", hide_env_values = true)]
    pub accesskey: String,

    /// S3 secret key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", default_value = "", hide_env_values = true)]
    pub secretkey: String,

    /// Number of entries per request (max 1000)
    #[arg(long, default_value_t = MAX_PAGE_SIZE, value_parser = parse_page_size)]
    pub maxkeys: u16,

    /// List all keys
    #[arg(long)]
    pub verbose: bool,

    /// Use HTTPS for --host (without a host the SDK default endpoint, which is
    /// HTTPS, is used)
    #[arg(long)]
    pub https: bool,

    /// Region to sign requests for (default: environment, then us-east-1)
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// Stop at the page the server marks as not truncated rather than at the
    /// first empty page
    #[arg(long)]
    pub stop_on_truncation: bool,

    /// Log level for diagnostics on stderr
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

impl Args {
    pub fn s3_config(&self) -> S3Config {
        let config = S3Config::new(&self.host)
            .with_https(self.https)
            .with_credentials(&self.accesskey, &self.secretkey);
        match &self.region {
            Some(region) => config.with_region(region),
            None => config,
        }
    }

    pub fn list_request(&self) -> ListRequest {
        ListRequest::new(&self.bucket, &self.prefix, self.maxkeys)
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parse a page size in 1..=1000.
fn parse_page_size(s: &str) -> Result<u16, String> {
    let value: u16 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if !(1..=MAX_PAGE_SIZE).contains(&value) {
        return Err(format!("{} is not in 1..={}", value, MAX_PAGE_SIZE));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["s3_lister"]).unwrap();
        assert_eq!(args.host, "");
        assert_eq!(args.bucket, "");
        assert_eq!(args.prefix, "");
        assert_eq!(args.maxkeys, 1000);
        assert!(!args.verbose);
        assert!(!args.https);
        assert!(!args.stop_on_truncation);
    }

    #[test]
    fn builds_request_and_config() {
        let args = Args::try_parse_from([
            "s3_lister",
            "--host",
            "localhost:9000",
            "--bucket",
            "logs",
            "--prefix",
            "2024/",
            "--maxkeys",
            "2",
            "--https",
            "--verbose",
        ])
        .unwrap();

        let request = args.list_request();
        assert_eq!(request, ListRequest::new("logs", "2024/", 2));
        assert_eq!(
            args.s3_config().endpoint_url().as_deref(),
            Some("https://localhost:9000")
        );
        assert!(args.verbose);
    }

    #[test]
    fn page_size_bounds() {
        assert_eq!(parse_page_size("1"), Ok(1));
        assert_eq!(parse_page_size("1000"), Ok(1000));
        assert!(parse_page_size("0").is_err());
        assert!(parse_page_size("1001").is_err());
        assert!(parse_page_size("many").is_err());
        assert!(Args::try_parse_from(["s3_lister", "--maxkeys", "5000"]).is_err());
    }
}
