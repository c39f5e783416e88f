use clap::Parser;
use hlsdl::{config::ClientConfig, fetch::HeaderCodec, Error};
use std::{path::PathBuf, time::Duration};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "HLS stream downloader",
    long_about = "Download one quality of an HLS stream, optionally cut to a time range.\n\
                  Segments are fetched one after another and written to a single file."
)]
pub struct CliArgs {
    /// Master playlist URL
    pub url: String,

    #[arg(
        short,
        long,
        default_value = "best",
        help = "Quality name to download, or \"best\" for the highest bandwidth"
    )]
    pub quality: String,

    #[arg(
        short,
        long,
        required_unless_present = "info",
        help = "File to write; it must not exist yet"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        default_value = "0",
        value_parser = parse_timestamp,
        help = "Start of the range. Examples: \"90\", \"1.5m\", \"1h23m45s\", \"01:23:45\""
    )]
    pub start: Duration,

    #[arg(
        long,
        default_value = "0",
        value_parser = parse_timestamp,
        help = "End of the range, 0 for the end of the stream"
    )]
    pub end: Duration,

    #[arg(long, help = "List the available qualities instead of downloading")]
    pub info: bool,

    #[arg(long, requires = "info", help = "Print --info output as JSON")]
    pub json: bool,

    #[arg(
        short = 'H',
        long = "header",
        value_parser = HeaderCodec::parse_line,
        help = "Extra request header as \"Name: value\", may be repeated"
    )]
    pub headers: Vec<(String, String)>,

    #[arg(long, help = "Overall timeout in seconds for each request, 0 for none")]
    pub timeout: Option<u64>,

    #[arg(long, help = "Connection timeout in seconds")]
    pub connect_timeout: Option<u64>,

    #[arg(long, help = "Maximum seconds between two chunks of a response")]
    pub read_timeout: Option<u64>,

    #[arg(long, help = "User-Agent header sent with every request")]
    pub user_agent: Option<String>,

    #[arg(short, long, help = "Enable debug logging")]
    pub verbose: bool,
}

impl CliArgs {
    /// Apply command line overrides on top of `config`.
    pub fn client_config(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(secs) = self.timeout {
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = self.connect_timeout {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.read_timeout {
            config.read_timeout = Duration::from_secs(secs);
        }
        if let Some(agent) = &self.user_agent {
            config.user_agent = agent.clone();
        }
        config.headers.extend(self.headers.iter().cloned());
        config
    }
}

/// Parse a timestamp given as seconds, with `h`/`m`/`s` units or as
/// `[HH:]MM:SS`.
pub fn parse_timestamp(input: &str) -> Result<Duration, Error> {
    let input = input.trim().to_lowercase();
    let invalid = || Error::InvalidRange(format!("invalid timestamp {input:?}"));

    if input.is_empty() {
        return Err(invalid());
    }
    if input.starts_with('-') {
        return Err(Error::InvalidRange(format!(
            "timestamp {input:?} is negative"
        )));
    }

    let seconds = if let Ok(seconds) = input.parse::<f64>() {
        seconds
    } else if input.contains(':') {
        let fields = input.split(':').collect::<Vec<_>>();
        if fields.len() > 3 {
            return Err(invalid());
        }
        fields.iter().try_fold(0.0, |acc, field| {
            field.parse::<f64>().map(|v| acc * 60.0 + v).map_err(|_| invalid())
        })?
    } else {
        let mut total = 0.0;
        let mut number = String::new();
        for c in input.chars() {
            if c.is_ascii_digit() || c == '.' {
                number.push(c);
                continue;
            }
            let unit = match c {
                'h' => 3600.0,
                'm' => 60.0,
                's' => 1.0,
                _ => return Err(invalid()),
            };
            let value = number.parse::<f64>().map_err(|_| invalid())?;
            total += value * unit;
            number.clear();
        }
        if !number.is_empty() {
            return Err(invalid());
        }
        total
    };

    Duration::try_from_secs_f64(seconds).map_err(|_| invalid())
}
