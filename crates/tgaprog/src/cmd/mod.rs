use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use tgaprog_transport::{SerialConfig, SerialConnector};

use crate::exit::{CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod ports;
pub mod read;
pub mod tones;
pub mod version;
pub mod write;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read all 16 channels from the radio.
    Read(ReadArgs),
    /// Write 16 channels from a JSON file to the radio.
    Write(WriteArgs),
    /// List serial ports.
    Ports(PortsArgs),
    /// List the standard CTCSS tones.
    Tones(TonesArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Read(args) => read::run(args, link, format),
        Command::Write(args) => write::run(args, link, format),
        Command::Ports(args) => ports::run(args, format),
        Command::Tones(args) => tones::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

/// Serial line settings shared by every command that talks to the radio.
#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Baud rate of the programming cable.
    #[arg(long, default_value_t = SerialConfig::DEFAULT_BAUD_RATE, global = true)]
    pub baud: u32,
    /// How long to wait for each reply (e.g. 1s, 500ms).
    #[arg(long, default_value = "1s", global = true)]
    pub timeout: String,
}

impl LinkArgs {
    pub fn connector(&self) -> CliResult<SerialConnector> {
        Ok(SerialConnector::new(SerialConfig {
            baud_rate: self.baud,
            read_timeout: parse_timeout(&self.timeout)?,
        }))
    }
}

#[derive(Args, Debug)]
pub struct ReadArgs {
    /// Serial port the cable is attached to (e.g. /dev/ttyUSB0, COM3).
    pub port: String,
    /// Save the channels as JSON, ready for `write`.
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,
    /// Save the two trailing records a later `write --baseline` needs.
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,
    /// Decode `FF FF` tone fields as numbers instead of OFF.
    #[arg(long)]
    pub raw_ctcss: bool,
}

#[derive(Args, Debug)]
pub struct WriteArgs {
    /// Serial port the cable is attached to.
    pub port: String,
    /// JSON array of 16 channels.
    pub file: PathBuf,
    /// Trailing records saved by `read --baseline`. Without it the radio is
    /// read first to capture them.
    #[arg(long, value_name = "FILE")]
    pub baseline: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug, Default)]
pub struct TonesArgs {}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

fn parse_timeout(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timeout_seconds() {
        assert_eq!(parse_timeout("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_timeout("2").unwrap(), Duration::from_secs(2));
    }

    #[test]
    fn parse_timeout_millis() {
        assert_eq!(parse_timeout("150ms").unwrap(), Duration::from_millis(150));
    }

    #[test]
    fn parse_timeout_invalid() {
        assert_eq!(parse_timeout("0s").unwrap_err().code, USAGE);
        assert!(parse_timeout("bad").is_err());
        assert!(parse_timeout("").is_err());
    }

    #[test]
    fn connector_uses_link_settings() {
        let link = LinkArgs {
            baud: 4800,
            timeout: "250ms".to_string(),
        };
        let connector = link.connector().unwrap();
        assert_eq!(connector.config.baud_rate, 4800);
        assert_eq!(connector.config.read_timeout, Duration::from_millis(250));
    }
}
