use serde::Serialize;
use tgaprog_session::{read_channels, write_channels, SessionConfig};
use tracing::info;

use crate::cmd::{LinkArgs, WriteArgs};
use crate::exit::{session_failure, CliResult, SUCCESS};
use crate::output::{print_json, OutputFormat};
use crate::store;

#[derive(Serialize)]
struct WriteOutput<'a> {
    port: &'a str,
    channels: usize,
    baseline: &'static str,
    written: bool,
}

pub fn run(args: WriteArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    // Validate the input before the radio is touched.
    let channels = store::load_channels(&args.file)?;
    let connector = link.connector()?;
    let config = SessionConfig::default();

    let (trailing, baseline) = match &args.baseline {
        Some(path) => (store::load_baseline(path)?, "file"),
        None => {
            info!(port = %args.port, "no baseline file given, reading the radio first");
            let table = read_channels(&connector, &args.port, &config)
                .map_err(|failure| session_failure(&args.port, failure))?;
            (table.trailing().clone(), "read")
        }
    };

    write_channels(&connector, &args.port, &channels, Some(&trailing), &config)
        .map_err(|failure| session_failure(&args.port, failure))?;

    let out = WriteOutput {
        port: &args.port,
        channels: channels.len(),
        baseline,
        written: true,
    };
    match format {
        OutputFormat::Json => print_json(&out),
        OutputFormat::Table | OutputFormat::Pretty => {
            println!("wrote {} channels to {}", out.channels, out.port);
        }
    }
    Ok(SUCCESS)
}
