use tgaprog_frame::CodecConfig;
use tgaprog_session::{read_channels, SessionConfig};

use crate::cmd::{LinkArgs, ReadArgs};
use crate::exit::{session_failure, CliResult, SUCCESS};
use crate::output::{print_channels, OutputFormat};
use crate::store;

pub fn run(args: ReadArgs, link: &LinkArgs, format: OutputFormat) -> CliResult<i32> {
    let connector = link.connector()?;
    let config = SessionConfig {
        codec: CodecConfig {
            ctcss_off_sentinel: !args.raw_ctcss,
        },
        ..SessionConfig::default()
    };

    let table = read_channels(&connector, &args.port, &config)
        .map_err(|failure| session_failure(&args.port, failure))?;

    if let Some(path) = &args.output {
        store::save_channels(path, table.channels())?;
    }
    if let Some(path) = &args.baseline {
        store::save_baseline(path, table.trailing())?;
    }

    print_channels(table.channels(), format);
    Ok(SUCCESS)
}
