use tgaprog_frame::{Ctcss, STANDARD_TONES};

use crate::cmd::TonesArgs;
use crate::exit::{CliResult, SUCCESS};
use crate::output::{print_tones, OutputFormat};

pub fn run(_args: TonesArgs, format: OutputFormat) -> CliResult<i32> {
    let tones: Vec<Ctcss> = STANDARD_TONES.iter().copied().map(Ctcss::Tone).collect();
    print_tones(&tones, format);
    Ok(SUCCESS)
}
