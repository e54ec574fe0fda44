use std::path::PathBuf;

use emote::{
    journal::{self, ExportFormat},
    Error,
};
use tracing::info;

use crate::common::{self, Common};

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    let entries = args.common.load_entries()?;
    let output = journal::export(&entries, args.format)?;

    match &args.output {
        Some(dir) => {
            let path = dir.join(args.format.file_name());
            std::fs::write(&path, output)?;

            info!(
                path = %path.display(),
                mime = args.format.mime_type(),
                count = entries.len(),
                "export complete"
            );
        }
        None => println!("{output}"),
    }

    Ok(())
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    /// json, txt or csv
    #[clap(long, value_parser, default_value = "json")]
    format: ExportFormat,

    /// directory to write the export file into, stdout if missing
    #[clap(long, value_parser)]
    output: Option<PathBuf>,
}
