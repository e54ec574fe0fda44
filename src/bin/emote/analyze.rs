use std::path::PathBuf;

use emote::{features::analysis, Error};
use tracing::info;

use crate::common::{self, Common};

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    let text = match (&args.text, &args.file) {
        (Some(text), None) => text.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (Some(_), Some(_)) => return Err(Error::validation("pass either the entry text or --file, not both")),
        (None, None) => return Err(Error::validation("no entry text given")),
    };

    let config = args.common.load_config()?;

    let analysis = common::with_gateway(&config, |gateway| async move {
        analysis::analyze_entry(&gateway, &text).await
    })?;

    info!(score = analysis.sentiment_score, "entry analyzed");

    common::print_json(&analysis)
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    /// text of the entry to analyze
    text: Option<String>,

    /// read the entry text from a file instead
    #[clap(long, value_parser)]
    file: Option<PathBuf>,
}
