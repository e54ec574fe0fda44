use chrono::Utc;
use emote::{features::summary, Error};

use crate::common::{self, Common};

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    let config = args.common.load_config()?;
    let entries = args.common.load_entries()?;

    let summary = common::with_gateway(&config, |gateway| async move {
        summary::weekly_summary(&gateway, &entries, Utc::now()).await
    })?;

    common::print_json(&summary)
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,
}
