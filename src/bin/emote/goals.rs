use emote::{features::goals, Error};
use tracing::info;

use crate::common::{self, Common};

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    let entries = args.common.load_entries()?;
    let suggestions = goals::suggest(&entries);

    info!(count = suggestions.len(), "goal suggestions ready");

    common::print_json(&suggestions)
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,
}
