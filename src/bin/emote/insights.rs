use chrono::Utc;
use emote::{features::insights, Error};

use crate::common::{self, Common};

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    let entries = args.common.load_entries()?;

    common::print_json(&insights::report(&entries, Utc::now()))
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,
}
