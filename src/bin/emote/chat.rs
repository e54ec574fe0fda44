use chrono::Utc;
use emote::{features::chat, Error};

use crate::common::{self, Common};

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    let config = args.common.load_config()?;
    let entries = args.common.load_entries()?;
    let question = args.question.join(" ");

    let reply = common::with_gateway(&config, |gateway| async move {
        chat::answer(&gateway, &question, &entries, Utc::now()).await
    })?;

    println!("{reply}");

    Ok(())
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    /// question about your journal
    #[clap(required = true)]
    question: Vec<String>,
}
