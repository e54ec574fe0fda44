use emote::{
    features::resources::{self, ResourceTopic},
    Error,
};
use serde::Serialize;

use crate::common::{self, Common};

#[derive(Serialize)]
struct Listing {
    recommended: Vec<resources::Resource>,
    library: Vec<resources::Resource>,
}

pub fn run(args: &Args) -> Result<(), Error> {
    common::setup_tracing();

    if let Some(topic) = args.topic {
        let config = args.common.load_config()?;

        let content = common::with_gateway(&config, |gateway| async move {
            Ok(resources::generate_content(&gateway, topic).await)
        })?;

        return common::print_json(&content);
    }

    let entries = args.common.load_entries()?;

    let listing = Listing {
        recommended: resources::recommend(&entries)
            .into_iter()
            .map(ResourceTopic::resource)
            .collect(),
        library: resources::library(),
    };

    common::print_json(&listing)
}

#[derive(clap::Args)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    /// generate content for this topic instead of listing recommendations
    #[clap(long, value_parser)]
    topic: Option<ResourceTopic>,
}
