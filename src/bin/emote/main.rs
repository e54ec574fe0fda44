use clap::Parser;
use std::process;

mod analyze;
mod chat;
mod common;
mod export;
mod goals;
mod insights;
mod resources;
mod summary;
mod timeline;

#[derive(Parser)]
#[clap(name = "Emote")]
#[clap(bin_name = "emote")]
#[clap(author, version, about, long_about = None)]
enum Emote {
    /// score the sentiment, emotions and themes of an entry
    Analyze(analyze::Args),
    /// summarize the last week of entries
    Summary(summary::Args),
    /// ask a question about the last month of entries
    Chat(chat::Args),
    /// recommend resources or generate content for one of them
    Resources(resources::Args),
    /// export entries as json, txt or csv
    Export(export::Args),
    /// suggest goals for recurring themes
    Goals(goals::Args),
    /// mood, sentiment, activity and word statistics
    Insights(insights::Args),
    /// entries grouped by month
    Timeline(timeline::Args),
}

fn main() {
    let args = Emote::parse();

    let result = match args {
        Emote::Analyze(x) => analyze::run(&x),
        Emote::Summary(x) => summary::run(&x),
        Emote::Chat(x) => chat::run(&x),
        Emote::Resources(x) => resources::run(&x),
        Emote::Export(x) => export::run(&x),
        Emote::Goals(x) => goals::run(&x),
        Emote::Insights(x) => insights::run(&x),
        Emote::Timeline(x) => timeline::run(&x),
    };

    if let Err(err) = &result {
        eprintln!("ERROR: {err:#?}");
        process::exit(1);
    }

    process::exit(0);
}
