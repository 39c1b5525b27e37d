use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;

mod error;
mod fetch;
mod ics;
mod info;
mod schedule;

#[derive(Parser)]
#[clap(version, about, long_about = None)]
struct Args {
    /// Where to write the calendar
    #[clap(value_parser, default_value = "weekend_schedule.ics")]
    output: PathBuf,

    /// ISO week used to pick rows of the schedule tables, default to the current week
    #[clap(short, long, value_parser = clap::value_parser!(u32).range(1..=53), value_name = "WEEK")]
    week: Option<u32>,

    /// Always use the first row of the schedule tables
    #[clap(short, long, conflicts_with = "week")]
    ignore_week: bool,

    /// Page holding the schedule
    #[clap(long, default_value = fetch::PRIMARY_URL)]
    url: String,

    /// Proxy prefix used when the page answers 403
    #[clap(long, default_value = fetch::PROXY_URL)]
    proxy: String,

    /// Timeout of each request
    #[clap(short, long, default_value_t = 30, value_name = "SECONDS")]
    timeout: u64,

    /// Name of the calendar
    #[clap(short, long, default_value = "CZQ Weekend Training")]
    name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let fetcher = fetch::Fetcher::new(fetch::Config {
        url: args.url.clone(),
        proxy: args.proxy,
        timeout: Duration::from_secs(args.timeout),
    })?;
    let page = fetcher.fetch().await?;

    let today = info::today();
    let week = match (args.week, args.ignore_week) {
        (_, true) => None,
        (Some(week), false) => Some(week),
        (None, false) => Some(info::current_week(today)),
    };
    log::info!("Reading the schedule ({} source, week {week:?})", page.source);

    let options = ics::Options {
        name: args.name,
        source_url: args.url,
    };
    generate(&page.text, week, today, &options, &args.output)?;

    println!(
        "Generated {} using {} data",
        args.output.display(),
        page.source
    );

    Ok(())
}

/// Turn the page into a calendar file, nothing is written unless every day is known
fn generate(
    text: &str,
    week: Option<u32>,
    today: NaiveDate,
    options: &ics::Options,
    output: &Path,
) -> anyhow::Result<()> {
    let schedule = schedule::extract(text, week);
    if schedule.is_empty() {
        log::warn!("No schedule section found in the page");
    }
    let occurrences = info::occurrences(&schedule, today)?;

    let calendar = ics::calendar(&occurrences, options);
    ics::export(calendar, output).with_context(|| format!("Can't write {}", output.display()))
}
