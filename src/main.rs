use std::io;

use chrono::Utc;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use moons::schedule::{DEFAULT_CYCLES, DEFAULT_WINDOW_DAYS};
use moons::sheet::REFERENCE_YEAR;
use moons::{day_groups, fetch, parse_sheet, NoPause, Pacer, Report, StdinPacer, Strategy};

const MAX_CYCLES: u64 = 10_000;
const MAX_WINDOW_DAYS: i64 = 100 * 366;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Day by day from yesterday, until --days is reached or no moon pops any more
    Streaming,
    /// A fixed number of cycles per moon inside a time window
    Bounded,
}

#[derive(Parser, Debug)]
#[command(name = "moons", version, about = "Upcoming New Eden moon pops, day by day")]
struct Args {
    /// CSV export URL of the moon sheet.
    #[arg(long, env = "MOONS_SHEET_URL", default_value_t = fetch::default_url())]
    url: String,

    #[arg(long, value_enum, default_value_t = StrategyArg::Streaming)]
    strategy: StrategyArg,

    /// Number of calendar days to report, starting yesterday.
    #[arg(long)]
    days: Option<usize>,

    /// Cycles unrolled per moon (bounded strategy).
    #[arg(
        long,
        default_value_t = DEFAULT_CYCLES,
        value_parser = RangedU64ValueParser::<usize>::new().range(0..=MAX_CYCLES)
    )]
    cycles: usize,

    /// Days ahead of now to report (bounded strategy).
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_DAYS,
        value_parser = clap::value_parser!(i64).range(0..=MAX_WINDOW_DAYS)
    )]
    window_days: i64,

    /// Year assumed for the day/month dates in the sheet.
    #[arg(long, default_value_t = REFERENCE_YEAR)]
    year: i32,

    /// Print every day without waiting for Enter.
    #[arg(long)]
    no_pause: bool,

    #[arg(long)]
    no_color: bool,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level)),
        )
        .with_writer(io::stderr)
        .init();

    if args.no_color {
        colored::control::set_override(false);
    }

    let content = fetch::sheet_csv(&args.url)?;
    let sheet = parse_sheet(&content, args.year)?;
    tracing::info!(
        moons = sheet.moons.len(),
        skipped = sheet.skipped.len(),
        "parsed moon sheet"
    );

    let strategy = match args.strategy {
        StrategyArg::Streaming => Strategy::Streaming,
        StrategyArg::Bounded => Strategy::Bounded {
            cycles: args.cycles,
            window_days: args.window_days,
        },
    };
    let groups = day_groups(sheet.moons, Utc::now(), strategy, args.days);

    let pacer: Box<dyn Pacer> = if args.no_pause {
        Box::new(NoPause)
    } else {
        Box::new(StdinPacer)
    };
    let mut report = Report::new(io::stdout().lock(), pacer);
    report.header()?;
    report.write_groups(groups)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn horizon_arguments_are_bounded() {
        let args = Args::try_parse_from(["moons", "--cycles", "10000", "--window-days", "36600"]);
        assert!(args.is_ok());
        assert!(Args::try_parse_from(["moons", "--cycles", "10001"]).is_err());
        assert!(Args::try_parse_from(["moons", "--window-days", "36601"]).is_err());
        assert!(Args::try_parse_from(["moons", "--window-days", "-1"]).is_err());
    }

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["moons"]).unwrap();
        assert_eq!(args.cycles, DEFAULT_CYCLES);
        assert_eq!(args.window_days, DEFAULT_WINDOW_DAYS);
        assert_eq!(args.year, REFERENCE_YEAR);
        assert_eq!(args.days, None);
    }
}
