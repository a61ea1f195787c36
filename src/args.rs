use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Clone)]
#[command(
    display_name = "Team Rating Processor",
    author = "Team Rating Processor",
    long_about = "Computes season power ratings for a closed league of teams from \
    head-to-head game results, iterating margin-derived implied ratings to a fixed point"
)]
pub struct Args {
    /// Season data file: the window plus every team and game, as JSON
    #[arg(short, long, env = "SEASON_DATA", help = "Season data JSON file")]
    pub input: PathBuf,

    /// Written as JSON when set; standings print to stdout otherwise
    #[arg(short, long, help = "Standings output file")]
    pub output: Option<PathBuf>,

    /// Ids referenced by a game but missing from the team table, one per
    /// line, ready to feed back to the acquisition side
    #[arg(long, help = "File to write unresolved opponent ids to")]
    pub unknown_ids_out: Option<PathBuf>,

    /// Games played under an excluded label never reach the rating engine
    #[arg(long, help = "Skip games from this tournament (repeatable)")]
    pub exclude_tournament: Vec<String>,

    /// Diff a published ratings table (JSON map of id to rating) against the
    /// game record instead of computing fresh standings
    #[arg(long, help = "Published ratings file to compare against")]
    pub compare: Option<PathBuf>,

    #[arg(long, default_value_t = 100, help = "Seeded iterations to run in compare mode")]
    pub pin_iterations: usize,

    /// The iteration loop is bounded by numerical convergence; this cap is a
    /// stop for schedules that cycle instead of settling
    #[arg(long, help = "Safety cap on iteration steps")]
    pub max_iterations: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}
