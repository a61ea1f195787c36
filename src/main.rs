use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use team_rating_processor::{
    args::Args,
    input::{self, ResolvedSeason},
    model::{comparison, engine::EngineParams, report}
};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();
    init_logging(&args.log_level);

    let ResolvedSeason { mut engine, unknown_ids } =
        input::load_season(&args.input, EngineParams::default(), &args.exclude_tournament)
            .expect("Expected a readable, valid season data file");

    info!(teams = engine.num_teams(), games = engine.num_games(), "season data loaded");

    if !unknown_ids.is_empty() {
        warn!(count = unknown_ids.len(), "season data referenced unresolved opponents");
    }
    if let Some(path) = &args.unknown_ids_out {
        report::write_unknown_ids(path, unknown_ids.iter().map(String::as_str))
            .expect("Expected to write the unresolved opponent ids file");
    }

    match &args.compare {
        Some(published_path) => {
            let published =
                input::load_published(published_path).expect("Expected a readable published ratings file");
            let drifts = comparison::compare_published(&mut engine, &published, args.pin_iterations);
            report::print_drift(&drifts);
        }
        None => {
            let trace = engine.converge(args.max_iterations);
            info!(
                iterations = trace.iterations(),
                converged = trace.converged(),
                "rating iteration finished"
            );

            let standings = report::standings(&engine);
            match &args.output {
                Some(path) => {
                    report::write_standings(path, &standings).expect("Expected to write the standings file");
                    info!(path = %path.display(), "standings written");
                }
                None => report::print_standings(&standings)
            }
        }
    }
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
