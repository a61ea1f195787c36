use std::{
    collections::{BTreeSet, HashMap},
    fs::File,
    io::BufReader,
    path::Path
};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::model::{
    engine::{EngineError, EngineParams, RatingEngine},
    season::SeasonWindow
};

#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error
    },

    #[error("failed to parse {path}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error
    },

    #[error(transparent)]
    Engine(#[from] EngineError)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: String,
    pub name: String
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameRecord {
    pub tournament: String,
    pub date: NaiveDate,
    pub winner_id: String,
    pub loser_id: String,
    pub winner_score: u32,
    pub loser_score: u32
}

/// The season data file as produced by the acquisition side: a window, the
/// full team table and every scraped game result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonData {
    pub season: SeasonRecord,
    pub teams: Vec<TeamRecord>,
    pub games: Vec<GameRecord>
}

/// A fully resolved season: the engine holds every game whose two teams are
/// known; ids the data referenced but never defined are reported separately.
pub struct ResolvedSeason {
    pub engine: RatingEngine,
    pub unknown_ids: BTreeSet<String>
}

pub fn load_season(
    path: &Path,
    params: EngineParams,
    excluded_tournaments: &[String]
) -> Result<ResolvedSeason, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source
    })?;
    let data: SeasonData = serde_json::from_reader(BufReader::new(file)).map_err(|source| InputError::Parse {
        path: path.display().to_string(),
        source
    })?;

    resolve(data, params, excluded_tournaments)
}

/// Builds the engine from raw season data. Malformed records (drawn scores,
/// on-grid dates, duplicate team ids, a degenerate window) abort the load;
/// games against teams the data never defines are dropped and their ids
/// collected for a follow-up acquisition pass.
pub fn resolve(
    data: SeasonData,
    params: EngineParams,
    excluded_tournaments: &[String]
) -> Result<ResolvedSeason, InputError> {
    let window = SeasonWindow::new(data.season.start_date, data.season.end_date).map_err(EngineError::from)?;
    let mut engine = RatingEngine::new(window, params);

    for team in data.teams {
        engine.add_team(team.id, team.name)?;
    }

    let mut unknown_ids = BTreeSet::new();
    let mut excluded = 0;
    for game in data.games {
        if excluded_tournaments.contains(&game.tournament) {
            excluded += 1;
            continue;
        }

        let winner = engine.team_index(&game.winner_id);
        let loser = engine.team_index(&game.loser_id);
        match (winner, loser) {
            (Some(winner), Some(loser)) => {
                engine.add_game(
                    game.tournament,
                    game.date,
                    winner,
                    loser,
                    game.winner_score,
                    game.loser_score
                )?;
            }
            _ => {
                if winner.is_none() {
                    unknown_ids.insert(game.winner_id.clone());
                }
                if loser.is_none() {
                    unknown_ids.insert(game.loser_id.clone());
                }
                warn!(
                    date = %game.date,
                    winner = %game.winner_id,
                    loser = %game.loser_id,
                    "dropping game against an unresolved opponent"
                );
            }
        }
    }

    if excluded > 0 {
        debug!(count = excluded, "skipped games from excluded tournaments");
    }

    Ok(ResolvedSeason { engine, unknown_ids })
}

/// Published ratings as a flat id -> rating table, for comparison runs.
pub fn load_published(path: &Path) -> Result<HashMap<String, f64>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.display().to_string(),
        source
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| InputError::Parse {
        path: path.display().to_string(),
        source
    })
}
