use std::{fs::File, io::Write, path::Path};

use itertools::Itertools;
use serde::Serialize;
use thiserror::Error;

use crate::model::{comparison::RatingDrift, engine::RatingEngine};

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write {path}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error
    },

    #[error("failed to serialize {path}")]
    Serialize {
        path: String,
        #[source]
        source: serde_json::Error
    }
}

/// One row of the final table.
#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub rating: f64
}

/// Final standings, best team first.
pub fn standings(engine: &RatingEngine) -> Vec<Standing> {
    engine
        .teams()
        .sorted_by(|a, b| b.rating.partial_cmp(&a.rating).unwrap())
        .enumerate()
        .map(|(index, team)| Standing {
            rank: index + 1,
            id: team.id.clone(),
            name: team.name.clone(),
            rating: team.rating
        })
        .collect()
}

pub fn write_standings(path: &Path, standings: &[Standing]) -> Result<(), ReportError> {
    let file = File::create(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source
    })?;
    serde_json::to_writer_pretty(file, standings).map_err(|source| ReportError::Serialize {
        path: path.display().to_string(),
        source
    })
}

pub fn write_unknown_ids<'a>(path: &Path, ids: impl Iterator<Item = &'a str>) -> Result<(), ReportError> {
    let mut file = File::create(path).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source
    })?;
    for id in ids {
        writeln!(file, "{id}").map_err(|source| ReportError::Io {
            path: path.display().to_string(),
            source
        })?;
    }

    Ok(())
}

pub fn print_standings(standings: &[Standing]) {
    for standing in standings {
        println!("{:>4}  {:<40} {:>7.1}", standing.rank, standing.name, standing.rating);
    }
}

pub fn print_drift(drifts: &[RatingDrift]) {
    for drift in drifts {
        println!("{}: {:.0} -> {:.0}", drift.name, drift.published, drift.recomputed);
    }
}
