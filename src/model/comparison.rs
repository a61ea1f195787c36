use std::collections::HashMap;

use itertools::Itertools;
use serde::Serialize;
use tracing::info;

use crate::model::engine::RatingEngine;

/// How far one free iteration step moves a team away from its published
/// rating. Small drift means the published number still explains the games.
#[derive(Debug, Clone, Serialize)]
pub struct RatingDrift {
    pub id: String,
    pub name: String,
    pub published: f64,
    pub recomputed: f64
}

impl RatingDrift {
    pub fn magnitude(&self) -> f64 {
        (self.published - self.recomputed).abs()
    }
}

/// Diffs a published ratings table against what the engine computes from the
/// season's games.
///
/// Published teams are pinned to their published ratings before each of the
/// seeded iterations. Teams missing from the table float freely, so the
/// pinning loop back-fills reasonable ratings for them; the final step then
/// shows where the published numbers disagree with the game record. Results
/// are sorted by drift, smallest first.
pub fn compare_published(
    engine: &mut RatingEngine,
    published: &HashMap<String, f64>,
    pin_iterations: usize
) -> Vec<RatingDrift> {
    for _ in 0..pin_iterations {
        engine.seed_ratings(published);
        engine.iterate();
    }

    let known = published.iter().filter(|(id, _)| engine.team_index(id).is_some()).count();
    info!(
        published = published.len(),
        matched = known,
        iterations = pin_iterations,
        "compared published ratings"
    );

    engine
        .teams()
        .filter_map(|team| {
            published.get(&team.id).map(|rating| RatingDrift {
                id: team.id.clone(),
                name: team.name.clone(),
                published: *rating,
                recomputed: team.rating
            })
        })
        .sorted_by(|a, b| a.magnitude().partial_cmp(&b.magnitude()).unwrap())
        .collect()
}
