use std::cmp::Ordering;

use crate::model::{
    engine::EngineParams,
    game::{Game, GameIdx, TeamIdx},
    season::SeasonWindow
};

/// A rating cell: one team's identity, its current rating and the games it
/// took part in. Ratings only move between iteration steps, never during one.
#[derive(Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub rating: f64,
    pub games: Vec<GameIdx>
}

impl Team {
    pub fn new(id: String, name: String, rating: f64) -> Team {
        Team {
            id,
            name,
            rating,
            games: Vec::new()
        }
    }

    /// Candidate rating for the next iteration step, computed against a
    /// snapshot of every team's current rating. Returns the candidate and the
    /// games this team chose to discard.
    ///
    /// Games the team has no say over (it is not the winner of a discardable
    /// blowout) are walked first and always counted. Discardable games follow,
    /// sorted so the most flattering ones come last; once the counted-games
    /// floor is reached every remaining discardable game is dropped. A team
    /// with no counted weight falls back to the default rating.
    pub(crate) fn next_rating(
        &self,
        this: TeamIdx,
        games: &[Game],
        ratings: &[f64],
        window: &SeasonWindow,
        params: &EngineParams
    ) -> (f64, Vec<GameIdx>) {
        let current = ratings[this];
        let may_drop = |idx: GameIdx| {
            let game = &games[idx];
            game.is_winner(this) && game.may_ignore(ratings, params.blowout_rating_gap)
        };

        let (kept, mut droppable): (Vec<GameIdx>, Vec<GameIdx>) =
            self.games.iter().partition(|&&idx| !may_drop(idx));

        // The impact of a discardable game is its weight times how far it
        // flatters the current rating; drop the most flattering ones first
        let flattery = |idx: GameIdx| {
            let game = &games[idx];
            game.weight(window) * (current - game.implied_rating(this, ratings))
        };
        droppable.sort_by(|&a, &b| flattery(a).partial_cmp(&flattery(b)).unwrap_or(Ordering::Equal));

        let mut ignored = Vec::new();
        let mut counted = 0;
        let mut total_weight = 0.0;
        let mut total_rating = 0.0;

        for idx in kept.into_iter().chain(droppable) {
            if counted >= params.min_counted_games && may_drop(idx) {
                ignored.push(idx);
                continue;
            }

            let game = &games[idx];
            let weight = game.weight(window);
            if weight == 0.0 {
                continue;
            }

            counted += 1;
            total_weight += weight;
            total_rating += weight * game.implied_rating(this, ratings);
        }

        if counted == 0 {
            (params.default_rating, ignored)
        } else {
            (total_rating / total_weight, ignored)
        }
    }
}
