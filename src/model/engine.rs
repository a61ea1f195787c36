use std::collections::HashMap;

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    model::{
        constants::{BLOWOUT_RATING_GAP, CONVERGENCE_THRESHOLD, DEFAULT_RATING, MIN_COUNTED_GAMES},
        game::{Game, GameError, GameIdx, TeamIdx},
        season::{SeasonError, SeasonWindow},
        team::Team
    },
    utils::progress_utils::iteration_bar
};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("duplicate team id {id}")]
    DuplicateTeam { id: String },

    #[error("game references team index {index} outside the team table")]
    UnknownTeamIndex { index: usize },

    #[error(transparent)]
    Season(#[from] SeasonError),

    #[error(transparent)]
    Game(#[from] GameError)
}

/// Tunables of the rating model. The engine takes these as explicit
/// configuration so it can be run against synthetic seasons in tests.
#[derive(Debug, Clone, Copy)]
pub struct EngineParams {
    pub default_rating: f64,
    pub min_counted_games: usize,
    pub blowout_rating_gap: f64,
    pub convergence_threshold: f64
}

impl Default for EngineParams {
    fn default() -> EngineParams {
        EngineParams {
            default_rating: DEFAULT_RATING,
            min_counted_games: MIN_COUNTED_GAMES,
            blowout_rating_gap: BLOWOUT_RATING_GAP,
            convergence_threshold: CONVERGENCE_THRESHOLD
        }
    }
}

/// Per-iteration max deltas, recorded for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ConvergenceTrace {
    pub deltas: Vec<f64>,
    pub threshold: f64
}

impl ConvergenceTrace {
    pub fn iterations(&self) -> usize {
        self.deltas.len()
    }

    pub fn converged(&self) -> bool {
        self.deltas.last().is_some_and(|delta| *delta < self.threshold)
    }
}

/// The whole population of teams and their shared games, driven to a rating
/// fixed point by repeated two-phase iteration steps.
pub struct RatingEngine {
    teams: IndexMap<String, Team>,
    games: Vec<Game>,
    ignored: Vec<bool>,
    window: SeasonWindow,
    params: EngineParams
}

impl RatingEngine {
    pub fn new(window: SeasonWindow, params: EngineParams) -> RatingEngine {
        RatingEngine {
            teams: IndexMap::new(),
            games: Vec::new(),
            ignored: Vec::new(),
            window,
            params
        }
    }

    pub fn add_team(&mut self, id: impl Into<String>, name: impl Into<String>) -> Result<TeamIdx, EngineError> {
        let id = id.into();
        if self.teams.contains_key(&id) {
            return Err(EngineError::DuplicateTeam { id });
        }

        let team = Team::new(id.clone(), name.into(), self.params.default_rating);
        let (index, _) = self.teams.insert_full(id, team);
        Ok(index)
    }

    /// Registers a game between two resolved teams. The date must be valid
    /// for the season window and the score must name a winner.
    pub fn add_game(
        &mut self,
        tournament: impl Into<String>,
        date: NaiveDate,
        winner: TeamIdx,
        loser: TeamIdx,
        winner_score: u32,
        loser_score: u32
    ) -> Result<GameIdx, EngineError> {
        for index in [winner, loser] {
            if index >= self.teams.len() {
                return Err(EngineError::UnknownTeamIndex { index });
            }
        }
        self.window.validate_date(date)?;

        let game = Game::new(tournament.into(), date, winner, loser, winner_score, loser_score)?;
        let game_idx = self.games.len();
        self.games.push(game);
        self.ignored.push(false);

        for team_idx in [winner, loser] {
            let (_, team) = self.teams.get_index_mut(team_idx).unwrap();
            team.games.push(game_idx);
        }

        Ok(game_idx)
    }

    pub fn num_teams(&self) -> usize {
        self.teams.len()
    }

    pub fn num_games(&self) -> usize {
        self.games.len()
    }

    pub fn team_index(&self, id: &str) -> Option<TeamIdx> {
        self.teams.get_index_of(id)
    }

    pub fn team(&self, index: TeamIdx) -> &Team {
        let (_, team) = self.teams.get_index(index).unwrap();
        team
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    pub fn window(&self) -> &SeasonWindow {
        &self.window
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    pub fn is_ignored(&self, index: GameIdx) -> bool {
        self.ignored[index]
    }

    /// Games discarded by the most recent iteration step, in index order.
    pub fn ignored_games(&self) -> impl Iterator<Item = GameIdx> + '_ {
        self.ignored
            .iter()
            .enumerate()
            .filter_map(|(index, ignored)| ignored.then_some(index))
    }

    pub fn rating_snapshot(&self) -> Vec<f64> {
        self.teams.values().map(|team| team.rating).collect()
    }

    /// Overwrites the ratings of the named teams. Ids missing from the table
    /// are skipped. Used to pin published ratings in comparison runs and to
    /// stage synthetic scenarios in tests.
    pub fn seed_ratings(&mut self, ratings: &HashMap<String, f64>) {
        for (id, rating) in ratings {
            if let Some(team) = self.teams.get_mut(id) {
                team.rating = *rating;
            }
        }
    }

    /// One iteration step: every team's candidate rating is computed from the
    /// same snapshot of current ratings, then all candidates commit at once.
    /// Returns the largest absolute rating change.
    pub fn iterate(&mut self) -> f64 {
        // Ignore decisions are remade from live ratings every step
        self.ignored.iter_mut().for_each(|flag| *flag = false);

        let ratings = self.rating_snapshot();

        // Read phase. A game's ignore mark is written only by its winner and
        // read by nothing else within the step, so processing order cannot
        // leak into any candidate.
        let mut candidates = Vec::with_capacity(self.teams.len());
        let mut dropped_games = Vec::new();
        for (index, team) in self.teams.values().enumerate() {
            let (candidate, dropped) = team.next_rating(index, &self.games, &ratings, &self.window, &self.params);
            candidates.push(candidate);
            dropped_games.extend(dropped);
        }
        for index in dropped_games {
            self.ignored[index] = true;
        }

        // Commit phase: all ratings move together
        let mut max_delta = 0.0_f64;
        for (team, candidate) in self.teams.values_mut().zip(candidates) {
            max_delta = max_delta.max((team.rating - candidate).abs());
            team.rating = candidate;
        }

        max_delta
    }

    /// Iterates until the largest per-team change drops below the convergence
    /// threshold. The algorithm has no inherent iteration bound;
    /// `max_iterations` is a caller-level stop for schedules that cycle.
    pub fn converge(&mut self, max_iterations: Option<usize>) -> ConvergenceTrace {
        let bar = iteration_bar("converging ratings");
        let mut deltas = Vec::new();

        loop {
            let delta = self.iterate();
            deltas.push(delta);

            if let Some(bar) = &bar {
                bar.set_message(format!("max delta {delta:.6}"));
                bar.inc(1);
            }
            debug!(iteration = deltas.len(), max_delta = delta, "iteration step");

            if delta < self.params.convergence_threshold {
                break;
            }
            if max_iterations.is_some_and(|cap| deltas.len() >= cap) {
                warn!(
                    iterations = deltas.len(),
                    max_delta = delta,
                    "iteration cap reached before convergence"
                );
                break;
            }
        }

        if let Some(bar) = bar {
            bar.finish_and_clear();
        }

        ConvergenceTrace {
            deltas,
            threshold: self.params.convergence_threshold
        }
    }
}
