use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{
    constants::{DIFF_ARC, DIFF_BASE, DIFF_SPAN},
    season::SeasonWindow
};

/// Position of a team in the engine's team table.
pub type TeamIdx = usize;

/// Position of a game in the engine's game list.
pub type GameIdx = usize;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("game on {date} ended {score}-{score}, a winner is required")]
    DrawnScore { date: NaiveDate, score: u32 },

    #[error("game on {date} has winner score {winner_score} below loser score {loser_score}")]
    InvertedScore {
        date: NaiveDate,
        winner_score: u32,
        loser_score: u32
    }
}

/// One played game. The fact itself never changes after construction; only
/// the engine's per-iteration ignore mark for it does.
#[derive(Debug, Clone)]
pub struct Game {
    pub tournament: String,
    pub date: NaiveDate,
    pub winner: TeamIdx,
    pub loser: TeamIdx,
    pub winner_score: u32,
    pub loser_score: u32
}

impl Game {
    pub fn new(
        tournament: String,
        date: NaiveDate,
        winner: TeamIdx,
        loser: TeamIdx,
        winner_score: u32,
        loser_score: u32
    ) -> Result<Game, GameError> {
        if winner_score == loser_score {
            return Err(GameError::DrawnScore { date, score: winner_score });
        }
        if winner_score < loser_score {
            return Err(GameError::InvertedScore {
                date,
                winner_score,
                loser_score
            });
        }

        Ok(Game {
            tournament,
            date,
            winner,
            loser,
            winner_score,
            loser_score
        })
    }

    pub fn is_winner(&self, team: TeamIdx) -> bool {
        team == self.winner
    }

    pub fn opponent_of(&self, team: TeamIdx) -> TeamIdx {
        if self.is_winner(team) {
            self.loser
        } else {
            self.winner
        }
    }

    pub fn weight(&self, window: &SeasonWindow) -> f64 {
        window.weight(self.date)
    }

    /// The blowout-and-favorite test: a game is discardable only while the
    /// winner sits more than `rating_gap` above the loser and the score was
    /// more than doubled. Depends on live ratings, so the answer changes
    /// between iterations and is never cached.
    pub fn may_ignore(&self, ratings: &[f64], rating_gap: f64) -> bool {
        ratings[self.winner] > ratings[self.loser] + rating_gap
            && self.winner_score > self.loser_score * 2 + 1
    }

    /// The rating this game implies for `team`: the opponent's current rating
    /// plus the margin differential for the winner, minus it for the loser.
    pub fn implied_rating(&self, team: TeamIdx, ratings: &[f64]) -> f64 {
        let differential = self.rating_differential();
        if self.is_winner(team) {
            ratings[self.loser] + differential
        } else {
            ratings[self.winner] - differential
        }
    }

    /// Margin-derived rating gap between the two sides, rising from 125 for
    /// the narrowest wins to 600 for a shutout.
    ///
    /// The margin ratio r = loser / (winner - 1) is compressed to
    /// s = 2 * (1 - r) for close games (r >= 0.5) and saturates at s = 1 for
    /// blowouts. A 1-0 game has no defined margin ratio and counts as a full
    /// blowout.
    pub fn rating_differential(&self) -> f64 {
        let s = if self.winner_score > 1 {
            let r = self.loser_score as f64 / (self.winner_score as f64 - 1.0);
            if r >= 0.5 {
                2.0 * (1.0 - r)
            } else {
                1.0
            }
        } else {
            1.0
        };

        DIFF_BASE + DIFF_SPAN * (s * DIFF_ARC).sin() / DIFF_ARC.sin()
    }
}
