use chrono::{Duration, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::model::{
    engine::{EngineParams, RatingEngine},
    season::SeasonWindow
};

/// 13 whole weeks, Wednesday to Wednesday.
pub fn test_window() -> SeasonWindow {
    let start = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 9, 4).unwrap();
    SeasonWindow::new(start, end).unwrap()
}

/// Mid-week date inside the given week bucket, safely off the weekly grid.
pub fn date_in_week(window: &SeasonWindow, week: i64) -> NaiveDate {
    window.start() + Duration::days(week * 7 + 3)
}

/// A reproducible random league: every game is a 15-to-something win between
/// two distinct random teams on a random in-window, off-grid date.
pub fn generate_league(n_teams: usize, n_games: usize, seed: u64) -> RatingEngine {
    let window = test_window();
    let mut engine = RatingEngine::new(window, EngineParams::default());
    for i in 0..n_teams {
        engine.add_team(format!("team-{i}"), format!("Team {i}")).unwrap();
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..n_games {
        let winner = rng.random_range(0..n_teams);
        let mut loser = rng.random_range(0..n_teams);
        while loser == winner {
            loser = rng.random_range(0..n_teams);
        }

        let week = rng.random_range(0..window.num_weeks());
        let day = rng.random_range(1..7);
        let date = window.start() + Duration::days(week * 7 + day);
        let loser_score = rng.random_range(0..15);

        engine.add_game("Generated Invite", date, winner, loser, 15, loser_score).unwrap();
    }

    engine
}
