// Rating model constants
pub const DEFAULT_RATING: f64 = 1000.0;
pub const MIN_COUNTED_GAMES: usize = 5;
// A win only becomes discardable once the winner sits this far above the loser
pub const BLOWOUT_RATING_GAP: f64 = 600.0;
pub const CONVERGENCE_THRESHOLD: f64 = 0.0001;
// Margin differential curve: DIFF_BASE + DIFF_SPAN * sin(s * DIFF_ARC) / sin(DIFF_ARC)
pub const DIFF_BASE: f64 = 125.0;
pub const DIFF_SPAN: f64 = 475.0;
pub const DIFF_ARC: f64 = 0.4 * std::f64::consts::PI;
// Weight ramp across the season window: first counted week 0.5, final week 1.0
pub const FIRST_WEEK_WEIGHT: f64 = 0.5;
pub const DAYS_PER_WEEK: i64 = 7;
