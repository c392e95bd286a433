//! Memory card matching
//!
//! Mismatches and the end-of-game prompt are delayed. Both are returned as
//! [`Deferred`] work for the driver to queue, and handed back through
//! [`MemoryState::fire`] once due. Work captured by an older session is
//! dropped there.

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::{Deferred, GameSession};

/// Face values; a deal uses the first N
pub const SYMBOLS: [&str; 24] = [
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷", "🐸", "🐵", "🐔",
    "🐧", "🐦", "🦆", "🦉", "🦇", "🐺", "🐗", "🐴",
];

/// Time a mismatched pair stays visible
pub const FLIP_BACK_DELAY_MS: f64 = 1000.0;
/// Pause between the last match and the leaderboard prompt
pub const PROMPT_DELAY_MS: f64 = 1500.0;

pub const TIME_BONUS_BASE: u64 = 300;
pub const MOVES_BONUS_BASE: u64 = 1000;
pub const MOVES_BONUS_STEP: u64 = 10;
pub const MIN_MATCH_POINTS: u64 = 10;
pub const MATCH_POINTS_BASE: u64 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn pairs(self) -> usize {
        match self {
            Difficulty::Easy => 6,
            Difficulty::Medium => 12,
            Difficulty::Hard => 18,
        }
    }

    pub fn multiplier(self) -> u64 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }

    /// Cards per row in the grid
    pub fn columns(self) -> usize {
        match self {
            Difficulty::Easy => 4,
            Difficulty::Medium | Difficulty::Hard => 6,
        }
    }

    /// Card edge in canvas pixels
    pub fn card_size(self) -> f32 {
        match self {
            Difficulty::Hard => 70.0,
            _ => 80.0,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    /// Position in the dealt deck
    pub id: usize,
    /// Index into [`SYMBOLS`]
    pub symbol: u8,
    pub flipped: bool,
    pub matched: bool,
}

impl Card {
    pub fn face(&self) -> &'static str {
        SYMBOLS[self.symbol as usize % SYMBOLS.len()]
    }

    pub fn is_face_up(&self) -> bool {
        self.flipped || self.matched
    }
}

/// Delayed work scheduled by a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryTimer {
    /// Turn a mismatched pair face down again
    FlipBack(usize, usize),
    /// Offer the leaderboard after completion
    ShowLeaderboard,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Ignored,
    /// First card of a pair turned over
    Flipped,
    Matched { points: u64 },
    Mismatched(Deferred<MemoryTimer>),
    /// Last pair found; carries the final score and the prompt timer
    Completed {
        final_score: u64,
        prompt: Deferred<MemoryTimer>,
    },
}

#[derive(Debug, Clone)]
pub struct MemoryState {
    pub session: GameSession,
    pub difficulty: Difficulty,
    pub cards: Vec<Card>,
    /// Ids of face-up cards not yet resolved (0..=2)
    pub face_up: Vec<usize>,
    pub moves: u32,
    pub elapsed_ms: f64,
    /// Set when the delayed leaderboard prompt has fired
    pub prompt_ready: bool,
    rng: Pcg32,
}

impl MemoryState {
    pub fn new(seed: u64, difficulty: Difficulty) -> Self {
        Self {
            session: GameSession::new(),
            difficulty,
            cards: Vec::new(),
            face_up: Vec::with_capacity(2),
            moves: 0,
            elapsed_ms: 0.0,
            prompt_ready: false,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn reset(&mut self, seed: u64) {
        let session = self.session.successor();
        *self = Self {
            session,
            ..Self::new(seed, self.difficulty)
        };
    }

    /// Difficulty only changes between games
    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if self.session.is_playing() {
            return false;
        }
        if self.difficulty != difficulty {
            log::info!("Memory difficulty: {}", difficulty.id());
            self.difficulty = difficulty;
        }
        true
    }

    /// Deal a shuffled deck and start the clock
    pub fn start(&mut self, now_ms: f64) -> bool {
        if !self.session.is_idle() {
            return false;
        }
        let pairs = self.difficulty.pairs().min(SYMBOLS.len());
        let mut symbols: Vec<u8> = (0..pairs as u8).chain(0..pairs as u8).collect();
        symbols.shuffle(&mut self.rng);

        self.cards = symbols
            .into_iter()
            .enumerate()
            .map(|(id, symbol)| Card {
                id,
                symbol,
                flipped: false,
                matched: false,
            })
            .collect();
        self.session.start(now_ms)
    }

    /// Whole seconds on the game clock
    pub fn elapsed_secs(&self) -> u64 {
        (self.elapsed_ms / 1000.0).floor() as u64
    }

    pub fn all_matched(&self) -> bool {
        !self.cards.is_empty() && self.cards.iter().all(|c| c.matched)
    }

    pub fn click(&mut self, id: usize, now_ms: f64) -> ClickOutcome {
        if !self.session.is_playing() || self.face_up.len() >= 2 {
            return ClickOutcome::Ignored;
        }
        match self.cards.get_mut(id) {
            Some(card) if !card.flipped && !card.matched => card.flipped = true,
            _ => return ClickOutcome::Ignored,
        }
        self.face_up.push(id);

        let [first, second] = match self.face_up[..] {
            [a, b] => [a, b],
            _ => return ClickOutcome::Flipped,
        };
        self.moves += 1;

        if self.cards[first].symbol != self.cards[second].symbol {
            return ClickOutcome::Mismatched(Deferred::new(
                self.session.token(),
                now_ms + FLIP_BACK_DELAY_MS,
                MemoryTimer::FlipBack(first, second),
            ));
        }

        self.cards[first].matched = true;
        self.cards[second].matched = true;
        self.face_up.clear();

        let points = MATCH_POINTS_BASE
            .saturating_sub(self.moves as u64)
            .max(MIN_MATCH_POINTS);
        self.session.add_score(points);

        if !self.all_matched() {
            return ClickOutcome::Matched { points };
        }

        let m = self.difficulty.multiplier();
        let time_bonus = TIME_BONUS_BASE.saturating_sub(self.elapsed_secs()) * m;
        let moves_bonus = MOVES_BONUS_BASE.saturating_sub(self.moves as u64 * MOVES_BONUS_STEP) * m;
        self.session.add_score(time_bonus + moves_bonus);
        log::info!(
            "Memory cleared in {} moves, {} s (time bonus {}, moves bonus {})",
            self.moves,
            self.elapsed_secs(),
            time_bonus,
            moves_bonus
        );
        self.session.finish();

        ClickOutcome::Completed {
            final_score: self.session.score,
            prompt: Deferred::new(
                self.session.token(),
                now_ms + PROMPT_DELAY_MS,
                MemoryTimer::ShowLeaderboard,
            ),
        }
    }

    /// Run delayed work. Returns false if it belonged to an older session.
    pub fn fire(&mut self, deferred: &Deferred<MemoryTimer>) -> bool {
        if !deferred.is_current(&self.session) {
            log::debug!("Dropping stale memory timer {:?}", deferred.action);
            return false;
        }
        match deferred.action {
            MemoryTimer::FlipBack(a, b) => {
                for id in [a, b] {
                    if let Some(card) = self.cards.get_mut(id) {
                        card.flipped = false;
                    }
                }
                self.face_up.clear();
            }
            MemoryTimer::ShowLeaderboard => self.prompt_ready = true,
        }
        true
    }
}

/// Advance the game clock
pub fn tick(state: &mut MemoryState, dt_ms: f64) {
    if state.session.is_playing() {
        state.elapsed_ms += dt_ms;
    }
}

/// `MM:SS`, minutes unbounded
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn started(seed: u64, difficulty: Difficulty) -> MemoryState {
        let mut state = MemoryState::new(seed, difficulty);
        assert!(state.start(0.0));
        state
    }

    fn partner(state: &MemoryState, id: usize) -> usize {
        let symbol = state.cards[id].symbol;
        state
            .cards
            .iter()
            .position(|c| c.id != id && c.symbol == symbol)
            .unwrap()
    }

    fn non_partner(state: &MemoryState, id: usize) -> usize {
        let symbol = state.cards[id].symbol;
        state.cards.iter().position(|c| c.symbol != symbol).unwrap()
    }

    /// Click out every pair without a mistake
    fn solve(state: &mut MemoryState, now_ms: f64) -> ClickOutcome {
        let mut last = ClickOutcome::Ignored;
        for id in 0..state.cards.len() {
            if state.cards[id].matched {
                continue;
            }
            let other = partner(state, id);
            state.click(id, now_ms);
            last = state.click(other, now_ms);
        }
        last
    }

    #[test]
    fn test_deal_sizes() {
        for difficulty in Difficulty::ALL {
            let state = started(1, difficulty);
            assert_eq!(state.cards.len(), difficulty.pairs() * 2);
            assert!(state.cards.iter().enumerate().all(|(i, c)| c.id == i));
        }
    }

    #[test]
    fn test_click_ignored_before_start() {
        let mut state = MemoryState::new(1, Difficulty::Easy);
        assert_eq!(state.click(0, 0.0), ClickOutcome::Ignored);
    }

    #[test]
    fn test_match_scores() {
        let mut state = started(2, Difficulty::Easy);
        let other = partner(&state, 0);
        assert_eq!(state.click(0, 0.0), ClickOutcome::Flipped);
        // Same card again is a no-op
        assert_eq!(state.click(0, 0.0), ClickOutcome::Ignored);
        assert_eq!(state.click(other, 0.0), ClickOutcome::Matched { points: 49 });
        assert_eq!(state.moves, 1);
        assert!(state.cards[0].matched && state.cards[other].matched);
        assert!(state.face_up.is_empty());
        assert_eq!(state.click(0, 0.0), ClickOutcome::Ignored);
    }

    #[test]
    fn test_mismatch_flips_back_later() {
        let mut state = started(3, Difficulty::Easy);
        let wrong = non_partner(&state, 0);
        state.click(0, 100.0);
        let deferred = match state.click(wrong, 100.0) {
            ClickOutcome::Mismatched(d) => d,
            other => panic!("expected mismatch, got {other:?}"),
        };
        assert_eq!(deferred.due_ms, 1100.0);

        // A third card waits for the pair to resolve
        let third = (0..state.cards.len()).find(|i| *i != 0 && *i != wrong).unwrap();
        assert_eq!(state.click(third, 500.0), ClickOutcome::Ignored);

        assert!(state.fire(&deferred));
        assert!(!state.cards[0].flipped && !state.cards[wrong].flipped);
        assert!(state.face_up.is_empty());
        assert_eq!(state.click(third, 1200.0), ClickOutcome::Flipped);
    }

    #[test]
    fn test_stale_flip_back_is_dropped() {
        let mut state = started(4, Difficulty::Easy);
        let wrong = non_partner(&state, 0);
        state.click(0, 0.0);
        let ClickOutcome::Mismatched(deferred) = state.click(wrong, 0.0) else {
            panic!("expected mismatch");
        };

        state.reset(5);
        state.start(2000.0);
        let other = partner(&state, 0);
        state.click(0, 2000.0);
        assert!(!state.fire(&deferred));
        // The fresh session's face-up card is untouched
        assert!(state.cards[0].flipped);
        assert_eq!(state.face_up, vec![0]);
        assert!(matches!(state.click(other, 2000.0), ClickOutcome::Matched { .. }));
    }

    #[test]
    fn test_perfect_easy_game() {
        let mut state = started(6, Difficulty::Easy);
        let outcome = solve(&mut state, 0.0);
        let ClickOutcome::Completed { final_score, prompt } = outcome else {
            panic!("expected completion, got {outcome:?}");
        };
        // Matches: 49 + 48 + 47 + 46 + 45 + 44, time bonus 300, moves bonus 940
        assert_eq!(final_score, 279 + 300 + 940);
        assert_eq!(state.session.score, final_score);
        assert!(state.session.is_over());
        assert!(state.all_matched());
        assert_eq!(prompt.due_ms, PROMPT_DELAY_MS);

        assert!(!state.prompt_ready);
        assert!(state.fire(&prompt));
        assert!(state.prompt_ready);
    }

    #[test]
    fn test_bonus_uses_clock_and_multiplier() {
        let mut state = started(7, Difficulty::Medium);
        tick(&mut state, 61_500.0);
        assert_eq!(state.elapsed_secs(), 61);
        let ClickOutcome::Completed { final_score, .. } = solve(&mut state, 0.0) else {
            panic!("expected completion");
        };
        let matches: u64 = (1..=12).map(|k| 50 - k).sum();
        assert_eq!(final_score, matches + (300 - 61) * 2 + (1000 - 120) * 2);
    }

    #[test]
    fn test_clock_stops_when_over() {
        let mut state = started(8, Difficulty::Easy);
        tick(&mut state, 1000.0);
        solve(&mut state, 0.0);
        tick(&mut state, 5000.0);
        assert_eq!(state.elapsed_secs(), 1);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(65), "01:05");
        assert_eq!(format_time(3600), "60:00");
    }

    #[test]
    fn test_difficulty_locked_while_playing() {
        let mut state = started(9, Difficulty::Easy);
        assert!(!state.set_difficulty(Difficulty::Hard));
        let mut idle = MemoryState::new(9, Difficulty::Easy);
        assert!(idle.set_difficulty(Difficulty::Hard));
        assert_eq!(idle.difficulty, Difficulty::Hard);
        assert_eq!(Difficulty::from_id("MEDIUM"), Some(Difficulty::Medium));
    }

    proptest! {
        #[test]
        fn prop_every_symbol_twice(seed in any::<u64>(), level in 0usize..3) {
            let difficulty = Difficulty::ALL[level];
            let state = started(seed, difficulty);
            for symbol in 0..difficulty.pairs() as u8 {
                prop_assert_eq!(state.cards.iter().filter(|c| c.symbol == symbol).count(), 2);
            }
        }

        #[test]
        fn prop_random_clicks_keep_at_most_two_face_up(
            seed in any::<u64>(),
            clicks in proptest::collection::vec(0usize..12, 1..200),
        ) {
            let mut state = started(seed, Difficulty::Easy);
            for (i, id) in clicks.into_iter().enumerate() {
                let now = i as f64 * 100.0;
                if let ClickOutcome::Mismatched(deferred) = state.click(id, now) {
                    state.fire(&deferred);
                }
                let unresolved = state.cards.iter().filter(|c| c.flipped && !c.matched).count();
                prop_assert!(unresolved <= 2);
                prop_assert_eq!(unresolved, state.face_up.len());
                if state.session.is_over() {
                    prop_assert!(state.all_matched());
                    break;
                }
            }
        }
    }
}
