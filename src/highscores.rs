//! Per-game high score lists
//!
//! Each game appends to its own list in the key-value store. The stored list
//! keeps insertion order and is never trimmed; ranking, sorting and top-N
//! are views computed on read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::persistence::{KeyValueStore, load_json, save_json};

/// Entries shown in the in-game panel
pub const PANEL_SIZE: usize = 5;
/// Entries shown in the leaderboard dialog
pub const LEADERBOARD_SIZE: usize = 10;
/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKey {
    Flappy,
    Snake,
    Tetris,
    Memory,
}

impl GameKey {
    pub const ALL: [GameKey; 4] = [GameKey::Flappy, GameKey::Snake, GameKey::Tetris, GameKey::Memory];

    pub fn storage_key(self) -> &'static str {
        match self {
            GameKey::Flappy => "flappyBirdScores",
            GameKey::Snake => "snakeScores",
            GameKey::Tetris => "tetrisScores",
            GameKey::Memory => "memoryCardScores",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKey::Flappy => "Flappy Bird",
            GameKey::Snake => "Snake",
            GameKey::Tetris => "Tetris",
            GameKey::Memory => "Memory Card",
        }
    }

    /// Short id used in page markup (`data-game`)
    pub fn id(self) -> &'static str {
        match self {
            GameKey::Flappy => "flappy",
            GameKey::Snake => "snake",
            GameKey::Tetris => "tetris",
            GameKey::Memory => "memory",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }
}

/// A single saved result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: u64,
    /// When it was saved, stored as an ISO-8601 string
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Score,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

/// Column sort state of the high score page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub field: SortField,
    pub order: SortOrder,
}

impl SortState {
    /// Clicking the active column flips the order; another column starts
    /// descending
    pub fn toggle(&mut self, field: SortField) {
        if self.field == field {
            self.order = match self.order {
                SortOrder::Ascending => SortOrder::Descending,
                SortOrder::Descending => SortOrder::Ascending,
            };
        } else {
            self.field = field;
            self.order = SortOrder::Descending;
        }
    }

    /// Column header arrow for `field`, if it is the active one
    pub fn indicator(&self, field: SortField) -> &'static str {
        match (self.field == field, self.order) {
            (false, _) => "",
            (true, SortOrder::Descending) => "↓",
            (true, SortOrder::Ascending) => "↑",
        }
    }
}

/// Trim and cap a submitted name. Blank names are rejected.
pub fn sanitize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(trimmed.chars().take(MAX_NAME_LEN).collect())
}

/// The stored list for one game
#[derive(Debug, Clone, PartialEq)]
pub struct HighScores {
    pub game: GameKey,
    /// Insertion order
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    pub fn new(game: GameKey) -> Self {
        Self {
            game,
            entries: Vec::new(),
        }
    }

    /// Read the list; absent or unreadable data gives an empty list
    pub fn load(store: &dyn KeyValueStore, game: GameKey) -> Self {
        let entries: Vec<ScoreRecord> = load_json(store, game.storage_key()).unwrap_or_default();
        log::info!("Loaded {} {} scores", entries.len(), game.title());
        Self { game, entries }
    }

    /// Rewrite the whole list. Failures are logged and otherwise ignored.
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match save_json(store, self.game.storage_key(), &self.entries) {
            Ok(()) => log::info!(
                "{} scores saved ({} entries)",
                self.game.title(),
                self.entries.len()
            ),
            Err(e) => log::warn!("Could not save {} scores: {}", self.game.title(), e),
        }
    }

    /// Append a result. Returns the stored record, or `None` for a blank name.
    pub fn record(&mut self, name: &str, score: u64, date: DateTime<Utc>) -> Option<&ScoreRecord> {
        let name = sanitize_name(name)?;
        self.entries.push(ScoreRecord { name, score, date });
        self.entries.last()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Stable sorted copy; the stored order is untouched
    pub fn sorted(&self, sort: SortState) -> Vec<ScoreRecord> {
        let mut view = self.entries.clone();
        view.sort_by(|a, b| {
            let ord = match sort.field {
                SortField::Score => a.score.cmp(&b.score),
                SortField::Date => a.date.cmp(&b.date),
            };
            match sort.order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        view
    }

    /// Best `n` by score
    pub fn top(&self, n: usize) -> Vec<ScoreRecord> {
        let mut view = self.sorted(SortState::default());
        view.truncate(n);
        view
    }

    pub fn best(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.score).max()
    }

    /// 1-based rank a score would take among the stored entries
    pub fn rank_of(&self, score: u64) -> usize {
        self.entries.iter().filter(|e| e.score > score).count() + 1
    }
}

/// Append `{name, score, now}` to a game's list and write it back
pub fn record_score(
    store: &mut dyn KeyValueStore,
    game: GameKey,
    name: &str,
    score: u64,
    now: DateTime<Utc>,
) -> Option<ScoreRecord> {
    let mut scores = HighScores::load(store, game);
    let record = scores.record(name, score, now)?.clone();
    scores.save(store);
    Some(record)
}

/// The raw stored list, in insertion order
pub fn list_scores(store: &dyn KeyValueStore, game: GameKey) -> Vec<ScoreRecord> {
    HighScores::load(store, game).entries
}

/// Relative description of `date` as seen at `now`, falling back to
/// `M/D/YY` (UTC) after a week
pub fn format_date(now: DateTime<Utc>, date: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(date);
    let days = diff.num_days();
    let hours = diff.num_hours();
    let mins = diff.num_minutes();

    match (days, hours, mins) {
        (1, _, _) => "Yesterday".to_string(),
        (2..7, _, _) => format!("{} days ago", days),
        (7.., _, _) => date.format("%-m/%-d/%y").to_string(),
        (_, 1, _) => "1 hour ago".to_string(),
        (_, 2.., _) => format!("{} hours ago", hours),
        (_, _, 1) => "1 min ago".to_string(),
        (_, _, 2..) => format!("{} mins ago", mins),
        _ => "Just now".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use chrono::{TimeDelta, TimeZone};
    use proptest::prelude::*;

    /// `secs` seconds past the Unix epoch
    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    fn record(name: &str, score: u64, secs: i64) -> ScoreRecord {
        ScoreRecord {
            name: name.to_string(),
            score,
            date: at(secs),
        }
    }

    fn scores(entries: Vec<ScoreRecord>) -> HighScores {
        HighScores {
            game: GameKey::Snake,
            entries,
        }
    }

    #[test]
    fn test_record_then_list_keeps_insertion_order() {
        let mut store = MemoryStore::new();
        record_score(&mut store, GameKey::Tetris, "ada", 300, at(1)).unwrap();
        record_score(&mut store, GameKey::Tetris, "bob", 900, at(2)).unwrap();
        record_score(&mut store, GameKey::Tetris, "ada", 300, at(3)).unwrap();

        let listed = list_scores(&store, GameKey::Tetris);
        assert_eq!(
            listed,
            vec![record("ada", 300, 1), record("bob", 900, 2), record("ada", 300, 3)]
        );
        assert!(list_scores(&store, GameKey::Snake).is_empty());
        assert!(store.get("tetrisScores").is_some());
    }

    #[test]
    fn test_blank_names_are_not_saved() {
        let mut store = MemoryStore::new();
        assert_eq!(record_score(&mut store, GameKey::Snake, "   ", 10, at(0)), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_names_trimmed_and_capped() {
        assert_eq!(sanitize_name("  neo  ").as_deref(), Some("neo"));
        let long = "abcdefghijklmnopqrstuvwxyz";
        assert_eq!(sanitize_name(long).map(|n| n.chars().count()), Some(MAX_NAME_LEN));
        assert_eq!(sanitize_name("ééééééééééééééééééééééé").map(|n| n.chars().count()), Some(20));
    }

    #[test]
    fn test_malformed_list_reads_empty() {
        let mut store = MemoryStore::new();
        store.set("memoryCardScores", "[{\"name\": 3}]").unwrap();
        assert!(list_scores(&store, GameKey::Memory).is_empty());
        // The next save replaces the bad value
        record_score(&mut store, GameKey::Memory, "kim", 1500, at(9)).unwrap();
        assert_eq!(list_scores(&store, GameKey::Memory).len(), 1);
    }

    #[test]
    fn test_failed_write_is_tolerated() {
        let mut store = MemoryStore::read_only();
        let saved = record_score(&mut store, GameKey::Flappy, "zed", 4, at(0));
        assert!(saved.is_some());
        assert!(list_scores(&store, GameKey::Flappy).is_empty());
    }

    #[test]
    fn test_sorted_views() {
        let list = scores(vec![
            record("a", 10, 3),
            record("b", 30, 1),
            record("c", 10, 2),
        ]);
        let by_score = list.sorted(SortState::default());
        let names: Vec<_> = by_score.iter().map(|r| r.name.as_str()).collect();
        // Ties keep insertion order
        assert_eq!(names, vec!["b", "a", "c"]);

        let by_date = list.sorted(SortState {
            field: SortField::Date,
            order: SortOrder::Ascending,
        });
        let names: Vec<_> = by_date.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c", "a"]);

        // Views never touch the stored order
        assert_eq!(list.entries[0].name, "a");
    }

    #[test]
    fn test_top_and_rank() {
        let list = scores((0..15).map(|i| record("p", i * 10, i as i64)).collect());
        let top = list.top(PANEL_SIZE);
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].score, 140);
        assert_eq!(list.top(LEADERBOARD_SIZE).len(), 10);
        assert_eq!(list.best(), Some(140));
        assert_eq!(list.rank_of(145), 1);
        assert_eq!(list.rank_of(140), 1);
        assert_eq!(list.rank_of(135), 2);
    }

    #[test]
    fn test_sort_toggle() {
        let mut sort = SortState::default();
        sort.toggle(SortField::Score);
        assert_eq!(sort.order, SortOrder::Ascending);
        assert_eq!(sort.indicator(SortField::Score), "↑");
        sort.toggle(SortField::Date);
        assert_eq!(sort, SortState { field: SortField::Date, order: SortOrder::Descending });
        assert_eq!(sort.indicator(SortField::Score), "");
    }

    #[test]
    fn test_format_date() {
        let now = Utc.with_ymd_and_hms(2023, 11, 14, 22, 13, 20).unwrap();
        assert_eq!(format_date(now, now - TimeDelta::seconds(30)), "Just now");
        assert_eq!(format_date(now, now - TimeDelta::minutes(1)), "1 min ago");
        assert_eq!(format_date(now, now - TimeDelta::minutes(5)), "5 mins ago");
        assert_eq!(format_date(now, now - TimeDelta::hours(1)), "1 hour ago");
        assert_eq!(format_date(now, now - TimeDelta::hours(5)), "5 hours ago");
        assert_eq!(format_date(now, now - TimeDelta::days(1)), "Yesterday");
        assert_eq!(format_date(now, now - TimeDelta::days(3)), "3 days ago");
        assert_eq!(format_date(now + TimeDelta::days(30), now), "11/14/23");
        // Clock skew reads as fresh
        assert_eq!(format_date(now, now + TimeDelta::minutes(3)), "Just now");
    }

    #[test]
    fn test_reads_lists_written_by_the_web_app() {
        let mut store = MemoryStore::new();
        store
            .set(
                "flappyBirdScores",
                r#"[{"name":"ann","score":12,"date":"2024-03-01T10:00:00.000Z"},
                    {"name":"bo","score":7,"date":"2024-03-02T08:30:15.250Z"}]"#,
            )
            .unwrap();

        let listed = list_scores(&store, GameKey::Flappy);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].date, Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
        assert_eq!(listed[1].date.timestamp_subsec_millis(), 250);

        let now = Utc.with_ymd_and_hms(2024, 3, 5, 12, 0, 0).unwrap();
        record_score(&mut store, GameKey::Flappy, "cy", 3, now).unwrap();
        let listed = list_scores(&store, GameKey::Flappy);
        let names: Vec<_> = listed.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["ann", "bo", "cy"]);
        assert_eq!(listed[2].date, now);

        // Dates go back out as ISO-8601 strings
        let raw = store.get("flappyBirdScores").unwrap();
        assert!(raw.contains(r#""date":"2024-03-01T10:00:00"#), "{}", raw);
        assert!(raw.contains(r#""date":"2024-03-05T12:00:00"#), "{}", raw);
    }

    proptest! {
        #[test]
        fn prop_sort_is_stable_and_idempotent(
            raw in proptest::collection::vec((0u64..5, 0u32..5), 0..30),
            by_date in any::<bool>(),
            ascending in any::<bool>(),
        ) {
            let list = scores(
                raw.iter()
                    .enumerate()
                    .map(|(i, (s, d))| record(&i.to_string(), *s, i64::from(*d)))
                    .collect(),
            );
            let sort = SortState {
                field: if by_date { SortField::Date } else { SortField::Score },
                order: if ascending { SortOrder::Ascending } else { SortOrder::Descending },
            };
            let once = list.sorted(sort);
            let twice = scores(once.clone()).sorted(sort);
            prop_assert_eq!(&once, &twice);

            // Equal keys stay in insertion order
            for pair in once.windows(2) {
                let same_key = match sort.field {
                    SortField::Score => pair[0].score == pair[1].score,
                    SortField::Date => pair[0].date == pair[1].date,
                };
                if same_key {
                    let a: usize = pair[0].name.parse().unwrap();
                    let b: usize = pair[1].name.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }
    }
}
