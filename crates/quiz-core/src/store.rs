//! Bounded, best-effort collection of quiz results

use crate::ranking::{rank, Dashboard, Period};
use crate::result::QuizResult;
use crate::storage::{ResultStorage, StorageError};
use tracing::{debug, warn};

/// Key the collection is stored under
pub const STORAGE_KEY: &str = "quizifyLeaderboard";
/// Number of ranked results kept after each append
pub const RETENTION_LIMIT: usize = 100;

/// Whether a save reached the backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Persisted,
    /// The write failed; the caller's in-memory copy is all there is
    MemoryOnly,
}

/// Owns the persisted collection of quiz results
///
/// Storage failures never reach the caller: reads degrade to an empty
/// collection and writes degrade to memory-only.
pub struct ResultStore<S> {
    storage: S,
    key: String,
    retention: usize,
}

impl<S: ResultStorage> ResultStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: STORAGE_KEY.to_string(),
            retention: RETENTION_LIMIT,
        }
    }

    /// Store under a different key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Keep a different number of results (at least one)
    pub fn with_retention(mut self, retention: usize) -> Self {
        self.retention = retention.max(1);
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    /// Load the stored results
    ///
    /// An unreachable store, a missing payload or a payload that does not
    /// decode all yield an empty collection. Records that decode but break
    /// the score invariant are dropped one by one.
    pub fn load(&self) -> Vec<QuizResult> {
        let payload = match self.storage.read(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(backend = self.storage.backend_name(), error = %e, "could not read results, starting empty");
                return Vec::new();
            }
        };

        let records: Vec<QuizResult> = match serde_json::from_str(&payload) {
            Ok(records) => records,
            Err(e) => {
                warn!(backend = self.storage.backend_name(), error = %e, "stored results are corrupt, starting empty");
                return Vec::new();
            }
        };

        let total = records.len();
        let valid: Vec<QuizResult> = records
            .into_iter()
            .filter(|record| match record.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(id = %record.id(), error = %e, "dropping invalid stored result");
                    false
                }
            })
            .collect();

        debug!(loaded = valid.len(), dropped = total - valid.len(), "loaded results");
        valid
    }

    /// Add a result, keep the best `retention` by rank and persist them
    ///
    /// The returned collection is ranked and bounded whether or not the
    /// write succeeded.
    pub fn append(&self, result: QuizResult) -> Vec<QuizResult> {
        self.extend(std::iter::once(result))
    }

    /// Add many results with a single load and save
    ///
    /// Same outcome as appending them one at a time, in order.
    pub fn extend<I>(&self, results: I) -> Vec<QuizResult>
    where
        I: IntoIterator<Item = QuizResult>,
    {
        let mut records = self.load();
        records.extend(results);

        let mut ranked = rank(records).into_vec();
        ranked.truncate(self.retention);

        self.save(&ranked);
        ranked
    }

    /// Overwrite the stored collection with `data`
    pub fn save(&self, data: &[QuizResult]) -> Persistence {
        let written = serde_json::to_string(data)
            .map_err(StorageError::from)
            .and_then(|payload| self.storage.write(&self.key, &payload));

        match written {
            Ok(()) => {
                debug!(saved = data.len(), backend = self.storage.backend_name(), "saved results");
                Persistence::Persisted
            }
            Err(e) => {
                warn!(backend = self.storage.backend_name(), error = %e, "could not save results, keeping them in memory only");
                Persistence::MemoryOnly
            }
        }
    }

    /// Forget every stored result
    pub fn clear(&self) -> Persistence {
        match self.storage.remove(&self.key) {
            Ok(()) => Persistence::Persisted,
            Err(e) => {
                warn!(backend = self.storage.backend_name(), error = %e, "could not clear results");
                Persistence::MemoryOnly
            }
        }
    }

    /// True when nothing has been recorded yet
    pub fn is_first_attempt(&self) -> bool {
        self.load().is_empty()
    }

    /// Load once and build the dashboard for `period`
    pub fn dashboard(&self, period: Period) -> Dashboard {
        Dashboard::build(&self.load(), period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ranking::compare;
    use crate::result::{Attempt, Difficulty};
    use crate::storage::{MemoryStorage, NullStorage, StorageResult};
    use chrono::{TimeZone, Utc};

    fn result(name: &str, score: u32, time: u64) -> QuizResult {
        QuizResult::record_at(
            Attempt {
                player_name: name.to_string(),
                score,
                total_questions: 100,
                time_taken_seconds: time,
                category: "Science".to_string(),
                difficulty: Difficulty::Hard,
            },
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
        )
        .unwrap()
    }

    /// Reads fine, refuses every write
    struct ReadOnly(MemoryStorage);

    impl ResultStorage for ReadOnly {
        fn read(&self, key: &str) -> StorageResult<Option<String>> {
            self.0.read(key)
        }

        fn write(&self, _key: &str, _payload: &str) -> StorageResult<()> {
            Err(StorageError::Write("quota exceeded".into()))
        }

        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Write("read-only".into()))
        }

        fn backend_name(&self) -> &'static str {
            "ReadOnly"
        }
    }

    #[test]
    fn test_load_empty_store() {
        let store = ResultStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
        assert!(store.is_first_attempt());
    }

    #[test]
    fn test_load_corrupt_payload_is_empty() {
        let store = ResultStore::new(MemoryStorage::with_payload(STORAGE_KEY, "{not json"));
        assert!(store.load().is_empty());

        let store = ResultStore::new(MemoryStorage::with_payload(STORAGE_KEY, r#"{"a":1}"#));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_unavailable_storage_is_empty() {
        let storage = MemoryStorage::with_payload(STORAGE_KEY, "[]");
        storage.set_available(false);
        let store = ResultStore::new(storage);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_load_drops_records_breaking_invariant() {
        let payload = r#"[
            {"id":"ok","playerName":"Ada","score":7,"totalQuestions":10,"percentage":70,
             "timeTakenSeconds":30,"completedAt":"2024-05-01T12:00:00Z","category":"Science","difficulty":"easy"},
            {"id":"bad","playerName":"Eve","score":12,"totalQuestions":10,"percentage":100,
             "timeTakenSeconds":5,"completedAt":"2024-05-01T12:00:00Z","category":"Science","difficulty":"easy"}
        ]"#;
        let store = ResultStore::new(MemoryStorage::with_payload(STORAGE_KEY, payload));

        let loaded = store.load();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id().as_str(), "ok");
    }

    #[test]
    fn test_append_ranks_and_persists() {
        let store = ResultStore::new(MemoryStorage::new());
        store.append(result("A", 80, 40));
        store.append(result("B", 80, 30));
        let ranked = store.append(result("C", 90, 100));

        let names: Vec<_> = ranked.iter().map(QuizResult::player_name).collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        assert_eq!(store.load(), ranked);
        assert!(!store.is_first_attempt());
    }

    #[test]
    fn test_append_keeps_top_hundred() {
        let store = ResultStore::new(MemoryStorage::new());
        let mut all = Vec::new();
        for i in 0..105u32 {
            let r = result(&format!("p{i}"), i % 101, u64::from(i));
            all.push(r.clone());
            let stored = store.append(r);
            assert!(stored.len() <= RETENTION_LIMIT);
        }

        let stored = store.load();
        assert_eq!(stored.len(), RETENTION_LIMIT);

        let mut expected = all;
        expected.sort_by(compare);
        expected.truncate(RETENTION_LIMIT);
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_append_matches_rank_of_union() {
        let store = ResultStore::new(MemoryStorage::new()).with_retention(3);
        for r in [result("A", 10, 1), result("B", 50, 1), result("C", 30, 1)] {
            store.append(r);
        }
        let newcomer = result("D", 40, 1);
        let before = store.load();

        let after = store.append(newcomer.clone());

        let mut union = before;
        union.push(newcomer);
        let expected: Vec<_> = rank(union).into_iter().take(3).collect();
        assert_eq!(after, expected);
        let names: Vec<_> = after.iter().map(QuizResult::player_name).collect();
        assert_eq!(names, vec!["B", "D", "C"]);
    }

    #[test]
    fn test_append_survives_failed_write() {
        let store = ResultStore::new(ReadOnly(MemoryStorage::new()));
        let ranked = store.append(result("A", 50, 10));
        assert_eq!(ranked.len(), 1);
        assert_eq!(store.save(&ranked), Persistence::MemoryOnly);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_append_with_null_storage() {
        let store = ResultStore::new(NullStorage);
        let ranked = store.append(result("A", 50, 10));
        assert_eq!(ranked.len(), 1);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_is_idempotent_overwrite() {
        let store = ResultStore::new(MemoryStorage::new());
        let data = vec![result("A", 10, 1), result("B", 20, 2)];

        assert_eq!(store.save(&data), Persistence::Persisted);
        let first = store.storage().payload(STORAGE_KEY);
        assert_eq!(store.save(&data), Persistence::Persisted);
        assert_eq!(store.storage().payload(STORAGE_KEY), first);

        // Saved as given, not re-ranked
        assert_eq!(store.load(), data);

        store.save(&[]);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_custom_key_and_clear() {
        let store = ResultStore::new(MemoryStorage::new()).with_key("other");
        store.append(result("A", 10, 1));
        assert!(store.storage().payload("other").is_some());
        assert!(store.storage().payload(STORAGE_KEY).is_none());

        assert_eq!(store.clear(), Persistence::Persisted);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_dashboard_from_store() {
        let store = ResultStore::new(MemoryStorage::new());
        store.append(result("A", 50, 1));
        store.append(result("B", 70, 1));
        store.append(result("C", 90, 1));

        let dashboard = store.dashboard(Period::All);
        assert_eq!(dashboard.stats.count, 3);
        assert_eq!(dashboard.stats.max_percentage, 90);
        assert_eq!(dashboard.stats.mean_percentage_rounded, 70);
        assert_eq!(dashboard.snapshot[0].player_name(), "C");
    }

    #[test]
    fn test_extend_matches_repeated_append() {
        let batch: Vec<_> = (0..105u32)
            .map(|i| result(&format!("p{i}"), (i * 37) % 101, u64::from(i % 7)))
            .collect();

        let one_by_one = ResultStore::new(MemoryStorage::new());
        for r in batch.clone() {
            one_by_one.append(r);
        }

        let batched = ResultStore::new(MemoryStorage::new());
        let stored = batched.extend(batch);

        assert_eq!(stored.len(), RETENTION_LIMIT);
        assert_eq!(stored, one_by_one.load());
        assert_eq!(batched.load(), stored);
    }

    #[test]
    fn test_extend_nothing_keeps_existing() {
        let store = ResultStore::new(MemoryStorage::new());
        store.append(result("A", 10, 1));
        assert_eq!(store.extend(Vec::new()).len(), 1);
    }

    #[test]
    fn test_dashboard_today_uses_local_clock() {
        let store = ResultStore::new(MemoryStorage::new());
        let fresh = QuizResult::record(Attempt {
            player_name: "Ada".to_string(),
            score: 8,
            total_questions: 10,
            time_taken_seconds: 42,
            category: "Science".to_string(),
            difficulty: Difficulty::Medium,
        })
        .unwrap();
        store.append(fresh.clone());
        store.append(result("Old", 90, 1));

        let today = store.dashboard(Period::Today);
        assert_eq!(today.stats.count, 1);
        assert_eq!(today.snapshot[0].id(), fresh.id());

        assert_eq!(store.dashboard(Period::Weekly).stats.count, 1);
        assert_eq!(store.dashboard(Period::All).stats.count, 2);
    }
}
