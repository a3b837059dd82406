//! Candidate filtering and random selection.
//!
//! Pure functions plus an injectable random source, so handler tests can pin
//! the draw and assert the selection invariant: a pick always comes from the
//! filtered set, never the raw search results.

use crate::media::Candidate;
use rand::Rng;

/// Minimum duration for a qualifying candidate: strictly more than 10 minutes.
const MIN_DURATION_SECS: u64 = 600;

/// Keyword that must appear (case-insensitively) in title or description.
const KEYWORD: &str = "ambient";

/// Keep candidates that are long enough and actually ambient.
///
/// Candidates with no parseable duration are excluded — we cannot prove they
/// meet the duration bar.
pub fn filter_candidates(candidates: Vec<Candidate>) -> Vec<Candidate> {
    candidates
        .into_iter()
        .filter(|c| {
            let long_enough = c.duration_secs.is_some_and(|secs| secs > MIN_DURATION_SECS);
            long_enough && mentions_keyword(c)
        })
        .collect()
}

fn mentions_keyword(candidate: &Candidate) -> bool {
    let in_title = candidate.title.to_lowercase().contains(KEYWORD);
    let in_description = candidate
        .description
        .as_deref()
        .is_some_and(|d| d.to_lowercase().contains(KEYWORD));
    in_title || in_description
}

/// Source of uniform random indices. Injected so tests can supply a
/// deterministic sequence.
pub trait RandomSource: Send + Sync {
    /// Draw an index uniformly from `[0, len)`. Callers guarantee `len > 0`.
    fn next_index(&self, len: usize) -> usize;
}

/// Production source backed by the thread-local RNG. Non-cryptographic by
/// design — this is a playlist shuffle, not key material.
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn next_index(&self, len: usize) -> usize {
        rand::thread_rng().gen_range(0..len)
    }
}

/// Pick one candidate uniformly at random, or `None` if the slice is empty.
pub fn pick<'a>(candidates: &'a [Candidate], rng: &dyn RandomSource) -> Option<&'a Candidate> {
    if candidates.is_empty() {
        return None;
    }
    Some(&candidates[rng.next_index(candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(id: &str, title: &str, description: Option<&str>, secs: Option<u64>) -> Candidate {
        Candidate {
            id: id.to_string(),
            title: title.to_string(),
            description: description.map(str::to_string),
            duration_secs: secs,
        }
    }

    /// Deterministic source that replays a fixed sequence of draws.
    struct SeqSource(std::sync::Mutex<Vec<usize>>);

    impl SeqSource {
        fn new(seq: &[usize]) -> Self {
            Self(std::sync::Mutex::new(seq.to_vec()))
        }
    }

    impl RandomSource for SeqSource {
        fn next_index(&self, len: usize) -> usize {
            let mut seq = self.0.lock().unwrap();
            let idx = if seq.is_empty() { 0 } else { seq.remove(0) };
            idx % len
        }
    }

    #[test]
    fn keeps_long_ambient_titles() {
        let kept = filter_candidates(vec![candidate(
            "a",
            "Medieval Ambient Music",
            None,
            Some(900),
        )]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let kept = filter_candidates(vec![candidate("a", "AMBIENT Rainfall", None, Some(900))]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn keyword_in_description_qualifies() {
        let kept = filter_candidates(vec![candidate(
            "a",
            "Rain on a tent, 3 hours",
            Some("Relaxing ambient soundscape for study"),
            Some(10_800),
        )]);
        assert_eq!(kept.len(), 1);
    }

    #[test]
    fn rejects_short_tracks() {
        // 600s is exactly 10 minutes — the bar is strictly greater.
        let kept = filter_candidates(vec![
            candidate("a", "Ambient loop", None, Some(600)),
            candidate("b", "Ambient loop", None, Some(599)),
        ]);
        assert!(kept.is_empty());
    }

    #[test]
    fn rejects_missing_duration() {
        let kept = filter_candidates(vec![candidate("a", "Endless ambient drone", None, None)]);
        assert!(kept.is_empty());
    }

    #[test]
    fn rejects_non_ambient_material() {
        let kept = filter_candidates(vec![candidate(
            "a",
            "Top 40 pop hits",
            Some("chart music"),
            Some(3600),
        )]);
        assert!(kept.is_empty());
    }

    #[test]
    fn filter_keeps_only_qualifying_subset() {
        let kept = filter_candidates(vec![
            candidate("short", "Ambient chime", None, Some(30)),
            candidate("good", "Deep Space Ambient", None, Some(4500)),
            candidate("offtopic", "Workout mix", None, Some(4500)),
        ]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "good");
    }

    #[test]
    fn pick_from_empty_is_none() {
        let rng = SeqSource::new(&[0]);
        assert!(pick(&[], &rng).is_none());
    }

    #[test]
    fn pick_follows_random_source() {
        let candidates = vec![
            candidate("a", "Ambient A", None, Some(900)),
            candidate("b", "Ambient B", None, Some(900)),
            candidate("c", "Ambient C", None, Some(900)),
        ];
        let rng = SeqSource::new(&[2]);
        assert_eq!(pick(&candidates, &rng).unwrap().id, "c");
    }

    #[test]
    fn pick_always_member_of_filtered_set() {
        let candidates = filter_candidates(vec![
            candidate("x", "Ambient X", None, Some(900)),
            candidate("skip", "Podcast episode", None, Some(900)),
            candidate("y", "Ambient Y", None, Some(1800)),
        ]);
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        for draw in 0..8 {
            let rng = SeqSource::new(&[draw]);
            let picked = pick(&candidates, &rng).unwrap();
            assert!(ids.contains(&picked.id.as_str()));
            assert_ne!(picked.id, "skip");
        }
    }

    #[test]
    fn thread_rng_source_stays_in_range() {
        let rng = ThreadRngSource;
        for _ in 0..100 {
            assert!(rng.next_index(3) < 3);
        }
    }
}
