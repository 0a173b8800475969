//! Demonstration resources for exercises
//!
//! Exercise names produced by the workout generator vary freely in phrasing ("Dumbbell Bicep
//! Curls (slow tempo)", "Standing Russian Twists", ...). The resolver maps such a name onto a
//! small static table of known exercises using a sequence of matching tiers of decreasing
//! confidence. A miss is a normal outcome and is represented by `None`.

use std::{collections::HashMap, sync::LazyLock};

use log::{debug, trace};
use strum::{Display, IntoStaticStr};

/// Words that describe how an exercise is performed rather than which exercise it is.
const MODIFIERS: &[&str] = &[
    // equipment
    "dumbbell",
    "dumbbells",
    "barbell",
    "barbells",
    "kettlebell",
    "kettlebells",
    "bodyweight",
    "body-weight",
    "weighted",
    "banded",
    "cable",
    "machine",
    // position
    "single",
    "single-arm",
    "single-leg",
    "one-arm",
    "one-leg",
    "seated",
    "standing",
    "alternating",
    "kneeling",
    "lying",
    // tempo
    "slow",
    "fast",
    "explosive",
    "controlled",
    "tempo",
    "paused",
    // difficulty
    "beginner",
    "intermediate",
    "advanced",
    "modified",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExerciseResource {
    pub video_url: &'static str,
    pub image_url: Option<&'static str>,
}

impl ExerciseResource {
    #[must_use]
    pub const fn video(video_url: &'static str) -> Self {
        Self {
            video_url,
            image_url: None,
        }
    }

    #[must_use]
    pub const fn with_image(video_url: &'static str, image_url: &'static str) -> Self {
        Self {
            video_url,
            image_url: Some(image_url),
        }
    }
}

#[derive(Debug, Display, IntoStaticStr, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[strum(serialize_all = "kebab-case")]
pub enum MatchTier {
    Exact,
    ModifierStripped,
    Substring,
    CleanedSubstring,
    WordOverlap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub key: &'static str,
    pub resource: ExerciseResource,
    pub tier: MatchTier,
}

/// Immutable mapping from canonical exercise names to demonstration resources.
///
/// The order of the entries is kept and only used as the last tie-breaker.
#[derive(Debug, Clone)]
pub struct ResourceTable {
    entries: Vec<(&'static str, ExerciseResource)>,
    index: HashMap<&'static str, usize>,
}

impl ResourceTable {
    /// If a key occurs more than once, the first entry is kept.
    #[must_use]
    pub fn new(entries: &[(&'static str, ExerciseResource)]) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        let mut unique = Vec::with_capacity(entries.len());
        for (key, resource) in entries {
            if !index.contains_key(key) {
                index.insert(*key, unique.len());
                unique.push((*key, *resource));
            }
        }
        Self {
            entries: unique,
            index,
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ExerciseResource> {
        self.index.get(key).map(|i| &self.entries[*i].1)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &ExerciseResource)> {
        self.entries.iter().map(|(key, resource)| (*key, resource))
    }

    /// Find the best available resource for a free-text exercise name.
    ///
    /// The tiers are tried in the order of [`MatchTier`] and the first tier with a hit wins.
    /// Within the substring tiers the longest matching key wins. Within the word overlap tier
    /// the key with the most matched words wins, then the longest key. Remaining ties are
    /// decided by table order.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<Resolution> {
        let normalized = normalize(name);

        if normalized.is_empty() {
            debug!("no resource for empty exercise name");
            return None;
        }

        let cleaned = strip_modifiers(&normalized);
        let cleaned = (!cleaned.is_empty() && cleaned != normalized).then_some(cleaned);

        let resolution = self
            .exact_match(&normalized, MatchTier::Exact)
            .or_else(|| {
                cleaned
                    .as_deref()
                    .and_then(|c| self.exact_match(c, MatchTier::ModifierStripped))
            })
            .or_else(|| self.substring_match(&normalized, MatchTier::Substring))
            .or_else(|| {
                cleaned
                    .as_deref()
                    .and_then(|c| self.substring_match(c, MatchTier::CleanedSubstring))
            })
            .or_else(|| self.word_overlap_match(&normalized));

        match resolution {
            Some(ref r) => trace!("resolved \"{name}\" to \"{}\" ({} match)", r.key, r.tier),
            None => debug!("no resource for exercise \"{name}\""),
        }

        resolution
    }

    #[must_use]
    pub fn resolve_video(&self, name: &str) -> Option<&'static str> {
        self.resolve(name).map(|r| r.resource.video_url)
    }

    fn exact_match(&self, query: &str, tier: MatchTier) -> Option<Resolution> {
        let i = *self.index.get(query)?;
        Some(self.resolution(i, tier))
    }

    fn substring_match(&self, query: &str, tier: MatchTier) -> Option<Resolution> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (key, _))| {
                !key.is_empty() && (query.contains(key) || key.contains(query))
            })
            .max_by(|(i, (a, _)), (j, (b, _))| a.len().cmp(&b.len()).then(j.cmp(i)))
            .map(|(i, _)| self.resolution(i, tier))
    }

    fn word_overlap_match(&self, query: &str) -> Option<Resolution> {
        let query_words = words(query).collect::<Vec<_>>();

        self.entries
            .iter()
            .enumerate()
            .filter_map(|(i, (key, _))| {
                let key_words = words(key).collect::<Vec<_>>();
                if key_words.is_empty() {
                    return None;
                }
                let matched = query_words
                    .iter()
                    .filter(|w| key_words.iter().any(|k| k.contains(**w) || w.contains(k)))
                    .count();
                (matched > key_words.len() / 2).then_some((i, key.len(), matched))
            })
            .max_by(|(i, a_len, a_matched), (j, b_len, b_matched)| {
                a_matched
                    .cmp(b_matched)
                    .then(a_len.cmp(b_len))
                    .then(j.cmp(i))
            })
            .map(|(i, _, _)| self.resolution(i, MatchTier::WordOverlap))
    }

    fn resolution(&self, i: usize, tier: MatchTier) -> Resolution {
        let (key, resource) = self.entries[i];
        Resolution {
            key,
            resource,
            tier,
        }
    }
}

/// Lowercase, trim and collapse inner whitespace.
#[must_use]
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove equipment, position, tempo and difficulty words from a normalized name.
#[must_use]
pub fn strip_modifiers(normalized: &str) -> String {
    words(normalized)
        .filter(|w| !MODIFIERS.contains(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn words(s: &str) -> impl Iterator<Item = &str> {
    s.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
}

pub static EXERCISE_RESOURCES: LazyLock<ResourceTable> =
    LazyLock::new(|| ResourceTable::new(EXERCISE_VIDEOS));

#[must_use]
pub fn find_exercise_resource(name: &str) -> Option<Resolution> {
    EXERCISE_RESOURCES.resolve(name)
}

#[must_use]
pub fn find_exercise_video(name: &str) -> Option<&'static str> {
    EXERCISE_RESOURCES.resolve_video(name)
}

const PUSH_UP: &str = "https://www.youtube.com/watch?v=IODxDxX7oi4";
const SQUAT: &str = "https://www.youtube.com/watch?v=aclHkVaku9U";
const LUNGE: &str = "https://www.youtube.com/watch?v=3XDriUn0udo";
const BURPEE: &str = "https://www.youtube.com/watch?v=818SkLY1KoA";
const DEADLIFT: &str = "https://www.youtube.com/watch?v=VytU5OSPUJM";
const BICEP_CURL: &str = "https://www.youtube.com/watch?v=ykJmrZ5v0Oo";
const TRICEP_DIP: &str = "https://www.youtube.com/watch?v=0326dy_-CzM";
const MOUNTAIN_CLIMBER: &str = "https://www.youtube.com/watch?v=nmwgirgXLYM";
const JUMPING_JACK: &str = "https://www.youtube.com/watch?v=iSSAk4XCsRA";
const SIT_UP: &str = "https://www.youtube.com/watch?v=1fbU_MkV7NE";
const CRUNCH: &str = "https://www.youtube.com/watch?v=Xyd_fa5zoEU";
const RUSSIAN_TWIST: &str = "https://www.youtube.com/watch?v=wkD8rjkodUI";
const JUMPING_LUNGE: &str = "https://www.youtube.com/watch?v=rvqV3Vgqiyc";
const CHILD_POSE: &str = "https://www.youtube.com/watch?v=2CWw0qHjPJY";

const EXERCISE_VIDEOS: &[(&str, ExerciseResource)] = &[
    // strength
    ("push-up", ExerciseResource::video(PUSH_UP)),
    ("pushup", ExerciseResource::video(PUSH_UP)),
    ("push up", ExerciseResource::video(PUSH_UP)),
    ("squat", ExerciseResource::video(SQUAT)),
    ("squats", ExerciseResource::video(SQUAT)),
    (
        "plank",
        ExerciseResource::video("https://www.youtube.com/watch?v=pSHjTRCQxIw"),
    ),
    ("lunge", ExerciseResource::video(LUNGE)),
    ("lunges", ExerciseResource::video(LUNGE)),
    ("burpee", ExerciseResource::video(BURPEE)),
    ("burpees", ExerciseResource::video(BURPEE)),
    ("deadlift", ExerciseResource::video(DEADLIFT)),
    ("deadlifts", ExerciseResource::video(DEADLIFT)),
    ("bicep curl", ExerciseResource::video(BICEP_CURL)),
    ("bicep curls", ExerciseResource::video(BICEP_CURL)),
    ("tricep dip", ExerciseResource::video(TRICEP_DIP)),
    ("tricep dips", ExerciseResource::video(TRICEP_DIP)),
    ("mountain climber", ExerciseResource::video(MOUNTAIN_CLIMBER)),
    ("mountain climbers", ExerciseResource::video(MOUNTAIN_CLIMBER)),
    ("jumping jack", ExerciseResource::video(JUMPING_JACK)),
    ("jumping jacks", ExerciseResource::video(JUMPING_JACK)),
    // core
    ("sit-up", ExerciseResource::video(SIT_UP)),
    ("sit up", ExerciseResource::video(SIT_UP)),
    ("situp", ExerciseResource::video(SIT_UP)),
    ("crunch", ExerciseResource::video(CRUNCH)),
    ("crunches", ExerciseResource::video(CRUNCH)),
    ("russian twist", ExerciseResource::video(RUSSIAN_TWIST)),
    ("russian twists", ExerciseResource::video(RUSSIAN_TWIST)),
    // cardio
    (
        "high knees",
        ExerciseResource::video("https://www.youtube.com/watch?v=8ophJzCdKmw"),
    ),
    (
        "butt kicks",
        ExerciseResource::video("https://www.youtube.com/watch?v=5MgAjJwFnuk"),
    ),
    ("jumping lunge", ExerciseResource::video(JUMPING_LUNGE)),
    ("jumping lunges", ExerciseResource::video(JUMPING_LUNGE)),
    // yoga and flexibility
    (
        "downward dog",
        ExerciseResource::video("https://www.youtube.com/watch?v=M_8HBQRzA2k"),
    ),
    ("child pose", ExerciseResource::video(CHILD_POSE)),
    ("child's pose", ExerciseResource::video(CHILD_POSE)),
    (
        "warrior pose",
        ExerciseResource::video("https://www.youtube.com/watch?v=_VoX6QfTgHM"),
    ),
    (
        "tree pose",
        ExerciseResource::video("https://www.youtube.com/watch?v=YgJbLQQ3yII"),
    ),
];

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const A: &str = "https://example.com/A";
    const B: &str = "https://example.com/B";

    fn small_table() -> ResourceTable {
        ResourceTable::new(&[
            ("push-up", ExerciseResource::video(A)),
            ("squat", ExerciseResource::video(B)),
        ])
    }

    #[test]
    fn test_exercise_videos_unique_keys() {
        let mut keys = HashSet::new();
        for (key, _) in EXERCISE_VIDEOS {
            assert!(keys.insert(key), "duplicate key {key:?}");
        }
        assert_eq!(EXERCISE_RESOURCES.len(), EXERCISE_VIDEOS.len());
    }

    #[test]
    fn test_exercise_videos_canonical_keys() {
        for (key, _) in EXERCISE_VIDEOS {
            assert_eq!(normalize(key), *key);
            assert_eq!(strip_modifiers(key), *key, "key {key:?} contains modifier");
        }
    }

    #[test]
    fn test_exercise_videos_absolute_urls() {
        for (key, resource) in EXERCISE_VIDEOS {
            for url in [Some(resource.video_url), resource.image_url]
                .into_iter()
                .flatten()
            {
                let host = url.strip_prefix("https://").unwrap_or_default();
                assert!(
                    !host.is_empty() && !host.starts_with('/'),
                    "invalid URL {url:?} for {key:?}"
                );
            }
        }
    }

    #[test]
    fn test_resolve_every_key() {
        for (key, resource) in EXERCISE_RESOURCES.iter() {
            let expected = Some(resource.video_url);
            assert_eq!(EXERCISE_RESOURCES.resolve_video(key), expected);
            assert_eq!(EXERCISE_RESOURCES.resolve_video(&key.to_uppercase()), expected);
            assert_eq!(
                EXERCISE_RESOURCES.resolve_video(&format!("  {key}  ")),
                expected
            );
            assert_eq!(
                EXERCISE_RESOURCES.resolve(key).map(|r| r.tier),
                Some(MatchTier::Exact)
            );
        }
    }

    #[rstest]
    #[case("Push-Up", Some(("push-up", MatchTier::Exact)))]
    #[case("  PUSH   UP ", Some(("push up", MatchTier::Exact)))]
    #[case("Dumbbell Bicep Curl", Some(("bicep curl", MatchTier::ModifierStripped)))]
    #[case(
        "Dumbbell Bicep Curls (slow tempo)",
        Some(("bicep curls", MatchTier::ModifierStripped))
    )]
    #[case("bodyweight squats", Some(("squats", MatchTier::ModifierStripped)))]
    #[case("Jumping Lunge Burpee Combo", Some(("jumping lunge", MatchTier::Substring)))]
    #[case("Wide Push-Ups", Some(("push-up", MatchTier::Substring)))]
    #[case("Plan", Some(("plank", MatchTier::Substring)))]
    #[case("Pose Tree (Standing)", Some(("tree pose", MatchTier::WordOverlap)))]
    #[case("Russian Oblique Twists", Some(("russian twists", MatchTier::WordOverlap)))]
    #[case("Curl, Bicep", Some(("bicep curls", MatchTier::WordOverlap)))]
    #[case("nonexistent-exercise-xyz123", None)]
    #[case("Kettlebell Swing", None)]
    #[case("", None)]
    #[case("   ", None)]
    #[case("Dumbbell", None)]
    fn test_resolve(#[case] name: &str, #[case] expected: Option<(&str, MatchTier)>) {
        assert_eq!(
            find_exercise_resource(name).map(|r| (r.key, r.tier)),
            expected
        );
    }

    #[test]
    fn test_resolve_modifier_stripped_matches_plain_name() {
        assert_eq!(
            find_exercise_video("Dumbbell Bicep Curl"),
            find_exercise_video("bicep curl")
        );
        assert_eq!(find_exercise_video("bicep curl"), Some(BICEP_CURL));
    }

    #[test]
    fn test_resolve_small_table() {
        let table = small_table();
        assert_eq!(table.resolve_video("Push-Up"), Some(A));
        assert_eq!(table.resolve_video("bodyweight squats"), Some(B));
        assert_eq!(
            table.resolve("bodyweight squats").map(|r| r.tier),
            Some(MatchTier::Substring)
        );
        assert_eq!(table.resolve_video("jumping jack"), None);
    }

    #[test]
    fn test_resolve_cleaned_substring() {
        let table = ResourceTable::new(&[("row", ExerciseResource::video(A))]);
        assert_eq!(
            table.resolve("Bent-Over Dumbbell Row").map(|r| r.tier),
            Some(MatchTier::Substring)
        );
        let table = ResourceTable::new(&[("hip thrust hold", ExerciseResource::video(B))]);
        assert_eq!(
            table.resolve("Banded Seated Hip Thrust").map(|r| (r.key, r.tier)),
            Some(("hip thrust hold", MatchTier::CleanedSubstring))
        );
        assert_eq!(
            table.resolve("Slow Hip Thrust").map(|r| (r.key, r.tier)),
            Some(("hip thrust hold", MatchTier::CleanedSubstring))
        );
    }

    #[test]
    fn test_resolve_substring_prefers_longest_key() {
        let table = ResourceTable::new(&[
            ("lunge", ExerciseResource::video(A)),
            ("jumping lunge", ExerciseResource::video(B)),
        ]);
        assert_eq!(table.resolve_video("jumping lunge with twist"), Some(B));
    }

    #[test]
    fn test_resolve_equal_length_ties_follow_table_order() {
        let table = ResourceTable::new(&[
            ("dip", ExerciseResource::video(A)),
            ("row", ExerciseResource::video(B)),
        ]);
        assert_eq!(table.resolve_video("dip row"), Some(A));
        let table = ResourceTable::new(&[
            ("row", ExerciseResource::video(B)),
            ("dip", ExerciseResource::video(A)),
        ]);
        assert_eq!(table.resolve_video("dip row"), Some(B));
    }

    #[test]
    fn test_resolve_word_overlap_threshold() {
        let table = ResourceTable::new(&[(
            "single leg glute bridge",
            ExerciseResource::video(A),
        )]);
        // 2 of 4 words is not more than half
        assert_eq!(table.resolve_video("glute bridge march"), None);
        assert_eq!(table.resolve_video("bridge leg glute"), Some(A));
    }

    #[test]
    fn test_resolve_image_url() {
        let table = ResourceTable::new(&[(
            "plank",
            ExerciseResource::with_image(A, "https://example.com/plank.png"),
        )]);
        assert_eq!(
            table.resolve("Forearm Plank").map(|r| r.resource.image_url),
            Some(Some("https://example.com/plank.png"))
        );
    }

    #[test]
    fn test_resolve_duplicate_keys_keep_first() {
        let table = ResourceTable::new(&[
            ("plank", ExerciseResource::video(A)),
            ("plank", ExerciseResource::video(B)),
        ]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("plank"), Some(&ExerciseResource::video(A)));
    }

    #[test]
    fn test_resolve_empty_table() {
        let table = ResourceTable::new(&[]);
        assert!(table.is_empty());
        assert_eq!(table.resolve("squat"), None);
    }

    #[rstest]
    #[case("Übung für den Rücken")]
    #[case("深蹲")]
    #[case("💪🔥")]
    #[case("(((")]
    #[case("- - -")]
    fn test_resolve_unusual_input_does_not_panic(#[case] name: &str) {
        let _ = find_exercise_resource(name);
    }

    #[test]
    fn test_resolve_long_input() {
        let name = "squat ".repeat(10_000);
        assert_eq!(find_exercise_video(&name), Some(SQUAT));
        let name = "x".repeat(100_000);
        assert_eq!(find_exercise_video(&name), None);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        for name in ["Seated Russian Twist", "jumping jax", "", "Burpee Broad Jump"] {
            assert_eq!(find_exercise_resource(name), find_exercise_resource(name));
        }
    }

    #[test]
    fn test_resolve_concurrently() {
        std::thread::scope(|s| {
            let handles = (0..8)
                .map(|_| s.spawn(|| find_exercise_video("Alternating Lunges")))
                .collect::<Vec<_>>();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), Some(LUNGE));
            }
        });
    }

    #[rstest]
    #[case("  Dumbbell   Bicep Curl ", "dumbbell bicep curl")]
    #[case("PUSH-UP", "push-up")]
    #[case("", "")]
    fn test_normalize(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(normalize(name), expected);
    }

    #[rstest]
    #[case("standing single-arm dumbbell row", "row")]
    #[case("dumbbell bicep curls (slow tempo)", "bicep curls")]
    #[case("advanced controlled push-up,", "push-up")]
    #[case("kettlebell", "")]
    fn test_strip_modifiers(#[case] normalized: &str, #[case] expected: &str) {
        assert_eq!(strip_modifiers(normalized), expected);
    }

    #[test]
    fn test_match_tier_display() {
        assert_eq!(MatchTier::ModifierStripped.to_string(), "modifier-stripped");
    }
}
