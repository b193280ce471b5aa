//! Property-based tests for result normalization
//!
//! These tests verify invariants that should hold for all inputs:
//! - Normalization is total and the preview is never empty
//! - Normalizing twice is the same as normalizing once
//! - Derived video and overall scores add up when not given explicitly

use proptest::prelude::*;
use serde_json::{json, Map, Value};
use speakflow_core::analytics::{aggregate_skill_progress, DEFAULT_WINDOW};
use speakflow_core::normalize::{coerce, is_canonical, normalize};
use speakflow_core::{CanonicalResult, Scores};

/// Keys the normalizer looks at, so generated payloads hit real paths.
const KEYS: &[&str] = &[
    "analysis",
    "stt_result",
    "stt_analysis",
    "video_result",
    "vision_analysis",
    "voice_analysis",
    "voice",
    "logic",
    "video",
    "scores",
    "overallScore",
    "score",
    "duration",
    "duration_sec",
    "metadata",
    "wpm",
    "wordsPerMinute",
    "word_count",
    "words",
    "pause_events",
    "long_pause_count",
    "avg_pause_duration",
    "filler_count",
    "filler_list",
    "similarity",
    "logic_similarity",
    "logic_feedback",
    "video_gaze",
    "video_posture",
    "video_gesture",
    "gaze",
    "posture",
    "head_pose",
    "center_ratio",
    "gaze_center_ratio",
    "interpretation",
    "feedback_preview",
    "final_report",
];

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        (-500i64..500).prop_map(Value::from),
        (-1.0e4f64..1.0e4).prop_map(|f| json!(f)),
        "-?[0-9]{1,4}(\\.[0-9]{1,2})?".prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
    ]
}

fn payload() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(5, 96, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map(prop::sample::select(KEYS), inner, 0..8).prop_map(
                |entries| {
                    Value::Object(
                        entries
                            .into_iter()
                            .map(|(k, v)| (k.to_string(), v))
                            .collect::<Map<String, Value>>(),
                    )
                }
            ),
        ]
    })
}

fn explicit_integer(raw: &Value, path: &[&str]) -> Option<i64> {
    let value = path
        .iter()
        .try_fold(raw, |current, key| current.get(*key))?;
    coerce::to_integer(value)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Property: every payload yields a result with a visible preview
    #[test]
    fn prop_normalize_is_total(raw in payload()) {
        let result = normalize(&raw);
        prop_assert!(!result.video().feedback_preview.trim().is_empty());
    }

    /// Property: normalize(normalize(x)) == normalize(x)
    #[test]
    fn prop_normalize_is_idempotent(raw in payload()) {
        let once = normalize(&raw);
        let twice = normalize(&once.to_value());
        prop_assert_eq!(once, twice);
    }

    /// Property: a missing or non-positive video score is the sum of its parts
    #[test]
    fn prop_video_score_defaults_to_sum(raw in payload()) {
        let explicit = explicit_integer(&raw, &["scores", "video"]);
        prop_assume!(explicit.map_or(true, |v| v <= 0));

        let result = normalize(&raw);
        prop_assert_eq!(result.scores.video, result.scores.video_subtotal());
    }

    /// Property: a missing or non-positive overall score is derived from the
    /// category scores whenever a score block was reported. A canonical
    /// payload whose scores are all defaults is the normalized form of a
    /// payload without scores and keeps its overall score.
    #[test]
    fn prop_overall_score_defaults_to_sum(raw in payload()) {
        prop_assume!(raw.get("scores").is_some_and(Value::is_object));
        let explicit = explicit_integer(&raw, &["overallScore"])
            .or_else(|| explicit_integer(&raw, &["score"]));
        prop_assume!(explicit.map_or(true, |v| v <= 0));

        let result = normalize(&raw);
        prop_assume!(!(is_canonical(&raw) && result.scores == Scores::default()));
        prop_assert_eq!(result.overall_score, result.scores.total());
    }

    /// Property: a canonical summary with a zero video score is re-derived
    #[test]
    fn prop_canonical_video_score_is_rederived(
        voice in 0i64..40,
        gaze in 0i64..15,
        posture in 0i64..15,
        gesture in 0i64..15,
        wpm in 1i64..250,
    ) {
        let raw = json!({
            "scores": {
                "voice": voice, "video": 0, "logic": 25,
                "video_gaze": gaze, "video_posture": posture, "video_gesture": gesture
            },
            "overallScore": 0,
            "analysis": {"voice": {"wpm": wpm}}
        });
        let result = normalize(&raw);
        prop_assert_eq!(result.analysis.voice.wpm, wpm);
        prop_assert_eq!(result.scores.video, gaze + posture + gesture);
        prop_assert_eq!(result.overall_score, voice + gaze + posture + gesture + 25);
    }

    /// Property: a score block with only sub-scores always adds up
    #[test]
    fn prop_sub_scores_add_up(
        voice in -100i64..100,
        gaze in -50i64..50,
        posture in -50i64..50,
        gesture in -50i64..50,
    ) {
        let raw = json!({
            "scores": {
                "voice": voice,
                "video_gaze": gaze,
                "video_posture": posture,
                "video_gesture": gesture
            }
        });
        let result = normalize(&raw);
        prop_assert_eq!(result.scores.video, gaze + posture + gesture);
        prop_assert_eq!(result.overall_score, voice + gaze + posture + gesture + 20);
    }

    /// Property: skill percentages stay within 0..=100
    #[test]
    fn prop_skill_progress_is_bounded(
        samples in prop::collection::vec((any::<Option<i8>>(), 0i64..400), 0..25)
    ) {
        let results: Vec<CanonicalResult> = samples
            .into_iter()
            .map(|(similarity, wpm)| {
                let mut result = CanonicalResult::default();
                result.analysis.logic.similarity = similarity.map(i64::from);
                result.analysis.voice.wpm = wpm;
                result
            })
            .collect();

        let summary = aggregate_skill_progress(&results, DEFAULT_WINDOW);
        prop_assert!((0..=100).contains(&summary.similarity));
        prop_assert!((0..=100).contains(&summary.pace));
    }
}
