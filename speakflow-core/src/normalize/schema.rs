//! Candidate tables: where each logical field has lived across the payload
//! shapes the backend has produced.
//!
//! Two shapes are known. The flat speech/vision analysis response
//! (`stt_result` + `video_result`, or `stt_analysis` + `vision_analysis` once
//! stored) and the nested `analysis.{voice,logic,video}` shape. Each list is
//! ordered most-current first.

use super::resolver::{at, Candidate, Source::*};

// ============================================
// Sub-record locations
// ============================================

pub const SPEECH_RECORD: &[Candidate] = &[at(Root, &["stt_result"]), at(Root, &["stt_analysis"])];

pub const VOICE_RECORD: &[Candidate] = &[
    at(Root, &["analysis", "voice"]),
    at(Speech, &["voice_analysis"]),
    at(Speech, &["voiceAnalysis"]),
    at(Speech, &["voice"]),
    at(Root, &["voice_analysis"]),
];

pub const VIDEO_RECORD: &[Candidate] = &[
    at(Root, &["analysis", "video"]),
    at(Root, &["video_result"]),
    at(Root, &["vision_analysis"]),
];

pub const LOGIC_RECORD: &[Candidate] = &[
    at(Root, &["analysis", "logic"]),
    at(Speech, &["logic"]),
    at(Root, &["logic"]),
];

pub const SCORES_RECORD: &[Candidate] = &[at(Root, &["scores"])];

// ============================================
// Fields
// ============================================

pub const DURATION: &[Candidate] = &[
    at(Speech, &["duration_sec"]),
    at(Speech, &["duration"]),
    at(Video, &["metadata", "duration_sec"]),
    at(Root, &["duration_sec"]),
    at(Root, &["duration"]),
];

pub const WPM: &[Candidate] = &[
    at(Voice, &["wpm"]),
    at(Speech, &["wordsPerMinute"]),
    at(Speech, &["wpm"]),
];

pub const WORD_COUNT: &[Candidate] = &[at(Speech, &["word_count"])];

pub const WORDS: &[Candidate] = &[at(Speech, &["words"])];

pub const PAUSE_EVENTS: &[Candidate] = &[
    at(Voice, &["pause_events"]),
    at(Speech, &["pause_events"]),
];

pub const LONG_PAUSE_COUNT: &[Candidate] = &[
    at(Voice, &["long_pause_count"]),
    at(Speech, &["long_pause_count"]),
];

pub const AVG_PAUSE_DURATION: &[Candidate] = &[
    at(Voice, &["avg_pause_duration"]),
    at(Speech, &["avg_pause_duration"]),
    at(Speech, &["pauseDuration"]),
];

pub const HESITATION_COUNT: &[Candidate] = &[
    at(Voice, &["hesitation_count"]),
    at(Speech, &["hesitationCount"]),
    at(Speech, &["hesitation_count"]),
];

pub const FILLER_COUNT: &[Candidate] = &[
    at(Voice, &["filler_count"]),
    at(Speech, &["fillerCount"]),
    at(Speech, &["filler_count"]),
];

pub const HESITATION_LIST: &[Candidate] = &[
    at(Voice, &["hesitation_list"]),
    at(Speech, &["hesitation_list"]),
];

pub const FILLER_LIST: &[Candidate] = &[
    at(Voice, &["filler_list"]),
    at(Speech, &["filler_list"]),
];

pub const SIMILARITY: &[Candidate] = &[
    at(Logic, &["similarity"]),
    at(Speech, &["logic_similarity"]),
    at(Root, &["logic_similarity"]),
];

pub const SIMILARITY_ANALYSIS: &[Candidate] = &[
    at(Logic, &["similarity_analysis"]),
    at(Logic, &["feedback"]),
    at(Speech, &["logic_feedback"]),
    at(Root, &["logic_feedback"]),
];

pub const OVERALL_SCORE: &[Candidate] = &[at(Root, &["overallScore"]), at(Root, &["score"])];

pub const SCORE_VOICE: &[Candidate] = &[at(Scores, &["voice"])];
pub const SCORE_LOGIC: &[Candidate] = &[at(Scores, &["logic"])];
pub const SCORE_VIDEO: &[Candidate] = &[at(Scores, &["video"])];
pub const SCORE_VIDEO_GAZE: &[Candidate] = &[at(Scores, &["video_gaze"])];
pub const SCORE_VIDEO_POSTURE: &[Candidate] = &[at(Scores, &["video_posture"])];
pub const SCORE_VIDEO_GESTURE: &[Candidate] = &[at(Scores, &["video_gesture"])];

pub const VIDEO_METADATA: &[Candidate] = &[at(Video, &["metadata"])];

pub const VIDEO_GAZE: &[Candidate] = &[at(Video, &["gaze"]), at(Root, &["gaze"])];
pub const VIDEO_POSTURE: &[Candidate] = &[at(Video, &["posture"]), at(Root, &["posture"])];
pub const VIDEO_GESTURE: &[Candidate] = &[at(Video, &["gesture"])];
pub const VIDEO_HAND: &[Candidate] = &[at(Video, &["hand"])];
pub const VIDEO_HEAD: &[Candidate] = &[at(Video, &["head_pose"]), at(Video, &["head"])];

/// Flat fields of the lightweight vision analyzer, lifted into sub-records.
pub const FLAT_GAZE_CENTER_RATIO: &[Candidate] = &[at(Video, &["gaze_center_ratio"])];
pub const FLAT_POSTURE_STABILITY: &[Candidate] = &[at(Video, &["posture_stability"])];

pub const FEEDBACK_PREVIEW: &[Candidate] = &[
    at(Root, &["feedback_preview"]),
    at(Video, &["feedback_preview"]),
];

pub const FINAL_REPORT: &[Candidate] = &[at(Root, &["final_report"])];

pub const FINAL_REPORT_PREVIEW: &[Candidate] = &[
    at(Root, &["final_report_preview"]),
    at(Root, &["feedback_preview"]),
];
