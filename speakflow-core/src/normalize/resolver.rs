//! Ordered, first-present-wins field resolution over raw payloads.
//!
//! A raw payload is first split into named sub-records ([`Source`]), each
//! located through its own candidate list. Logical fields are then read from
//! an ordered list of [`Candidate`]s. The first candidate that is present and
//! of the expected kind wins, even if a later one would convert more cleanly:
//! schema recency takes priority over data quality.

use serde_json::{Map, Value};

use super::coerce;

/// Sub-records of a raw payload that candidates are read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    /// The payload itself
    Root,
    /// Speech-to-text result (`stt_result` / `stt_analysis`)
    Speech,
    /// Voice delivery metrics
    Voice,
    /// Vision analysis result
    Video,
    /// Script comparison block
    Logic,
    /// Score block
    Scores,
}

/// One candidate location for a logical field: a sub-record plus a key path
/// inside it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    pub source: Source,
    pub path: &'static [&'static str],
}

/// Shorthand for building candidate tables.
pub const fn at(source: Source, path: &'static [&'static str]) -> Candidate {
    Candidate { source, path }
}

/// Located sub-records of one raw payload.
#[derive(Debug, Clone, Copy)]
pub struct Sources<'a> {
    root: &'a Value,
    speech: Option<&'a Value>,
    voice: Option<&'a Value>,
    video: Option<&'a Value>,
    logic: Option<&'a Value>,
    scores: Option<&'a Value>,
}

impl<'a> Sources<'a> {
    /// Locate every sub-record using the tables in [`super::schema`].
    ///
    /// Speech is located first because the voice and logic tables refer to it.
    pub fn locate(root: &'a Value) -> Self {
        let mut sources = Self {
            root,
            speech: None,
            voice: None,
            video: None,
            logic: None,
            scores: None,
        };
        sources.speech = sources.first_record(super::schema::SPEECH_RECORD);
        sources.voice = sources.first_record(super::schema::VOICE_RECORD);
        sources.video = sources.first_record(super::schema::VIDEO_RECORD);
        sources.logic = sources.first_record(super::schema::LOGIC_RECORD);
        // An empty score block still counts: it says "scores were reported".
        sources.scores = super::schema::SCORES_RECORD
            .iter()
            .find_map(|c| sources.lookup(c).filter(|v| v.is_object()));
        sources
    }

    /// The located sub-record, if any.
    pub fn get(&self, source: Source) -> Option<&'a Value> {
        match source {
            Source::Root => Some(self.root),
            Source::Speech => self.speech,
            Source::Voice => self.voice,
            Source::Video => self.video,
            Source::Logic => self.logic,
            Source::Scores => self.scores,
        }
    }

    /// Value at one candidate location, ignoring `null`.
    pub fn lookup(&self, candidate: &Candidate) -> Option<&'a Value> {
        let base = self.get(candidate.source)?;
        let value = candidate
            .path
            .iter()
            .try_fold(base, |current, key| current.get(*key))?;
        (!value.is_null()).then_some(value)
    }

    /// First non-null value.
    pub fn first_present(&self, candidates: &[Candidate]) -> Option<&'a Value> {
        candidates.iter().find_map(|c| self.lookup(c))
    }

    /// First value that coerces to a finite number.
    pub fn first_number(&self, candidates: &[Candidate]) -> Option<f64> {
        candidates
            .iter()
            .find_map(|c| self.lookup(c).and_then(coerce::to_number))
    }

    /// First value that coerces to a number, rounded to an integer.
    pub fn first_integer(&self, candidates: &[Candidate]) -> Option<i64> {
        self.first_number(candidates).map(coerce::round_to_i64)
    }

    /// First string value (possibly empty).
    pub fn first_string(&self, candidates: &[Candidate]) -> Option<&'a str> {
        candidates
            .iter()
            .find_map(|c| self.lookup(c).and_then(Value::as_str))
    }

    /// First string value with visible content.
    pub fn first_non_empty_string(&self, candidates: &[Candidate]) -> Option<&'a str> {
        candidates.iter().find_map(|c| {
            self.lookup(c)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
        })
    }

    /// First JSON array.
    pub fn first_array(&self, candidates: &[Candidate]) -> Option<&'a Vec<Value>> {
        candidates
            .iter()
            .find_map(|c| self.lookup(c).and_then(Value::as_array))
    }

    /// First JSON object (possibly empty).
    pub fn first_object(&self, candidates: &[Candidate]) -> Option<&'a Map<String, Value>> {
        candidates
            .iter()
            .find_map(|c| self.lookup(c).and_then(Value::as_object))
    }

    /// First value convertible to a string list.
    pub fn first_string_list(&self, candidates: &[Candidate]) -> Option<Vec<String>> {
        candidates
            .iter()
            .find_map(|c| self.lookup(c).and_then(coerce::to_string_list))
    }

    /// First non-empty object, used to locate sub-records.
    fn first_record(&self, candidates: &[Candidate]) -> Option<&'a Value> {
        candidates.iter().find_map(|c| {
            self.lookup(c)
                .filter(|v| v.as_object().is_some_and(|m| !m.is_empty()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locate_prefers_current_schema() {
        let raw = json!({
            "analysis": {"voice": {"wpm": 150}},
            "stt_result": {"voice_analysis": {"wpm": 120}}
        });
        let sources = Sources::locate(&raw);
        assert_eq!(sources.get(Source::Voice), Some(&json!({"wpm": 150})));
    }

    #[test]
    fn test_empty_records_are_skipped() {
        let raw = json!({
            "stt_result": {},
            "stt_analysis": {"duration_sec": 12},
            "analysis": {"video": {}},
            "vision_analysis": {"gaze": {}}
        });
        let sources = Sources::locate(&raw);
        assert_eq!(sources.get(Source::Speech), Some(&json!({"duration_sec": 12})));
        assert_eq!(sources.get(Source::Video), Some(&json!({"gaze": {}})));
    }

    #[test]
    fn test_empty_score_block_is_located() {
        let raw = json!({"scores": {}});
        assert!(Sources::locate(&raw).get(Source::Scores).is_some());

        let raw = json!({"scores": [1, 2]});
        assert!(Sources::locate(&raw).get(Source::Scores).is_none());
    }

    #[test]
    fn test_null_is_absent() {
        let raw = json!({"duration_sec": null, "duration": 30});
        let sources = Sources::locate(&raw);
        let candidates = [at(Source::Root, &["duration_sec"]), at(Source::Root, &["duration"])];
        assert_eq!(sources.first_present(&candidates), Some(&json!(30)));
    }

    #[test]
    fn test_first_number_skips_unparseable() {
        let raw = json!({"a": "fast", "b": "140"});
        let sources = Sources::locate(&raw);
        let candidates = [at(Source::Root, &["a"]), at(Source::Root, &["b"])];
        assert_eq!(sources.first_integer(&candidates), Some(140));
    }

    #[test]
    fn test_zero_is_present() {
        let raw = json!({"a": 0, "b": 55});
        let sources = Sources::locate(&raw);
        let candidates = [at(Source::Root, &["a"]), at(Source::Root, &["b"])];
        assert_eq!(sources.first_integer(&candidates), Some(0));
    }

    #[test]
    fn test_nested_paths_and_missing_sources() {
        let raw = json!({"video_result": {"metadata": {"duration_sec": 9.6}}});
        let sources = Sources::locate(&raw);
        assert_eq!(
            sources.first_integer(&[at(Source::Video, &["metadata", "duration_sec"])]),
            Some(10)
        );
        assert_eq!(sources.first_number(&[at(Source::Logic, &["similarity"])]), None);
    }

    #[test]
    fn test_non_object_root() {
        let raw = json!([{"scores": {}}]);
        let sources = Sources::locate(&raw);
        assert!(sources.get(Source::Scores).is_none());
        assert!(sources.first_present(&[at(Source::Root, &["scores"])]).is_none());
    }

    #[test]
    fn test_non_empty_string() {
        let raw = json!({"a": "  ", "b": "summary"});
        let sources = Sources::locate(&raw);
        let candidates = [at(Source::Root, &["a"]), at(Source::Root, &["b"])];
        assert_eq!(sources.first_string(&candidates), Some("  "));
        assert_eq!(sources.first_non_empty_string(&candidates), Some("summary"));
    }
}
