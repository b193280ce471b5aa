//! Text and JSON rendering for CLI output.

use anyhow::Result;
use serde_json::Value;
use speakflow_core::format::{
    format_duration, format_relative_time_opt, format_similarity, score_band,
};
use speakflow_core::{CanonicalResult, PresentationRecord, UserStats};

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_result(result: &CanonicalResult) {
    let scores = &result.scores;
    let voice = result.voice();
    let logic = result.logic();

    println!(
        "Overall score: {} ({})",
        result.overall_score,
        score_band(result.overall_score)
    );
    println!("Duration:      {}", format_duration(result.duration));
    println!(
        "Scores:        voice {} | logic {} | video {} (gaze {}, posture {}, gesture {})",
        scores.voice,
        scores.logic,
        scores.video,
        scores.video_gaze,
        scores.video_posture,
        scores.video_gesture
    );
    println!();

    println!("Voice");
    println!("  Pace:        {} wpm", voice.wpm);
    println!(
        "  Pauses:      {} long (avg {:.2}s)",
        voice.long_pause_count, voice.avg_pause_duration
    );
    println!(
        "  Hesitations: {}{}",
        voice.hesitation_count,
        list_suffix(&voice.hesitation_list)
    );
    println!(
        "  Fillers:     {}{}",
        voice.filler_count,
        list_suffix(&voice.filler_list)
    );

    println!("Logic");
    println!("  Similarity:  {}", format_similarity(logic.similarity));
    for line in &logic.similarity_analysis {
        println!("  - {}", line);
    }

    println!("Video");
    println!("  {}", result.video().feedback_preview);

    if let Some(preview) = &result.final_report_preview {
        println!();
        println!("Report");
        println!("  {}", preview);
    }
}

fn list_suffix(items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!(" ({})", items.join(", "))
    }
}

pub fn print_history(history: &[PresentationRecord]) {
    if history.is_empty() {
        println!("No presentations found.");
        return;
    }

    println!(
        "{:<10}  {:>5}  {:>6}  {:<20}  TITLE",
        "UPDATED", "SCORE", "LENGTH", "PROJECT"
    );
    for record in history {
        println!(
            "{:<10}  {:>5}  {:>6}  {:<20}  {} [{}]",
            format_relative_time_opt(record.updated_at),
            record.result.overall_score,
            format_duration(record.result.duration),
            truncate(&record.project_name, 20),
            record.title,
            record.id
        );
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

pub fn print_stats(stats: &UserStats, window: usize) {
    let skills = &stats.skill_progress;

    println!("Presentations: {}", stats.total_presentations);
    println!("Average score: {}", stats.average_score);
    println!("Improvement:   {}", stats.format_improvement());
    println!();
    println!("Skill progress (last {})", window);
    println!("  Similarity:  {}%", skills.similarity);
    println!("  Pace:        {}%", skills.pace);
    println!("  Gaze:        {}%", skills.gaze);
    println!("  Posture:     {}%", skills.posture);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 20), "short");
        assert_eq!(truncate("a very long project name", 10), "a very ...");
    }

    #[test]
    fn test_list_suffix() {
        assert_eq!(list_suffix(&[]), "");
        assert_eq!(
            list_suffix(&["um".to_string(), "uh".to_string()]),
            " (um, uh)"
        );
    }
}
