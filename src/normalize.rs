//! Mood-record normalization: label canonicalization and score rescaling.
//!
//! These are the pure rules applied to whatever row the per-day resolver
//! selects, and re-applied in bulk by the offline normalize job. They must
//! stay side-effect free: the caller decides whether a change is persisted.

use crate::models::mood_log::{MoodLog, MoodMeta};

/// Map a raw emotion token to its canonical display form.
///
/// Lookup is case-insensitive; unmapped tokens fall back to the lowercased
/// input with its first character upper-cased. The fallback is not
/// guaranteed idempotent for every token (interior capitals collapse, and
/// some characters expand under Unicode uppercasing); the tests pin that
/// behavior instead of fixing it.
pub fn canonical_label(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let key = raw.to_lowercase();
    let mapped = match key.as_str() {
        "happy" => "Happy",
        "joyful" => "Joyful",
        "calm" => "Calm",
        "peaceful" => "Peaceful",
        "neutral" => "Neutral",
        "sad" => "Sad",
        "angry" => "Angry",
        "stressed" => "Stressed",
        "anxious" => "Anxious",
        "tired" => "Tired",
        "fearful" => "Anxious",
        "disgusted" => "Angry",
        "surprised" => "Confused",
        "high_energy" => "Joyful",
        _ => return capitalize_first(&key),
    };
    mapped.to_string()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Rescale a raw confidence/score value to the 0–100 display range.
///
/// Values ≤ 1 are treated as 0–1 fractions and multiplied by 100, rounded
/// half-away-from-zero; values > 1 pass through unchanged. A value of
/// exactly 1.0 is ambiguous (a full-confidence fraction or a tiny
/// 100-scale value?); the ≤ rule treats it as a fraction, so it rescales
/// to 100. Fractions that round to 1 are therefore the one input family
/// where a second application changes the value again.
pub fn rescale_score(value: f64) -> f64 {
    if value <= 1.0 {
        (value * 100.0).round()
    } else {
        value
    }
}

fn canonicalize_in_place(label: &mut Option<String>) -> bool {
    match label {
        Some(raw) => {
            let canonical = canonical_label(raw);
            if *raw != canonical {
                *raw = canonical;
                true
            } else {
                false
            }
        }
        None => false,
    }
}

fn rescale_in_place(score: &mut Option<f64>) -> bool {
    match score {
        Some(raw) => {
            let rescaled = rescale_score(*raw);
            if rescaled != *raw {
                *raw = rescaled;
                true
            } else {
                false
            }
        }
        None => false,
    }
}

fn canonicalize_meta_in_place(meta: &mut Option<MoodMeta>) -> bool {
    if let Some(meta) = meta {
        if let Some(selected) = &meta.selected_mood {
            let canonical = canonical_label(selected);
            if *selected != canonical {
                meta.selected_mood = Some(canonical);
                return true;
            }
        }
    }
    false
}

/// Canonicalize both emotion labels, rescale both scores, and canonicalize
/// `meta.selected_mood`, all in place. Returns whether anything actually
/// changed, which is what the normalize job uses to decide per-row updates.
pub fn normalize_mood_log(log: &mut MoodLog) -> bool {
    let mut changed = canonicalize_in_place(&mut log.face_emotion);
    changed |= canonicalize_in_place(&mut log.audio_emotion);
    changed |= rescale_in_place(&mut log.face_confidence);
    changed |= rescale_in_place(&mut log.audio_score);
    changed |= canonicalize_meta_in_place(&mut log.meta);
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn synonym_table_maps_regardless_of_case() {
        assert_eq!(canonical_label("happy"), "Happy");
        assert_eq!(canonical_label("FEARFUL"), "Anxious");
        assert_eq!(canonical_label("Disgusted"), "Angry");
        assert_eq!(canonical_label("surprised"), "Confused");
        assert_eq!(canonical_label("HIGH_ENERGY"), "Joyful");
        assert_eq!(canonical_label("tIrEd"), "Tired");
    }

    #[test]
    fn unmapped_tokens_get_first_letter_capitalized() {
        assert_eq!(canonical_label("excited"), "Excited");
        assert_eq!(canonical_label("EXCITED"), "Excited");
        assert_eq!(canonical_label("melancholy blues"), "Melancholy blues");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(canonical_label(""), "");
    }

    #[test]
    fn mapped_labels_are_idempotent() {
        for raw in [
            "happy",
            "joyful",
            "calm",
            "peaceful",
            "neutral",
            "sad",
            "angry",
            "stressed",
            "anxious",
            "tired",
            "fearful",
            "disgusted",
            "surprised",
            "high_energy",
        ] {
            let once = canonical_label(raw);
            assert_eq!(canonical_label(&once), once, "not idempotent for {raw}");
        }
    }

    #[test]
    fn fallback_collapses_interior_capitals() {
        // The fallback lowercases everything first, so "McDonald"-style
        // tokens lose their interior capitalization. Pinned, not fixed.
        assert_eq!(canonical_label("McIntyre"), "Mcintyre");
        assert_eq!(canonical_label("Mcintyre"), "Mcintyre");
    }

    #[test]
    fn fractions_rescale_to_percent() {
        assert_eq!(rescale_score(0.85), 85.0);
        assert_eq!(rescale_score(0.333), 33.0);
        assert_eq!(rescale_score(0.005), 1.0);
        assert_eq!(rescale_score(0.0), 0.0);
    }

    #[test]
    fn values_above_one_pass_through() {
        assert_eq!(rescale_score(85.0), 85.0);
        assert_eq!(rescale_score(1.5), 1.5);
        assert_eq!(rescale_score(100.0), 100.0);
    }

    #[test]
    fn exactly_one_is_treated_as_a_fraction() {
        // Ambiguous by contract: 1.0 could be a full-confidence fraction or
        // an already-rescaled tiny value. The ≤ rule says fraction.
        assert_eq!(rescale_score(1.0), 100.0);
    }

    #[test]
    fn rescale_is_idempotent_except_when_rounding_lands_on_one() {
        assert_eq!(rescale_score(rescale_score(0.85)), 85.0);
        assert_eq!(rescale_score(rescale_score(0.0)), 0.0);
        // 0.005 → 1, and 1 ≤ 1 rescales again. The known exception.
        assert_eq!(rescale_score(rescale_score(0.005)), 100.0);
    }

    fn sample_log() -> MoodLog {
        MoodLog {
            id: 1,
            user_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            time: chrono::NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            face_emotion: Some("fearful".into()),
            face_confidence: Some(0.92),
            audio_emotion: Some("HAPPY".into()),
            audio_score: Some(0.4),
            combined_score: 70,
            diary_id: None,
            meta: serde_json::from_str(
                r#"{"selected_mood":"high_energy","capture":{"camera":"front"}}"#,
            )
            .ok(),
            created_at: NaiveDate::from_ymd_opt(2026, 3, 14)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        }
    }

    #[test]
    fn normalize_mood_log_touches_every_field_once() {
        let mut log = sample_log();
        assert!(normalize_mood_log(&mut log));

        assert_eq!(log.face_emotion.as_deref(), Some("Anxious"));
        assert_eq!(log.audio_emotion.as_deref(), Some("Happy"));
        assert_eq!(log.face_confidence, Some(92.0));
        assert_eq!(log.audio_score, Some(40.0));
        let meta = log.meta.as_ref().unwrap();
        assert_eq!(meta.selected_mood.as_deref(), Some("Joyful"));

        // Second pass is a no-op on fully normalized data.
        assert!(!normalize_mood_log(&mut log));
    }

    #[test]
    fn meta_round_trip_preserves_unknown_fields() {
        let mut log = sample_log();
        normalize_mood_log(&mut log);
        let serialized = serde_json::to_value(log.meta.as_ref().unwrap()).unwrap();
        assert_eq!(serialized["selected_mood"], "Joyful");
        assert_eq!(serialized["capture"]["camera"], "front");
    }

    #[test]
    fn absent_fields_are_left_alone() {
        let mut log = sample_log();
        log.face_emotion = None;
        log.face_confidence = None;
        log.audio_emotion = None;
        log.audio_score = None;
        log.meta = None;
        assert!(!normalize_mood_log(&mut log));
    }
}
