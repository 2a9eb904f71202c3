//! Local heuristic flagging vague or unverifiable reports.

const EMPTY_REPORT: u8 = 80;
const SHORT_REPORT: u8 = 25;
const VAGUE_WORDING: u8 = 20;
const NO_EVIDENCE: u8 = 15;
const SHORT_REPORT_CHARS: usize = 30;

const VAGUE_WORDS: &[&str] = &[
    "more or less",
    "roughly",
    "kind of",
    "sort of",
    "skimmed",
    "glanced",
    "whatever",
    "basically done",
    "finished it",
    "差不多",
    "大概",
    "看了下",
    "略",
    "随便",
    "弄完了",
    "完成了",
];

const EVIDENCE_MARKERS: &[&str] = &[
    "screenshot",
    "commit",
    "notes",
    "recite",
    "截图",
    "笔记",
    "复述",
];

/// Scores a report from 0 (specific, evidenced) to 100 (empty).
///
/// ```rust
/// use proctor_core::checkin::suspicion_score;
///
/// assert_eq!(suspicion_score("", &[]), 80);
/// assert_eq!(suspicion_score("差不多完成了", &[]), 60);
/// ```
pub fn suspicion_score(report: &str, evidence: &[String]) -> u8 {
    let report = report.trim();
    if report.is_empty() {
        return EMPTY_REPORT;
    }

    let lowered = report.to_lowercase();
    let mut score: u8 = 0;
    if report.chars().count() < SHORT_REPORT_CHARS {
        score += SHORT_REPORT;
    }
    if VAGUE_WORDS.iter().any(|w| lowered.contains(w)) {
        score += VAGUE_WORDING;
    }
    let has_marker = EVIDENCE_MARKERS.iter().any(|m| lowered.contains(m));
    if evidence.is_empty() && !has_marker {
        score += NO_EVIDENCE;
    }
    score.min(100)
}
