//! Free-text analysis segmentation.
//!
//! # Algorithm
//! - A line that is exactly a known heading switches the current section
//! - A bullet line under a known section is trimmed and appended to it
//! - An unknown heading clears the current section. Recognized heading shapes:
//!     - markdown `#` lines
//!     - lines wholly wrapped in `**` or `__`
//!     - short all-caps lines
//! - Everything else is discarded, including prose ending in a colon
//!
//! Best-effort and total: any input, including the empty string, yields all
//! four sections.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Sections recognized in analysis text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Strengths,
    Weaknesses,
    KeywordAnalysis,
    ImprovementSuggestions,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Strengths,
        Section::Weaknesses,
        Section::KeywordAnalysis,
        Section::ImprovementSuggestions,
    ];

    /// Key used in serialized output.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Strengths => "strengths",
            Section::Weaknesses => "weaknesses",
            Section::KeywordAnalysis => "keywordAnalysis",
            Section::ImprovementSuggestions => "improvementSuggestions",
        }
    }

    fn from_label(label: &str) -> Option<Section> {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "strengths" => Some(Section::Strengths),
            "weaknesses" => Some(Section::Weaknesses),
            "keyword analysis" => Some(Section::KeywordAnalysis),
            "improvement suggestions" => Some(Section::ImprovementSuggestions),
            _ => None,
        }
    }
}

/// Bullet lists per section. Every section is always present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAnalysisSections {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub keyword_analysis: Vec<String>,
    pub improvement_suggestions: Vec<String>,
}

impl ParsedAnalysisSections {
    pub fn get(&self, section: Section) -> &[String] {
        match section {
            Section::Strengths => &self.strengths,
            Section::Weaknesses => &self.weaknesses,
            Section::KeywordAnalysis => &self.keyword_analysis,
            Section::ImprovementSuggestions => &self.improvement_suggestions,
        }
    }

    fn get_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Strengths => &mut self.strengths,
            Section::Weaknesses => &mut self.weaknesses,
            Section::KeywordAnalysis => &mut self.keyword_analysis,
            Section::ImprovementSuggestions => &mut self.improvement_suggestions,
        }
    }

    /// Sections in display order, with their keys.
    pub fn iter(&self) -> impl Iterator<Item = (Section, &[String])> {
        Section::ALL.into_iter().map(move |s| (s, self.get(s)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().all(|(_, items)| items.is_empty())
    }
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:#{1,6}\s*)?(?:\*\*|__)?\s*(?:\d+[.)]\s*)?(?:\*\*|__)?\s*(strengths|weaknesses|keyword\s+analysis|improvement\s+suggestions)\s*(?:\*\*|__)?\s*:?\s*(?:\*\*|__)?\s*$",
        )
        .expect("heading pattern is valid")
    })
}

fn other_heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"^\s*(?:#{1,6}\s+\S.*|(?:\*\*|__)[^*_]+?(?:\*\*|__)\s*:?|[A-Z][A-Z0-9&/ ]{2,40}:?)\s*$",
        )
        .expect("heading pattern is valid")
    })
}

fn bullet_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+(.*\S)\s*$").expect("bullet pattern is valid"))
}

/// Split free-form analysis text into sections.
pub fn segment(text: &str) -> ParsedAnalysisSections {
    let mut sections = ParsedAnalysisSections::default();
    let mut current: Option<Section> = None;

    for line in text.lines() {
        if let Some(caps) = heading_re().captures(line) {
            current = Section::from_label(&caps[1]);
            continue;
        }

        if let Some(caps) = bullet_re().captures(line) {
            if let Some(section) = current {
                sections.get_mut(section).push(caps[1].trim().to_string());
            }
            continue;
        }

        if other_heading_re().is_match(line) {
            current = None;
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_example() {
        let parsed = segment("STRENGTHS\n- Clear writing\nWEAKNESSES\n- Too long");
        assert_eq!(parsed.strengths, vec!["Clear writing"]);
        assert_eq!(parsed.weaknesses, vec!["Too long"]);
        assert!(parsed.keyword_analysis.is_empty());
        assert!(parsed.improvement_suggestions.is_empty());
    }

    #[test]
    fn test_empty_input_is_total() {
        let parsed = segment("");
        assert!(parsed.is_empty());
        assert_eq!(parsed.iter().count(), 4);

        let json = serde_json::to_value(&parsed).unwrap();
        for key in ["strengths", "weaknesses", "keywordAnalysis", "improvementSuggestions"] {
            assert_eq!(json[key], serde_json::json!([]), "{key} missing");
        }
    }

    #[test]
    fn test_markdown_headings_and_bullet_styles() {
        let text = "\
## Keyword Analysis
* Rust appears 4 times
• Kubernetes missing
**Improvement Suggestions:**
1. Quantify impact
2) Add a skills section
Strengths:
-   Strong ownership   ";
        let parsed = segment(text);
        assert_eq!(parsed.keyword_analysis, vec!["Rust appears 4 times", "Kubernetes missing"]);
        assert_eq!(
            parsed.improvement_suggestions,
            vec!["Quantify impact", "Add a skills section"]
        );
        assert_eq!(parsed.strengths, vec!["Strong ownership"]);
        assert!(parsed.weaknesses.is_empty());
    }

    #[test]
    fn test_lines_outside_sections_are_discarded() {
        let text = "\
Overall this resume is solid.
- orphan bullet before any heading
Weaknesses
Some prose that is not a bullet.
- Gaps in employment
**Summary**
- belongs to an unknown section";
        let parsed = segment(text);
        assert_eq!(parsed.weaknesses, vec!["Gaps in employment"]);
        assert!(parsed.strengths.is_empty());
    }

    #[test]
    fn test_out_of_order_and_repeated_headings() {
        let text = "improvement suggestions\n- A\nstrengths\n- B\nIMPROVEMENT SUGGESTIONS\n- C";
        let parsed = segment(text);
        assert_eq!(parsed.improvement_suggestions, vec!["A", "C"]);
        assert_eq!(parsed.strengths, vec!["B"]);
    }

    #[test]
    fn test_prose_ending_in_colon_keeps_section() {
        let text = "\
STRENGTHS
The candidate demonstrates the following:
- Clear writing
In particular, note this:
- Consistent formatting";
        let parsed = segment(text);
        assert_eq!(parsed.strengths, vec!["Clear writing", "Consistent formatting"]);
    }

    #[test]
    fn test_unknown_headings_close_section() {
        let text = "\
Strengths
- A
**Overall Impression:**
- dropped
Weaknesses
- B
## Next Steps
- dropped
Keyword Analysis
- C
OTHER NOTES
- dropped";
        let parsed = segment(text);
        assert_eq!(parsed.strengths, vec!["A"]);
        assert_eq!(parsed.weaknesses, vec!["B"]);
        assert_eq!(parsed.keyword_analysis, vec!["C"]);
    }

    #[test]
    fn test_numbered_headings() {
        let parsed = segment("STRENGTHS\n- A\n2. WEAKNESSES\n- B\n3) **Keyword Analysis:**\n- C");
        assert_eq!(parsed.strengths, vec!["A"]);
        assert_eq!(parsed.weaknesses, vec!["B"]);
        assert_eq!(parsed.keyword_analysis, vec!["C"]);
    }

    #[test]
    fn test_localized_heading_fails_closed() {
        let parsed = segment("Fortalezas:\n- Buena redacción\nPuntos débiles\n- Muy largo");
        assert!(parsed.is_empty());
    }

    #[test]
    fn test_get_matches_fields() {
        let parsed = segment("Weaknesses\n- Typos");
        assert_eq!(parsed.get(Section::Weaknesses), ["Typos".to_string()]);
        assert_eq!(Section::KeywordAnalysis.key(), "keywordAnalysis");
    }
}
