//! Domain types exchanged with the career-services backend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::analysis::ParsedAnalysisSections;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResumeSummary {
    pub id: String,
    pub title: String,
    pub file_name: String,
    #[serde(default)]
    pub ats_score: Option<u32>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resume {
    pub id: String,
    pub title: String,
    pub file_name: String,
    /// Extracted plain text of the document.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub skills: Vec<String>,
}

/// A resume file to upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeUpload {
    pub title: String,
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteReceipt {
    pub id: String,
    pub deleted: bool,
}

/// Input to ATS scoring: resume text against a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsRequest {
    pub resume_text: String,
    pub job_title: String,
    pub job_description: String,
}

/// ATS score plus the data behind the keyword visualisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AtsReport {
    /// 0 – 100
    pub score: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// Keyword → occurrences in the resume, for word-cloud sizing.
    pub keyword_frequencies: BTreeMap<String, u32>,
}

/// Input to the AI resume-to-job analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub file_name: String,
    pub mime: String,
    pub file_bytes: Vec<u8>,
    pub job_title: String,
    pub job_description: String,
}

/// Body returned by an analysis provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderReply {
    #[serde(default)]
    pub analysis: String,
    #[serde(default)]
    pub ats_score: Option<u32>,
}

impl ProviderReply {
    pub fn is_empty(&self) -> bool {
        self.analysis.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Provider that produced the analysis, or "fallback".
    pub provider: String,
    #[serde(default)]
    pub ats_score: Option<u32>,
    pub raw: String,
    pub sections: ParsedAnalysisSections,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillQuestion {
    pub id: String,
    pub prompt: String,
    pub options: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillAssessment {
    pub skill: String,
    pub questions: Vec<SkillQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentSubmission {
    pub skill: String,
    /// Question ID → chosen option index.
    pub answers: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub skill: String,
    /// 0 – 100
    pub score: u32,
    pub level: String,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetterRequest {
    pub resume_text: String,
    pub job_title: String,
    pub company: String,
    pub job_description: String,
    #[serde(default)]
    pub tone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverLetter {
    pub job_title: String,
    pub company: String,
    pub body: String,
}
