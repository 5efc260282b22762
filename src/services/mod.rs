//! Domain services consumed by the application.
//!
//! # Responsibilities
//! - One capability trait per domain area
//! - Resolve optional capabilities once, at composition time
//!
//! Every operation either returns real data or a deterministic substitute
//! from [`mocks`]; errors are limited to non-network failures such as
//! `Unauthorized`.

pub mod mocks;
pub mod remote;
pub mod types;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::FeatureConfig;
use crate::error::GatewayResult;
use types::{
    AnalysisReport, AnalysisRequest, AssessmentResult, AssessmentSubmission, AtsReport, AtsRequest,
    CoverLetter, CoverLetterRequest, DeleteReceipt, Resume, ResumeSummary, ResumeUpload,
    SkillAssessment,
};

pub use remote::RemoteCareerApi;

#[async_trait]
pub trait ResumeService: Send + Sync {
    async fn list_resumes(&self) -> GatewayResult<Vec<ResumeSummary>>;
    async fn get_resume(&self, id: &str) -> GatewayResult<Resume>;
    async fn upload_resume(&self, upload: ResumeUpload) -> GatewayResult<ResumeSummary>;
    async fn delete_resume(&self, id: &str) -> GatewayResult<DeleteReceipt>;
}

#[async_trait]
pub trait AtsService: Send + Sync {
    /// Score a resume against a job posting.
    async fn score_resume(&self, request: AtsRequest) -> GatewayResult<AtsReport>;
}

#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// AI resume-to-job analysis, segmented into sections.
    async fn analyze_match(&self, request: AnalysisRequest) -> GatewayResult<AnalysisReport>;
}

#[async_trait]
pub trait SkillsService: Send + Sync {
    async fn skill_assessment(&self, skill: &str) -> GatewayResult<SkillAssessment>;
    async fn submit_assessment(&self, submission: AssessmentSubmission) -> GatewayResult<AssessmentResult>;
}

#[async_trait]
pub trait CoverLetterService: Send + Sync {
    async fn generate_cover_letter(&self, request: CoverLetterRequest) -> GatewayResult<CoverLetter>;
}

/// The set of services available to callers.
///
/// Optional capabilities are `None` when disabled in [`FeatureConfig`].
#[derive(Clone)]
pub struct CareerServices {
    pub resumes: Arc<dyn ResumeService>,
    pub ats: Arc<dyn AtsService>,
    pub analysis: Arc<dyn AnalysisService>,
    pub skills: Option<Arc<dyn SkillsService>>,
    pub cover_letters: Option<Arc<dyn CoverLetterService>>,
}

impl CareerServices {
    /// Every capability served by `api`, filtered by `features`.
    pub fn remote(api: Arc<RemoteCareerApi>, features: &FeatureConfig) -> Self {
        Self {
            resumes: api.clone(),
            ats: api.clone(),
            analysis: api.clone(),
            skills: features.skills.then(|| api.clone() as Arc<dyn SkillsService>),
            cover_letters: features
                .cover_letters
                .then(|| api.clone() as Arc<dyn CoverLetterService>),
        }
    }
}

impl std::fmt::Debug for CareerServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CareerServices")
            .field("skills", &self.skills.is_some())
            .field("cover_letters", &self.cover_letters.is_some())
            .finish_non_exhaustive()
    }
}
