//! Backend-backed implementation of every domain service.
//!
//! # Data Flow
//! ```text
//! trait method
//!     → FallbackOrchestrator::execute(policy, args)
//!         → policy.real: ApiClient (gatekeeper → reqwest → normalizer)
//!                        or ProviderCascade → segment() for analysis
//!         → policy.mock: services::mocks on substitution
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::segment;
use crate::error::GatewayResult;
use crate::http::client::ApiClient;
use crate::http::request::{resource_path, ApiRequest, MultipartPayload};
use crate::http::response::ApiResponse;
use crate::resilience::cascade::ProviderCascade;
use crate::resilience::fallback::{FallbackOrchestrator, FallbackPolicy, Sourced};
use crate::services::mocks;
use crate::services::types::{
    AnalysisReport, AnalysisRequest, AssessmentResult, AssessmentSubmission, AtsReport, AtsRequest,
    CoverLetter, CoverLetterRequest, DeleteReceipt, Resume, ResumeSummary, ResumeUpload,
    SkillAssessment,
};
use crate::services::{
    AnalysisService, AtsService, CoverLetterService, ResumeService, SkillsService,
};

pub const RESUMES_PATH: &str = "/api/resumes";
pub const ATS_SCORE_PATH: &str = "/api/ats/score";
pub const ASSESSMENT_SUBMIT_PATH: &str = "/api/skills/assessment";
pub const COVER_LETTERS_PATH: &str = "/api/cover-letters";

type RequestBuilder<A> = fn(&A) -> GatewayResult<ApiRequest>;

/// Policy for a plain JSON endpoint.
fn json_policy<A, T>(
    name: &'static str,
    client: &ApiClient,
    build: RequestBuilder<A>,
    timeout: Option<Duration>,
    mock: fn(&A) -> T,
) -> FallbackPolicy<A, T>
where
    A: Send + 'static,
    T: DeserializeOwned + Send + 'static,
{
    let client = client.clone();
    FallbackPolicy::new(
        name,
        move |args: A| {
            let client = client.clone();
            let request = build(&args).map(|request| match timeout {
                Some(timeout) => request.timeout(timeout),
                None => request,
            });
            async move { client.send_json::<T>(request?).await }
        },
        mock,
    )
}

fn resume_path(id: &str) -> String {
    resource_path(&["api", "resumes", id])
}

pub struct RemoteCareerApi {
    orchestrator: Arc<FallbackOrchestrator>,
    list_resumes: FallbackPolicy<(), Vec<ResumeSummary>>,
    get_resume: FallbackPolicy<String, Resume>,
    upload_resume: FallbackPolicy<ResumeUpload, ResumeSummary>,
    delete_resume: FallbackPolicy<String, DeleteReceipt>,
    score_resume: FallbackPolicy<AtsRequest, AtsReport>,
    analyze_match: FallbackPolicy<AnalysisRequest, AnalysisReport>,
    skill_assessment: FallbackPolicy<String, SkillAssessment>,
    submit_assessment: FallbackPolicy<AssessmentSubmission, AssessmentResult>,
    generate_cover_letter: FallbackPolicy<CoverLetterRequest, CoverLetter>,
}

impl RemoteCareerApi {
    /// `generation_timeout` applies to AI-backed calls outside the cascade.
    pub fn new(
        client: ApiClient,
        cascade: ProviderCascade,
        orchestrator: Arc<FallbackOrchestrator>,
        generation_timeout: Duration,
    ) -> Self {
        let list_resumes = json_policy(
            "list_resumes",
            &client,
            |_: &()| Ok(ApiRequest::get(RESUMES_PATH)),
            None,
            mocks::resumes,
        );

        let get_resume = json_policy(
            "get_resume",
            &client,
            |id: &String| Ok(ApiRequest::get(resume_path(id))),
            None,
            mocks::resume,
        );

        let upload_resume = json_policy(
            "upload_resume",
            &client,
            |upload: &ResumeUpload| {
                let payload = MultipartPayload::new()
                    .file("file", upload.file_name.clone(), upload.mime.clone(), upload.bytes.clone())
                    .text("title", upload.title.clone());
                Ok(ApiRequest::post(RESUMES_PATH).multipart(payload))
            },
            None,
            mocks::uploaded_resume,
        );

        // DELETE may answer 204 with no body.
        let delete_resume = {
            let client = client.clone();
            FallbackPolicy::new(
                "delete_resume",
                move |id: String| {
                    let client = client.clone();
                    async move {
                        let response = client.send(ApiRequest::delete(resume_path(&id))).await?;
                        Ok(response.map(|body| {
                            serde_json::from_value(body)
                                .unwrap_or_else(|_| DeleteReceipt { id, deleted: true })
                        }))
                    }
                },
                mocks::delete_receipt,
            )
        };

        let score_resume = json_policy(
            "score_resume",
            &client,
            |request: &AtsRequest| ApiRequest::post(ATS_SCORE_PATH).json(request),
            None,
            mocks::ats_report,
        );

        let analyze_match = FallbackPolicy::new(
            "analyze_match",
            move |request: AnalysisRequest| {
                let cascade = cascade.clone();
                async move {
                    let success = cascade.analyze(&request).await?;
                    let sections = segment(&success.reply.analysis);
                    if sections.is_empty() {
                        tracing::warn!(provider = %success.provider, "No known sections in analysis text");
                    }
                    let report = AnalysisReport {
                        provider: success.provider,
                        ats_score: success.reply.ats_score,
                        raw: success.reply.analysis,
                        sections,
                    };
                    Ok(ApiResponse::ok(report, 200, "OK"))
                }
            },
            mocks::analysis_report,
        );

        let skill_assessment = json_policy(
            "skill_assessment",
            &client,
            |skill: &String| Ok(ApiRequest::get(resource_path(&["api", "skills", skill.as_str(), "assessment"]))),
            None,
            mocks::skill_assessment,
        );

        let submit_assessment = json_policy(
            "submit_assessment",
            &client,
            |submission: &AssessmentSubmission| ApiRequest::post(ASSESSMENT_SUBMIT_PATH).json(submission),
            None,
            mocks::assessment_result,
        );

        let generate_cover_letter = json_policy(
            "generate_cover_letter",
            &client,
            |request: &CoverLetterRequest| ApiRequest::post(COVER_LETTERS_PATH).json(request),
            Some(generation_timeout),
            mocks::cover_letter,
        );

        Self {
            orchestrator,
            list_resumes,
            get_resume,
            upload_resume,
            delete_resume,
            score_resume,
            analyze_match,
            skill_assessment,
            submit_assessment,
            generate_cover_letter,
        }
    }

    pub fn orchestrator(&self) -> &Arc<FallbackOrchestrator> {
        &self.orchestrator
    }

    /// Analysis tagged with whether it came from a provider or the mock.
    pub async fn analyze_match_sourced(&self, request: AnalysisRequest) -> GatewayResult<Sourced<AnalysisReport>> {
        self.orchestrator.run(&self.analyze_match, request).await
    }

    /// ATS report tagged with its source.
    pub async fn score_resume_sourced(&self, request: AtsRequest) -> GatewayResult<Sourced<AtsReport>> {
        self.orchestrator.run(&self.score_resume, request).await
    }

    pub async fn list_resumes_sourced(&self) -> GatewayResult<Sourced<Vec<ResumeSummary>>> {
        self.orchestrator.run(&self.list_resumes, ()).await
    }
}

impl std::fmt::Debug for RemoteCareerApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCareerApi")
            .field("flags", self.orchestrator.flags())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ResumeService for RemoteCareerApi {
    async fn list_resumes(&self) -> GatewayResult<Vec<ResumeSummary>> {
        self.orchestrator.execute(&self.list_resumes, ()).await
    }

    async fn get_resume(&self, id: &str) -> GatewayResult<Resume> {
        self.orchestrator.execute(&self.get_resume, id.to_string()).await
    }

    async fn upload_resume(&self, upload: ResumeUpload) -> GatewayResult<ResumeSummary> {
        self.orchestrator.execute(&self.upload_resume, upload).await
    }

    async fn delete_resume(&self, id: &str) -> GatewayResult<DeleteReceipt> {
        self.orchestrator.execute(&self.delete_resume, id.to_string()).await
    }
}

#[async_trait]
impl AtsService for RemoteCareerApi {
    async fn score_resume(&self, request: AtsRequest) -> GatewayResult<AtsReport> {
        self.orchestrator.execute(&self.score_resume, request).await
    }
}

#[async_trait]
impl AnalysisService for RemoteCareerApi {
    async fn analyze_match(&self, request: AnalysisRequest) -> GatewayResult<AnalysisReport> {
        self.orchestrator.execute(&self.analyze_match, request).await
    }
}

#[async_trait]
impl SkillsService for RemoteCareerApi {
    async fn skill_assessment(&self, skill: &str) -> GatewayResult<SkillAssessment> {
        self.orchestrator.execute(&self.skill_assessment, skill.to_string()).await
    }

    async fn submit_assessment(&self, submission: AssessmentSubmission) -> GatewayResult<AssessmentResult> {
        self.orchestrator.execute(&self.submit_assessment, submission).await
    }
}

#[async_trait]
impl CoverLetterService for RemoteCareerApi {
    async fn generate_cover_letter(&self, request: CoverLetterRequest) -> GatewayResult<CoverLetter> {
        self.orchestrator.execute(&self.generate_cover_letter, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_paths_are_encoded() {
        assert_eq!(resume_path("r-1"), "/api/resumes/r-1");
        assert_eq!(resume_path("../admin"), "/api/resumes/..%2Fadmin");
    }
}
