//! Deterministic substitutes for every domain operation.
//!
//! Each generator is a pure function of its input: the same arguments always
//! produce the same value, and nothing here touches the network, the clock or
//! shared state. Values are structurally identical to real backend payloads.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{BTreeMap, HashSet};

use crate::analysis::segment;
use crate::services::types::{
    AnalysisReport, AnalysisRequest, AssessmentResult, AssessmentSubmission, AtsReport, AtsRequest,
    CoverLetter, CoverLetterRequest, DeleteReceipt, Resume, ResumeSummary, ResumeUpload,
    SkillAssessment, SkillQuestion,
};

/// Provider name reported on substituted analyses.
pub const FALLBACK_PROVIDER: &str = "fallback";

const MAX_KEYWORDS: usize = 15;

const STOPWORDS: &[&str] = &[
    "and", "the", "for", "with", "you", "your", "our", "are", "will", "who", "that", "this",
    "have", "has", "from", "all", "its", "not", "but", "can", "work", "team", "role", "able",
    "about", "into", "their", "they", "what", "when", "where", "must", "should", "years",
    "experience", "strong", "including", "such", "using", "plus", "more", "also",
];

/// Stable 64-bit FNV-1a hash, used to seed per-input generators.
fn seed(input: &str) -> u64 {
    input.bytes().fold(0xcbf2_9ce4_8422_2325_u64, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0000_0100_0000_01b3)
    })
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
}

/// Distinct keywords of a job posting, in order of first appearance.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    tokens(text)
        .filter(|t| t.chars().count() >= 3 || t.contains(['+', '#']))
        .filter(|t| !t.chars().all(|c| c.is_ascii_digit()))
        .filter(|t| !STOPWORDS.contains(&t.as_str()))
        .filter(|t| seen.insert(t.clone()))
        .take(MAX_KEYWORDS)
        .collect()
}

pub fn resumes(_: &()) -> Vec<ResumeSummary> {
    vec![
        ResumeSummary {
            id: "sample-resume-1".to_string(),
            title: "Software Engineer Resume".to_string(),
            file_name: "software_engineer.pdf".to_string(),
            ats_score: Some(78),
            updated_at: None,
        },
        ResumeSummary {
            id: "sample-resume-2".to_string(),
            title: "Data Analyst Resume".to_string(),
            file_name: "data_analyst.pdf".to_string(),
            ats_score: Some(71),
            updated_at: None,
        },
    ]
}

pub fn resume(id: &String) -> Resume {
    Resume {
        id: id.clone(),
        title: "Sample Resume".to_string(),
        file_name: "sample_resume.pdf".to_string(),
        content: "Experienced engineer with a background in building reliable web services, \
                  APIs and data pipelines."
            .to_string(),
        skills: vec![
            "Python".to_string(),
            "SQL".to_string(),
            "REST APIs".to_string(),
            "Git".to_string(),
        ],
    }
}

pub fn uploaded_resume(upload: &ResumeUpload) -> ResumeSummary {
    ResumeSummary {
        id: format!("local-{:016x}", seed(&upload.file_name) ^ seed(&upload.title)),
        title: upload.title.clone(),
        file_name: upload.file_name.clone(),
        ats_score: None,
        updated_at: None,
    }
}

/// Deletion could not be confirmed by the backend.
pub fn delete_receipt(id: &String) -> DeleteReceipt {
    DeleteReceipt {
        id: id.clone(),
        deleted: false,
    }
}

/// Keyword-overlap ATS report.
pub fn ats_report(request: &AtsRequest) -> AtsReport {
    let mut posting = request.job_title.clone();
    posting.push(' ');
    posting.push_str(&request.job_description);
    let keywords = extract_keywords(&posting);

    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for token in tokens(&request.resume_text) {
        *counts.entry(token).or_default() += 1;
    }

    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut keyword_frequencies = BTreeMap::new();
    for keyword in keywords {
        match counts.get(&keyword) {
            Some(&count) => {
                keyword_frequencies.insert(keyword.clone(), count);
                matched.push(keyword);
            }
            None => missing.push(keyword),
        }
    }

    let total = matched.len() + missing.len();
    let score = if total == 0 {
        0
    } else {
        ((matched.len() * 100) as f64 / total as f64).round() as u32
    };

    AtsReport {
        score,
        matched_keywords: matched,
        missing_keywords: missing,
        keyword_frequencies,
    }
}

pub fn analysis_text(job_title: &str) -> String {
    format!(
        "STRENGTHS\n\
         - Clear structure with consistent section headings\n\
         - Relevant technical experience for a {job_title} position\n\
         WEAKNESSES\n\
         - Achievements are not quantified\n\
         - Summary is generic and not tailored to the role\n\
         KEYWORD ANALYSIS\n\
         - Core technical keywords from the posting are partially covered\n\
         - Soft-skill keywords are underrepresented\n\
         IMPROVEMENT SUGGESTIONS\n\
         - Add measurable outcomes to each role\n\
         - Mirror the job description's terminology for the {job_title} role\n\
         - Move the skills section above work history"
    )
}

pub fn analysis_report(request: &AnalysisRequest) -> AnalysisReport {
    let raw = analysis_text(&request.job_title);
    AnalysisReport {
        provider: FALLBACK_PROVIDER.to_string(),
        ats_score: None,
        sections: segment(&raw),
        raw,
    }
}

pub fn skill_assessment(skill: &String) -> SkillAssessment {
    let mut rng = StdRng::seed_from_u64(seed(skill));
    let mut question = |id: usize, prompt: String, options: [&str; 4]| {
        let mut options: Vec<String> = options.iter().map(|o| o.to_string()).collect();
        options.shuffle(&mut rng);
        SkillQuestion {
            id: format!("{skill}-q{id}"),
            prompt,
            options,
        }
    };

    let questions = vec![
        question(
            1,
            format!("How long have you used {skill} professionally?"),
            ["Less than a year", "1-2 years", "3-5 years", "More than 5 years"],
        ),
        question(
            2,
            format!("Which best describes your {skill} work?"),
            ["Coursework", "Personal projects", "Production features", "Led projects"],
        ),
        question(
            3,
            format!("How comfortable are you debugging {skill} issues alone?"),
            ["Not yet", "With guidance", "Mostly", "Fully"],
        ),
    ];

    SkillAssessment {
        skill: skill.clone(),
        questions,
    }
}

pub fn assessment_result(submission: &AssessmentSubmission) -> AssessmentResult {
    let answered = submission.answers.len().min(3) as u32;
    let depth: u32 = submission
        .answers
        .values()
        .take(3)
        .map(|&choice| choice.min(3) as u32)
        .sum();
    // Half the score for completion, half for the chosen options.
    let score = answered * 50 / 3 + depth * 50 / 9;

    let level = match score {
        0..=39 => "Beginner",
        40..=74 => "Intermediate",
        _ => "Advanced",
    };

    AssessmentResult {
        skill: submission.skill.clone(),
        score,
        level: level.to_string(),
        recommendations: vec![
            format!("Build a small project that exercises {} end to end", submission.skill),
            format!("List concrete {} achievements on your resume", submission.skill),
        ],
    }
}

pub fn cover_letter(request: &CoverLetterRequest) -> CoverLetter {
    let keywords = extract_keywords(&request.job_description);
    let focus = if keywords.is_empty() {
        "the responsibilities described in the posting".to_string()
    } else {
        keywords.iter().take(3).cloned().collect::<Vec<_>>().join(", ")
    };

    let body = format!(
        "Dear Hiring Manager,\n\n\
         I am writing to apply for the {title} position at {company}. My background \
         aligns closely with your needs, particularly in {focus}.\n\n\
         In previous roles I have delivered reliable results, collaborated across teams, \
         and continued to grow my skills. I would welcome the opportunity to bring that \
         experience to {company}.\n\n\
         Thank you for your consideration.\n\n\
         Sincerely,\nYour Name",
        title = request.job_title,
        company = request.company,
    );

    CoverLetter {
        job_title: request.job_title.clone(),
        company: request.company.clone(),
        body,
    }
}
