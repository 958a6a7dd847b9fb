//! Fallback Coordinator — the only place that decides whether a failure is
//! recoverable.
//!
//! Every top-level operation escalates strictly: primary path, then a single
//! direct `complete` call with an operation-specific prompt, then a readable
//! degraded-service message. Lower layers return typed errors or sentinels and
//! never pick a fallback themselves.

use std::any::Any;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::index::IndexError;
use crate::llm_client::{is_failure, LlmClient, WARNING_MARKER};

/// Why a primary path gave up.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("{0}")]
    Llm(String),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("{0}")]
    NoResults(String),
}

// ─────────────────────────────────────────────────────────────────────────────
// "Fallible → default" combinator
// ─────────────────────────────────────────────────────────────────────────────

/// Awaits `work`; an error or a panic inside it becomes `default(reason)`.
pub async fn recover<T, E, F>(work: F, default: impl FnOnce(String) -> T) -> T
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    match AssertUnwindSafe(work).catch_unwind().await {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => {
            warn!("Recovering from failure: {e}");
            default(e.to_string())
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            error!("Recovering from panic: {reason}");
            default(reason)
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations and their fallback prompts
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    ResumeMatching,
    ResumeEnhancement,
    CareerPaths,
    CourseRecommendation,
    CoverLetter,
    InterviewQuestions,
}

impl Operation {
    pub fn label(&self) -> &'static str {
        match self {
            Operation::ResumeMatching => "resume matching",
            Operation::ResumeEnhancement => "resume enhancement",
            Operation::CareerPaths => "career recommendations",
            Operation::CourseRecommendation => "course recommendations",
            Operation::CoverLetter => "cover letter generation",
            Operation::InterviewQuestions => "interview questions",
        }
    }

    /// The direct-completion request used when the primary path fails.
    pub fn fallback_plan(&self, resume_text: &str, target_role: &str) -> FallbackPlan {
        match self {
            Operation::ResumeMatching => FallbackPlan::new(
                "You are a resume matching assistant.",
                format!(
                    "Describe the candidate profiles this resume would match most closely \
                     and the key skills they would share:\n\n{resume_text}"
                ),
                700,
            ),
            Operation::ResumeEnhancement => FallbackPlan::new(
                "You are a professional resume editor.",
                format!(
                    "Enhance this resume for the role of {target_role}. \
                     Add a professional summary and improve formatting:\n\n{resume_text}"
                ),
                1200,
            ),
            Operation::CareerPaths => FallbackPlan::new(
                "You are a career strategist.",
                format!("Suggest 3 job roles based on this resume:\n\n{resume_text}"),
                700,
            ),
            Operation::CourseRecommendation => FallbackPlan::new(
                "You are an expert learning advisor.",
                format!(
                    "Based on this resume, suggest 3-5 online courses that would be most beneficial:\n\
                     Resume: {resume_text}\n\n\
                     Provide recommendations in this format:\n\
                     - Course Title (Platform)\n\
                     - Why it's relevant\n\
                     - Skill level (Beginner/Intermediate/Advanced)"
                ),
                800,
            ),
            Operation::CoverLetter => FallbackPlan::new(
                "You are a professional cover letter writer.",
                format!(
                    "Write a professional cover letter for a job application based on the following resume. \
                     The letter should be in standard business letter format, including:\n\
                     - A formal greeting (e.g., 'Dear Hiring Manager,')\n\
                     - An engaging opening paragraph\n\
                     - A body that highlights relevant experience, skills, and motivation for the role\n\
                     - A strong closing paragraph\n\
                     - A professional sign-off (e.g., 'Sincerely, [Your Name]')\n\
                     Do NOT use markdown formatting, bullet points, or section headers. Write as a real letter.\n\
                     \nResume:\n{resume_text}"
                ),
                1000,
            ),
            Operation::InterviewQuestions => FallbackPlan::new(
                "You are an interview coach.",
                format!(
                    "Generate 5 technical and 5 behavioral interview questions based on this resume:\n\n{resume_text}"
                ),
                700,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FallbackPlan {
    pub system_role: &'static str,
    pub prompt: String,
    pub max_tokens: u32,
    /// Shown beneath the degraded message when both paths fail.
    pub degraded_detail: Option<String>,
}

impl FallbackPlan {
    pub fn new(system_role: &'static str, prompt: String, max_tokens: u32) -> Self {
        Self {
            system_role,
            prompt,
            max_tokens,
            degraded_detail: None,
        }
    }

    pub fn with_degraded_detail(mut self, detail: impl Into<String>) -> Self {
        self.degraded_detail = Some(detail.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Resolution {
    Primary,
    LocalFallback,
    Degraded,
}

#[derive(Debug, Clone, Serialize)]
pub struct OperationOutcome {
    pub operation: Operation,
    pub text: String,
    pub resolution: Resolution,
}

// ─────────────────────────────────────────────────────────────────────────────
// Coordinator
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct FallbackCoordinator {
    llm: LlmClient,
}

impl FallbackCoordinator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    /// Runs `primary`, escalating to `plan` and then to a degraded message.
    /// Always returns text; a panic in the primary path counts as a failure.
    pub async fn run<F>(&self, operation: Operation, primary: F, plan: FallbackPlan) -> OperationOutcome
    where
        F: Future<Output = Result<String, OperationError>>,
    {
        let failure = match AssertUnwindSafe(primary).catch_unwind().await {
            Ok(Ok(text)) if !is_failure(&text) => {
                return OperationOutcome {
                    operation,
                    text,
                    resolution: Resolution::Primary,
                }
            }
            Ok(Ok(sentinel)) => sentinel,
            Ok(Err(e)) => e.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };
        warn!(
            "Primary path for {} failed ({}), using local fallback",
            operation.label(),
            failure
        );

        let text = self.llm.complete(plan.system_role, &plan.prompt, plan.max_tokens).await;
        if !is_failure(&text) {
            info!("Local fallback succeeded for {}", operation.label());
            return OperationOutcome {
                operation,
                text,
                resolution: Resolution::LocalFallback,
            };
        }

        error!("Local fallback failed for {}: {}", operation.label(), text);
        OperationOutcome {
            operation,
            text: degraded_message(operation, &text, plan.degraded_detail.as_deref()),
            resolution: Resolution::Degraded,
        }
    }
}

fn degraded_message(operation: Operation, fallback_failure: &str, detail: Option<&str>) -> String {
    match detail {
        Some(detail) => format!(
            "{WARNING_MARKER} {} is temporarily unavailable, showing basic results instead:\n\n{detail}",
            capitalize_first(operation.label())
        ),
        None => format!(
            "{WARNING_MARKER} Service temporarily unavailable for {}. Please try again later. \
             (Local fallback failed: {fallback_failure})",
            operation.label()
        ),
    }
}

fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::llm_client::transport::scripted::ScriptedTransport;
    use crate::llm_client::transport::HttpReply;
    use crate::llm_client::RetryPolicy;

    fn coordinator(transport: Arc<ScriptedTransport>) -> FallbackCoordinator {
        FallbackCoordinator::new(LlmClient::new(transport, "m", RetryPolicy::immediate(1)))
    }

    fn plan() -> FallbackPlan {
        Operation::CareerPaths.fallback_plan("resume", "Engineer")
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let transport = Arc::new(ScriptedTransport::replying("unused"));
        let outcome = coordinator(transport.clone())
            .run(Operation::CareerPaths, async { Ok("three roles".to_string()) }, plan())
            .await;
        assert_eq!(outcome.resolution, Resolution::Primary);
        assert_eq!(outcome.text, "three roles");
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_sentinel_primary_escalates_to_fallback() {
        let transport = Arc::new(ScriptedTransport::replying("fallback answer"));
        let outcome = coordinator(transport.clone())
            .run(
                Operation::CareerPaths,
                async { Ok("❌ Max retries (3) exceeded".to_string()) },
                plan(),
            )
            .await;
        assert_eq!(outcome.resolution, Resolution::LocalFallback);
        assert_eq!(outcome.text, "fallback answer");
        assert_eq!(
            transport.prompts(),
            vec!["Suggest 3 job roles based on this resume:\n\nresume".to_string()]
        );
    }

    #[tokio::test]
    async fn test_panicking_primary_still_reaches_fallback() {
        let transport = Arc::new(ScriptedTransport::replying("recovered"));
        let outcome = coordinator(transport)
            .run(
                Operation::InterviewQuestions,
                async {
                    if true {
                        panic!("primary blew up");
                    }
                    Ok::<String, OperationError>(String::new())
                },
                Operation::InterviewQuestions.fallback_plan("resume", ""),
            )
            .await;
        assert_eq!(outcome.resolution, Resolution::LocalFallback);
        assert_eq!(outcome.text, "recovered");
    }

    #[tokio::test]
    async fn test_both_paths_failing_degrades_with_operation_name() {
        let transport = Arc::new(ScriptedTransport::always(500, "down"));
        let outcome = coordinator(transport)
            .run(
                Operation::CoverLetter,
                async { Err(OperationError::Llm("❌ down".into())) },
                Operation::CoverLetter.fallback_plan("resume", ""),
            )
            .await;
        assert_eq!(outcome.resolution, Resolution::Degraded);
        assert!(outcome.text.starts_with(WARNING_MARKER));
        assert!(outcome.text.contains("cover letter generation"));
    }

    #[tokio::test]
    async fn test_degraded_matching_shows_basic_results() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| {
            Ok(HttpReply {
                status: 503,
                body: "busy".into(),
            })
        }));
        let outcome = coordinator(transport)
            .run(
                Operation::ResumeMatching,
                async { Err(OperationError::Llm("❌ busy".into())) },
                Operation::ResumeMatching
                    .fallback_plan("resume", "")
                    .with_degraded_detail("1. [📄 Jane](http://x/static/resumes/jane.pdf)"),
            )
            .await;
        assert_eq!(outcome.resolution, Resolution::Degraded);
        assert!(outcome.text.contains("showing basic results"));
        assert!(outcome.text.ends_with("1. [📄 Jane](http://x/static/resumes/jane.pdf)"));
    }

    #[tokio::test]
    async fn test_recover_maps_errors_and_panics_to_default() {
        let ok: i32 = recover(async { Ok::<_, String>(7) }, |_| 0).await;
        assert_eq!(ok, 7);

        let failed = recover(async { Err::<i32, _>("bad item") }, |reason| {
            assert_eq!(reason, "bad item");
            1
        })
        .await;
        assert_eq!(failed, 1);

        let panicked = recover(
            async {
                if true {
                    panic!("inside analysis");
                }
                Ok::<i32, String>(0)
            },
            |reason| {
                assert!(reason.contains("inside analysis"));
                1
            },
        )
        .await;
        assert_eq!(panicked, 1);
    }
}
