//! The six user-facing career operations plus resume ingestion.
//!
//! Each operation is a primary path handed to the `FallbackCoordinator`, so
//! callers always get text back. Index/LLM failures inside a primary path are
//! returned as `OperationError` and never surface to the caller directly.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Url;
use serde::Serialize;
use tokio::sync::OnceCell;
use tracing::{info, warn};
use uuid::Uuid;

use crate::career::core_info::{extract_core_info, CoreInfo};
use crate::career::prompts::*;
use crate::career::text::clean_llm_output;
use crate::fallback::{FallbackCoordinator, FallbackPlan, Operation, OperationError, OperationOutcome, Resolution};
use crate::index::migration::{migrate_legacy, MigrationOutcome};
use crate::index::render::{render_results, resume_url};
use crate::index::{Ack, IndexError, IndexStore};
use crate::llm_client::prompts::fill;
use crate::llm_client::{is_failure, LlmClient};
use crate::models::item::{meta_text, ContentType, Metadata, SearchResult};
use crate::ranking::format::format_course_recommendations;
use crate::ranking::Ranker;

/// Role used in prompts when neither the caller nor the resume names one.
pub const FALLBACK_ROLE: &str = "Professional";
pub const DEFAULT_COURSE_RESULTS: usize = 5;

#[derive(Debug, Clone)]
pub struct CareerSettings {
    pub public_base_url: Url,
    pub max_similar_resumes: usize,
    pub legacy_index_file: PathBuf,
    pub legacy_corpus_file: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub filename: String,
    pub ack: Ack,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub migration: Option<MigrationOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProcessedResume {
    pub filename: String,
    pub structured_resume: CoreInfo,
    pub matched_resumes: OperationOutcome,
    pub enhanced_resume: OperationOutcome,
    pub career_paths: OperationOutcome,
    pub courses: OperationOutcome,
    pub cover_letter: OperationOutcome,
    pub interview_questions: OperationOutcome,
    /// `None` if the resume could not be added to the index.
    pub indexed: Option<IngestReport>,
}

#[derive(Clone)]
pub struct CareerAssistant {
    store: Arc<IndexStore>,
    llm: LlmClient,
    coordinator: FallbackCoordinator,
    ranker: Ranker,
    settings: CareerSettings,
    /// Set once the legacy import has been considered.
    legacy_import: Arc<OnceCell<()>>,
}

impl CareerAssistant {
    pub fn new(store: Arc<IndexStore>, llm: LlmClient, ranker: Ranker, settings: CareerSettings) -> Self {
        Self {
            coordinator: FallbackCoordinator::new(llm.clone()),
            store,
            llm,
            ranker,
            settings,
            legacy_import: Arc::new(OnceCell::new()),
        }
    }

    pub async fn core_info(&self, resume_text: &str) -> CoreInfo {
        extract_core_info(&self.llm, resume_text).await
    }

    /// Runs an operation through the coordinator. Non-degraded text is cleaned.
    async fn run<F>(&self, operation: Operation, primary: F, plan: FallbackPlan) -> OperationOutcome
    where
        F: std::future::Future<Output = Result<String, OperationError>>,
    {
        let mut outcome = self.coordinator.run(operation, primary, plan).await;
        if outcome.resolution != Resolution::Degraded {
            outcome.text = clean_llm_output(&outcome.text);
        }
        outcome
    }

    /// One LLM call whose sentinel reply counts as a primary-path failure.
    async fn complete_or_fail(&self, system: &str, prompt: &str, max_tokens: u32) -> Result<String, OperationError> {
        let reply = self.llm.complete(system, prompt, max_tokens).await;
        if is_failure(&reply) {
            return Err(OperationError::Llm(reply));
        }
        Ok(reply)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Resume matching
    // ─────────────────────────────────────────────────────────────────────

    /// Similar resumes from the index, scored by the LLM. `own_filename` is
    /// excluded from the matches.
    pub async fn match_resumes(&self, resume_text: &str, own_filename: Option<&str>) -> OperationOutcome {
        let top_k = self.settings.max_similar_resumes;
        let candidates = self
            .store
            .search(resume_text, &ContentType::Resume, top_k + 1, None)
            .await
            .map(|hits| exclude_own(hits, own_filename, top_k));

        let mut plan = Operation::ResumeMatching.fallback_plan(resume_text, "");
        if let Ok(hits) = &candidates {
            plan = plan.with_degraded_detail(render_results(
                hits,
                &ContentType::Resume,
                &self.settings.public_base_url,
                None,
            ));
        }

        let primary = self.match_resumes_primary(resume_text, candidates);
        self.run(Operation::ResumeMatching, primary, plan).await
    }

    async fn match_resumes_primary(
        &self,
        resume_text: &str,
        candidates: Result<Vec<SearchResult>, IndexError>,
    ) -> Result<String, OperationError> {
        let matches = candidates?;
        if matches.is_empty() {
            return Ok(NO_SIMILAR_RESUMES.to_string());
        }

        let base = &self.settings.public_base_url;
        let listing = matches
            .iter()
            .enumerate()
            .map(|(i, m)| {
                let filename = match meta_text(&m.metadata, "filename") {
                    f if f.is_empty() => format!("resume_{}.pdf", i + 1),
                    f => f.into_owned(),
                };
                format!(
                    "Resume {}: [{}]({})\n{}",
                    i + 1,
                    filename,
                    resume_url(base, &filename),
                    m.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let count = matches.len().to_string();
        let example_url = resume_url(base, "JohnDoe.pdf");
        let prompt = fill(
            MATCHING_PROMPT,
            &[
                ("count", count.as_str()),
                ("example_url", example_url.as_str()),
                ("resume", resume_text),
                ("matches", listing.as_str()),
            ],
        );
        self.complete_or_fail(MATCHING_SYSTEM, &prompt, MATCHING_MAX_TOKENS)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Enhancement
    // ─────────────────────────────────────────────────────────────────────

    /// Rewrites the resume for `target_role` (or the role the resume implies).
    pub async fn enhance_resume(&self, resume_text: &str, target_role: &str) -> OperationOutcome {
        let core = self.core_info(resume_text).await;
        self.enhance_resume_with(resume_text, target_role, &core).await
    }

    pub async fn enhance_resume_with(&self, resume_text: &str, target_role: &str, core: &CoreInfo) -> OperationOutcome {
        let role = role_for(Some(target_role), core);
        let plan = Operation::ResumeEnhancement.fallback_plan(resume_text, role);

        let skills = core.skills_or_default().join(", ");
        let prompt = fill(
            ENHANCEMENT_PROMPT,
            &[
                ("role", role),
                ("headline", core.headline.as_str()),
                ("summary", core.summary.as_str()),
                ("skills", skills.as_str()),
                ("resume", resume_text),
            ],
        );
        let primary = self.complete_or_fail(ENHANCEMENT_SYSTEM, &prompt, ENHANCEMENT_MAX_TOKENS);
        self.run(Operation::ResumeEnhancement, primary, plan).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Career paths, cover letter, interview questions
    // ─────────────────────────────────────────────────────────────────────

    pub async fn recommend_career_paths(&self, resume_text: &str, core: &CoreInfo) -> OperationOutcome {
        let skills = core.skills_or_default().join(", ");
        let prompt = fill(CAREERS_PROMPT, &[("skills", skills.as_str())]);
        let primary = self.complete_or_fail(CAREERS_SYSTEM, &prompt, CAREERS_MAX_TOKENS);
        let plan = Operation::CareerPaths.fallback_plan(resume_text, role_for(None, core));
        self.run(Operation::CareerPaths, primary, plan).await
    }

    pub async fn generate_cover_letter(&self, resume_text: &str, core: &CoreInfo) -> OperationOutcome {
        let role = role_for(None, core);
        let skills = core.skills_or_default().join(", ");
        let prompt = fill(COVER_LETTER_PROMPT, &[("role", role), ("skills", skills.as_str())]);
        let primary = self.complete_or_fail(COVER_LETTER_SYSTEM, &prompt, COVER_LETTER_MAX_TOKENS);
        let plan = Operation::CoverLetter.fallback_plan(resume_text, role);
        self.run(Operation::CoverLetter, primary, plan).await
    }

    pub async fn generate_interview_questions(&self, resume_text: &str, core: &CoreInfo) -> OperationOutcome {
        let role = role_for(None, core);
        let skills = core.skills_or_default().join(", ");
        let prompt = fill(INTERVIEW_PROMPT, &[("role", role), ("skills", skills.as_str())]);
        let primary = self.complete_or_fail(INTERVIEW_SYSTEM, &prompt, INTERVIEW_MAX_TOKENS);
        let plan = Operation::InterviewQuestions.fallback_plan(resume_text, role);
        self.run(Operation::InterviewQuestions, primary, plan).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Course recommendation
    // ─────────────────────────────────────────────────────────────────────

    /// Searches the course index for the target role (inferred from the skills
    /// when not given), ranks the hits and formats the survivors.
    pub async fn recommend_courses(
        &self,
        resume_text: &str,
        target_role: Option<&str>,
        skills: &[String],
        max_results: usize,
    ) -> OperationOutcome {
        let plan = Operation::CourseRecommendation.fallback_plan(resume_text, target_role.unwrap_or_default());
        let primary = self.recommend_courses_primary(target_role, skills, max_results);
        self.run(Operation::CourseRecommendation, primary, plan).await
    }

    async fn recommend_courses_primary(
        &self,
        target_role: Option<&str>,
        skills: &[String],
        max_results: usize,
    ) -> Result<String, OperationError> {
        let role = match target_role.map(str::trim).filter(|r| !r.is_empty()) {
            Some(role) => role.to_string(),
            None => self.infer_role(skills).await?,
        };

        let hits = self
            .store
            .search(&role, &ContentType::Course, max_results * 2, None)
            .await?;
        if hits.is_empty() {
            return Err(OperationError::NoResults(
                "No courses found in the course index".to_string(),
            ));
        }

        let items = hits
            .into_iter()
            .map(|hit| hit.into_item(ContentType::Course))
            .collect();
        let ranked = self.ranker.rank(items, skills, &role, max_results).await;
        if ranked.is_empty() {
            return Err(OperationError::NoResults(format!(
                "No course scored as relevant for {role}"
            )));
        }

        Ok(format_course_recommendations(&ranked, skills, &role))
    }

    async fn infer_role(&self, skills: &[String]) -> Result<String, OperationError> {
        let prompt = fill(ROLE_INFERENCE_PROMPT, &[("skills", skills.join(", ").as_str())]);
        let role = self
            .complete_or_fail(ROLE_INFERENCE_SYSTEM, &prompt, ROLE_INFERENCE_MAX_TOKENS)
            .await?;
        let role = role.trim().trim_matches('"').to_string();
        info!("Inferred target role: {role}");
        Ok(role)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Ingestion and the full pipeline
    // ─────────────────────────────────────────────────────────────────────

    /// Adds a resume to the index under `stored_filename`. The first resume
    /// added to an empty index triggers the legacy import, at most once per
    /// assistant even when several ingestions start together.
    pub async fn ingest_resume(&self, resume_text: &str, stored_filename: &str) -> Result<IngestReport, IndexError> {
        let mut migration = None;
        let slot = &mut migration;
        self.legacy_import
            .get_or_try_init(|| async move {
                *slot = self.migrate_if_empty().await?;
                Ok::<(), IndexError>(())
            })
            .await?;

        let mut metadata = Metadata::new();
        metadata.insert("filename".into(), stored_filename.into());
        let ack = self.store.add(resume_text, metadata, &ContentType::Resume).await?;

        Ok(IngestReport {
            filename: stored_filename.to_string(),
            ack,
            migration,
        })
    }

    async fn migrate_if_empty(&self) -> Result<Option<MigrationOutcome>, IndexError> {
        let (_, existing) = self.store.lengths(&ContentType::Resume).await?;
        if existing > 0 {
            return Ok(None);
        }
        let outcome = migrate_legacy(
            &self.store,
            &self.settings.legacy_index_file,
            &self.settings.legacy_corpus_file,
            &ContentType::Resume,
        )
        .await;
        match outcome {
            Ok(outcome) => Ok(Some(outcome)),
            Err(e) => {
                warn!("Legacy migration skipped: {e}");
                Ok(None)
            }
        }
    }

    /// Core info, then every operation in order, then ingestion of the resume itself.
    pub async fn process_resume(
        &self,
        resume_text: &str,
        original_filename: &str,
        target_role: Option<&str>,
    ) -> Result<ProcessedResume, IndexError> {
        if resume_text.trim().is_empty() {
            return Err(IndexError::EmptyInput);
        }
        let filename = stored_filename(original_filename);
        info!("Processing resume {filename}");

        let core = self.core_info(resume_text).await;
        let role = role_for(target_role, &core).to_string();
        let skills = core.skills_or_default();

        let matched_resumes = self.match_resumes(resume_text, Some(&filename)).await;
        let enhanced_resume = self.enhance_resume_with(resume_text, &role, &core).await;
        let career_paths = self.recommend_career_paths(resume_text, &core).await;
        let courses = self
            .recommend_courses(resume_text, Some(&role), &skills, DEFAULT_COURSE_RESULTS)
            .await;
        let cover_letter = self.generate_cover_letter(resume_text, &core).await;
        let interview_questions = self.generate_interview_questions(resume_text, &core).await;

        let indexed = match self.ingest_resume(resume_text, &filename).await {
            Ok(report) => Some(report),
            Err(e) => {
                warn!("Could not index resume {filename}: {e}");
                None
            }
        };

        Ok(ProcessedResume {
            filename,
            structured_resume: core,
            matched_resumes,
            enhanced_resume,
            career_paths,
            courses,
            cover_letter,
            interview_questions,
            indexed,
        })
    }
}

/// `<uuid>_<basename>`: unique on disk, readable after `clean_filename`.
pub fn stored_filename(original: &str) -> String {
    let base = Path::new(original.trim())
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("resume.pdf");
    format!("{}_{}", Uuid::new_v4(), base)
}

/// The caller's role if given, else the resume's job title, else `FALLBACK_ROLE`.
fn role_for<'a>(requested: Option<&'a str>, core: &'a CoreInfo) -> &'a str {
    requested
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .or_else(|| core.known_job_title())
        .unwrap_or(FALLBACK_ROLE)
}

fn exclude_own(hits: Vec<SearchResult>, own_filename: Option<&str>, top_k: usize) -> Vec<SearchResult> {
    hits.into_iter()
        .filter(|hit| match own_filename {
            Some(own) => meta_text(&hit.metadata, "filename") != own,
            None => true,
        })
        .take(top_k)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::index::flat::FlatL2Index;
    use crate::index::persistence::write_index_to;
    use crate::index::{Embedder, HashEmbedder};
    use crate::llm_client::transport::scripted::{completion, ScriptedTransport};
    use crate::llm_client::transport::HttpReply;
    use crate::llm_client::{RetryPolicy, FAILURE_MARKER};
    use crate::models::item::Scalar;
    use crate::ranking::LlmRelevanceAnalyzer;

    struct Fixture {
        _dir: tempfile::TempDir,
        store: Arc<IndexStore>,
        assistant: CareerAssistant,
    }

    fn fixture(transport: Arc<ScriptedTransport>) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(IndexStore::new(dir.path().join("index"), Arc::new(HashEmbedder::default())).unwrap());
        let llm = LlmClient::new(transport, "m", RetryPolicy::immediate(2));
        let ranker = Ranker::new(Arc::new(LlmRelevanceAnalyzer::new(llm.clone())), 2);
        let settings = CareerSettings {
            public_base_url: Url::parse("http://localhost:8000").unwrap(),
            max_similar_resumes: 3,
            legacy_index_file: dir.path().join("legacy.bin"),
            legacy_corpus_file: dir.path().join("legacy.json"),
        };
        Fixture {
            assistant: CareerAssistant::new(store.clone(), llm, ranker, settings),
            store,
            _dir: dir,
        }
    }

    fn server_error() -> HttpReply {
        HttpReply {
            status: 500,
            body: "upstream down".into(),
        }
    }

    #[tokio::test]
    async fn test_enhance_resume_falls_back_when_primary_fails() {
        let transport = Arc::new(ScriptedTransport::new(|request, _| {
            let prompt = request.prompt();
            if prompt.starts_with("Enhance this resume for the role of Data Scientist") {
                Ok(completion("## Summary\\nData Scientist with a track record of shipping models."))
            } else if prompt.starts_with("Act as a professional resume editor") {
                Ok(server_error())
            } else {
                Ok(completion("{\"skills\": [\"Python\"], \"job_title\": \"Analyst\"}"))
            }
        }));
        let fx = fixture(transport);

        let outcome = fx
            .assistant
            .enhance_resume("John Doe resume text", "Data Scientist")
            .await;

        assert_eq!(outcome.resolution, Resolution::LocalFallback);
        assert!(!outcome.text.is_empty());
        assert!(!outcome.text.contains(FAILURE_MARKER));
        assert_eq!(
            outcome.text,
            "## Summary\nData Scientist with a track record of shipping models."
        );
    }

    #[tokio::test]
    async fn test_enhance_uses_resume_title_when_no_role_given() {
        let transport = Arc::new(ScriptedTransport::new(|request, _| {
            if request.prompt().starts_with("Act as a professional resume editor") {
                Ok(completion(request.prompt()))
            } else {
                Ok(completion("{\"job_title\": \"Platform Engineer\"}"))
            }
        }));
        let fx = fixture(transport);
        let outcome = fx.assistant.enhance_resume("resume", "  ").await;
        assert_eq!(outcome.resolution, Resolution::Primary);
        assert!(outcome.text.contains("target the job role of 'Platform Engineer'"));
    }

    #[tokio::test]
    async fn test_matching_with_empty_index_is_a_primary_answer() {
        let transport = Arc::new(ScriptedTransport::replying("unused"));
        let fx = fixture(transport.clone());
        let outcome = fx.assistant.match_resumes("some resume", None).await;
        assert_eq!(outcome.resolution, Resolution::Primary);
        assert_eq!(outcome.text, NO_SIMILAR_RESUMES);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_matching_excludes_own_file_and_degrades_to_links() {
        let transport = Arc::new(ScriptedTransport::new(|_, _| Ok(server_error())));
        let fx = fixture(transport);
        for (text, file) in [("rust backend engineer", "a_self.pdf"), ("rust systems engineer", "b_other.pdf")] {
            let mut metadata = Metadata::new();
            metadata.insert("filename".into(), Scalar::from(file));
            fx.store.add(text, metadata, &ContentType::Resume).await.unwrap();
        }

        let outcome = fx
            .assistant
            .match_resumes("rust backend engineer", Some("a_self.pdf"))
            .await;
        assert_eq!(outcome.resolution, Resolution::Degraded);
        assert!(outcome.text.contains("static/resumes/b_other.pdf"));
        assert!(!outcome.text.contains("a_self.pdf"));
    }

    #[tokio::test]
    async fn test_course_recommendation_ranks_indexed_courses() {
        let transport = Arc::new(ScriptedTransport::new(|request, _| {
            let prompt = request.prompt();
            if prompt.contains("- Title: Deep Learning") {
                Ok(completion("{\"relevance_score\": 9, \"reasoning\": \"core\"}"))
            } else if prompt.contains("- Title: Watercolor") {
                Ok(completion("{\"relevance_score\": 2}"))
            } else {
                Ok(server_error())
            }
        }));
        let fx = fixture(transport);
        for (title, url) in [("Deep Learning", "https://c/dl"), ("Watercolor", "https://c/wc")] {
            let mut metadata = Metadata::new();
            metadata.insert("title".into(), Scalar::from(title));
            metadata.insert("url".into(), Scalar::from(url));
            fx.store.add(title, metadata, &ContentType::Course).await.unwrap();
        }

        let outcome = fx
            .assistant
            .recommend_courses("resume", Some("ML Engineer"), &["Python".to_string()], 5)
            .await;
        assert_eq!(outcome.resolution, Resolution::Primary);
        assert!(outcome.text.contains("[Deep Learning](https://c/dl)"));
        assert!(!outcome.text.contains("Watercolor"));
    }

    #[tokio::test]
    async fn test_course_recommendation_escalates_on_empty_index() {
        let transport = Arc::new(ScriptedTransport::replying("1. Rust in Action (Manning)"));
        let fx = fixture(transport.clone());
        let outcome = fx
            .assistant
            .recommend_courses("resume", Some("SRE"), &[], 5)
            .await;
        assert_eq!(outcome.resolution, Resolution::LocalFallback);
        assert!(transport.prompts()[0].starts_with("Based on this resume, suggest 3-5 online courses"));
    }

    #[tokio::test]
    async fn test_first_ingestion_runs_legacy_migration() {
        let transport = Arc::new(ScriptedTransport::replying("unused"));
        let fx = fixture(transport);

        let first = fx.assistant.ingest_resume("first resume", "id_first.pdf").await.unwrap();
        assert_eq!(first.migration, Some(MigrationOutcome::NotFound));
        assert_eq!(first.ack.total, 1);

        let second = fx.assistant.ingest_resume("second resume", "id_second.pdf").await.unwrap();
        assert_eq!(second.migration, None);
        assert_eq!(second.ack.total, 2);
    }

    fn write_legacy_pair(settings: &CareerSettings, corpus: &[(&str, &str)]) {
        let embedder = HashEmbedder::default();
        let mut index = FlatL2Index::new(embedder.dimension());
        for (text, _) in corpus {
            index.add(&embedder.embed_sync(text)).unwrap();
        }
        let mut bytes = Vec::new();
        write_index_to(&index, &mut bytes).unwrap();
        std::fs::write(&settings.legacy_index_file, bytes).unwrap();
        std::fs::write(&settings.legacy_corpus_file, serde_json::to_vec(corpus).unwrap()).unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_ingestions_import_legacy_once() {
        for _ in 0..10 {
            let fx = fixture(Arc::new(ScriptedTransport::replying("unused")));
            write_legacy_pair(
                &fx.assistant.settings,
                &[("legacy data engineer", "1_a.pdf"), ("legacy ml researcher", "2_b.pdf")],
            );

            let handles: Vec<_> = (0..4)
                .map(|i| {
                    let assistant = fx.assistant.clone();
                    tokio::spawn(async move {
                        assistant
                            .ingest_resume(&format!("new resume {i}"), &format!("id_{i}.pdf"))
                            .await
                            .unwrap()
                    })
                })
                .collect();

            let mut migrations = 0;
            for handle in handles {
                if let Some(MigrationOutcome::Migrated { count, .. }) = handle.await.unwrap().migration {
                    assert_eq!(count, 2);
                    migrations += 1;
                }
            }
            assert_eq!(migrations, 1);
            assert_eq!(fx.store.lengths(&ContentType::Resume).await.unwrap(), (6, 6));
        }
    }

    #[tokio::test]
    async fn test_process_resume_runs_every_operation_and_indexes() {
        let transport = Arc::new(ScriptedTransport::replying("{\"job_title\": \"Engineer\"}"));
        let fx = fixture(transport);

        let processed = fx
            .assistant
            .process_resume("Jane Doe, backend engineer", "uploads/jane.pdf", None)
            .await
            .unwrap();
        assert!(processed.filename.ends_with("_jane.pdf"));
        assert_eq!(processed.structured_resume.job_title, "Engineer");
        assert!(processed.indexed.is_some());
        assert_eq!(fx.store.lengths(&ContentType::Resume).await.unwrap(), (1, 1));

        let err = fx.assistant.process_resume("   ", "x.pdf", None).await.unwrap_err();
        assert!(matches!(err, IndexError::EmptyInput));
    }

    #[test]
    fn test_stored_filename_keeps_basename() {
        let name = stored_filename("../../etc/cv.pdf");
        assert!(name.ends_with("_cv.pdf"));
        assert_eq!(name.len(), 36 + 1 + "cv.pdf".len());
    }
}
