use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::career::prompts::{CORE_INFO_MAX_TOKENS, CORE_INFO_PROMPT, CORE_INFO_SYSTEM};
use crate::llm_client::prompts::fill;
use crate::llm_client::{LlmClient, Structured};

/// Used whenever no skills could be extracted from a resume.
pub const DEFAULT_SKILLS: [&str; 2] = ["general programming", "problem solving"];

/// Skills, job title, headline and summary pulled from a resume in one call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoreInfo {
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: String,
}

impl CoreInfo {
    fn from_object(object: &Map<String, Value>) -> Self {
        let text = |key: &str| match object.get(key) {
            Some(Value::String(s)) => s.trim().to_string(),
            _ => String::new(),
        };
        let skills = match object.get("skills") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            Some(Value::String(list)) => list
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        };
        Self {
            skills,
            job_title: text("job_title"),
            headline: text("headline"),
            summary: text("summary"),
        }
    }

    /// Extracted skills, or `DEFAULT_SKILLS` when there are none.
    pub fn skills_or_default(&self) -> Vec<String> {
        if self.skills.is_empty() {
            DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect()
        } else {
            self.skills.clone()
        }
    }

    /// The extracted job title, unless the model could not determine one.
    pub fn known_job_title(&self) -> Option<&str> {
        let title = self.job_title.trim();
        if title.is_empty() || title.eq_ignore_ascii_case("unknown") {
            None
        } else {
            Some(title)
        }
    }
}

/// Never fails: an unusable reply yields an empty `CoreInfo`.
pub async fn extract_core_info(llm: &LlmClient, resume_text: &str) -> CoreInfo {
    let prompt = fill(CORE_INFO_PROMPT, &[("resume", resume_text)]);
    let reply = llm
        .complete_as_json(CORE_INFO_SYSTEM, &prompt, CORE_INFO_MAX_TOKENS)
        .await;

    let info = match reply {
        Ok(Structured::Object(object)) => CoreInfo::from_object(&object),
        Ok(Structured::Array(items)) => match items.first() {
            Some(Value::Object(object)) => CoreInfo::from_object(object),
            _ => CoreInfo::default(),
        },
        Err(record) => {
            warn!("Core info extraction failed: {}", record.error);
            CoreInfo::default()
        }
    };
    info!(
        "Extracted core info: {} skills, job title '{}'",
        info.skills.len(),
        info.job_title
    );
    info
}
