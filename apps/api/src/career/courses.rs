//! Course catalogue import into the `course` content type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::index::{IndexError, IndexStore};
use crate::models::item::{ContentType, Metadata, Scalar};

/// One scraped course. `institution` falls back to `instructor`, then `platform`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CourseRecord {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub rating: Option<Scalar>,
    #[serde(default)]
    pub description: String,
}

impl CourseRecord {
    pub fn institution(&self) -> &str {
        [&self.institution, &self.instructor, &self.platform]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
            .unwrap_or_default()
    }

    /// Text that gets embedded: `"{title} {institution} {description}"`, trimmed.
    pub fn embedded_text(&self) -> String {
        format!(
            "{} {} {}",
            self.title.trim(),
            self.institution(),
            self.description.trim()
        )
        .trim()
        .to_string()
    }

    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::new();
        metadata.insert("title".into(), Scalar::from(self.title.trim()));
        metadata.insert("url".into(), Scalar::from(self.url.trim()));
        metadata.insert("institution".into(), Scalar::from(self.institution()));
        if let Some(rating) = &self.rating {
            if !rating.to_string().trim().is_empty() {
                metadata.insert("rating".into(), rating.clone());
            }
        }
        if !self.description.trim().is_empty() {
            metadata.insert("description".into(), Scalar::from(self.description.trim()));
        }
        metadata.insert("type".into(), Scalar::from("course"));
        metadata
    }

    fn is_importable(&self) -> bool {
        !self.title.trim().is_empty() && !self.url.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub total: usize,
}

/// Adds every usable record to the course index. Entries that are not objects
/// or lack a title or url are skipped and counted.
pub async fn import_courses(store: &IndexStore, records: Vec<Value>) -> Result<ImportReport, IndexError> {
    let mut report = ImportReport::default();

    for (i, raw) in records.into_iter().enumerate() {
        let record = match serde_json::from_value::<CourseRecord>(raw) {
            Ok(record) if record.is_importable() => record,
            _ => {
                debug!("Skipping course entry {}: not an object or missing title/url", i + 1);
                report.skipped += 1;
                continue;
            }
        };

        let ack = store
            .add(&record.embedded_text(), record.metadata(), &ContentType::Course)
            .await?;
        report.imported += 1;
        report.total = ack.total;
    }

    info!(
        "Imported {} courses ({} skipped)",
        report.imported, report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::index::HashEmbedder;

    #[test]
    fn test_institution_falls_back_to_instructor_then_platform() {
        let record: CourseRecord = serde_json::from_value(json!({
            "title": "ML", "url": "u", "instructor": "  ", "platform": "Coursera"
        }))
        .unwrap();
        assert_eq!(record.institution(), "Coursera");
        assert_eq!(record.embedded_text(), "ML Coursera");
    }

    #[tokio::test]
    async fn test_import_skips_unusable_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = IndexStore::new(dir.path(), Arc::new(HashEmbedder::default())).unwrap();

        let report = import_courses(
            &store,
            vec![
                json!({"title": "Deep Learning", "url": "https://c/dl", "instructor": "Andrew Ng", "rating": 4.9,
                       "description": "Neural networks"}),
                json!({"title": "No URL"}),
                json!("not an object"),
                json!({"title": "Kubernetes", "url": "https://c/k8s", "platform": "edX"}),
            ],
        )
        .await
        .unwrap();

        assert_eq!(
            report,
            ImportReport {
                imported: 2,
                skipped: 2,
                total: 2
            }
        );
        let corpus = store.get_corpus(&ContentType::Course).await.unwrap();
        assert_eq!(corpus[0].text, "Deep Learning Andrew Ng Neural networks");
        assert_eq!(corpus[0].metadata["institution"], Scalar::from("Andrew Ng"));
        assert_eq!(corpus[0].metadata["rating"], Scalar::Float(4.9));
        assert_eq!(corpus[1].metadata["type"], Scalar::from("course"));
    }
}
