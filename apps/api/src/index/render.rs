//! Markdown rendering of search hits as clickable result lists.

use reqwest::Url;

use crate::models::item::{meta_text, ContentType, SearchResult};

pub const NO_ITEMS: &str = "📝 No items found in the database.";
pub const NO_SIMILAR_ITEMS: &str = "📝 No similar items found in the database.";

/// Readable display name for a stored file: drops a `<uuid>_` prefix and the
/// extension, turns `-`/`_` into spaces and capitalizes each word.
pub fn clean_filename(filename: &str) -> String {
    let name = match filename.split_once('_') {
        Some((_, rest)) => rest,
        None => filename,
    };
    let stem = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[..dot],
        _ => name,
    };
    stem.replace(['-', '_'], " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `<base>/static/resumes/<filename>`, with the filename percent-encoded.
pub fn resume_url(base_url: &Url, filename: &str) -> String {
    let mut url = base_url.clone();
    match url.path_segments_mut() {
        Ok(mut segments) => {
            segments.pop_if_empty().extend(["static", "resumes", filename]);
        }
        Err(()) => {
            return format!(
                "{}/static/resumes/{}",
                base_url.as_str().trim_end_matches('/'),
                filename
            )
        }
    }
    url.to_string()
}

/// One result line, without its list number.
pub fn render_result(result: &SearchResult, content_type: &ContentType, base_url: &Url) -> String {
    let percentage = result.similarity * 100.0;
    match content_type {
        ContentType::Resume => {
            let filename = result
                .metadata
                .get("filename")
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            format!(
                "[📄 {}]({}) - **{:.1}% Match**",
                clean_filename(&filename),
                resume_url(base_url, &filename),
                percentage
            )
        }
        _ => {
            let title = ["title", "filename"]
                .iter()
                .map(|key| meta_text(&result.metadata, key))
                .find(|v| !v.is_empty())
                .map(|v| v.into_owned())
                .unwrap_or_else(|| "Unknown".to_string());
            format!("📄 {} - **{:.1}% Match**", title, percentage)
        }
    }
}

/// Numbered markdown list of hits. Hits whose `filename` equals
/// `exclude_filename` are skipped.
pub fn render_results(
    results: &[SearchResult],
    content_type: &ContentType,
    base_url: &Url,
    exclude_filename: Option<&str>,
) -> String {
    if results.is_empty() {
        return NO_ITEMS.to_string();
    }

    let lines: Vec<String> = results
        .iter()
        .filter(|r| match exclude_filename {
            Some(excluded) => meta_text(&r.metadata, "filename") != excluded,
            None => true,
        })
        .map(|r| render_result(r, content_type, base_url))
        .collect();

    if lines.is_empty() {
        return NO_SIMILAR_ITEMS.to_string();
    }

    let numbered: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect();
    format!(
        "🔗 **Similar {} Found:**\n\n{}",
        content_type.title(),
        numbered.join("\n\n")
    )
}
