// Shared prompt fragments. Each service that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// Appended to every prompt sent through `complete_as_json`.
pub const JSON_ONLY_SUFFIX: &str = "\n\nIMPORTANT: Respond with valid JSON only. \
Do not include any text before or after the JSON object or array.";

/// Fills `{name}` placeholders in a prompt template in a single pass, so text
/// inserted for one placeholder is never scanned for another. Braces that do
/// not name a known placeholder are kept as written.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let known = after.find('}').and_then(|close| {
            let name = &after[..close];
            values
                .iter()
                .find(|(candidate, _)| *candidate == name)
                .map(|(_, value)| (close, *value))
        });
        match known {
            Some((close, value)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_replaces_every_occurrence() {
        let out = fill("{role}: {skills} ({role})", &[("role", "SRE"), ("skills", "Go")]);
        assert_eq!(out, "SRE: Go (SRE)");
    }

    #[test]
    fn test_inserted_text_is_not_filled_again() {
        let out = fill(
            "Resume: {resume}\nMatches: {matches}",
            &[("resume", "literally {matches} and {role}"), ("matches", "none")],
        );
        assert_eq!(out, "Resume: literally {matches} and {role}\nMatches: none");
    }

    #[test]
    fn test_json_braces_are_kept() {
        let out = fill("{\n  \"score\": {n}\n}", &[("n", "7")]);
        assert_eq!(out, "{\n  \"score\": 7\n}");
    }
}
