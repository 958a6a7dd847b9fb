use once_cell::sync::Lazy;
use regex::Regex;

static BLANK_LINE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("Invalid blank-line regex"));
static SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" +").expect("Invalid space regex"));

/// Normalizes model markdown: literal `\n`/`\t`/`\r` escapes become real
/// characters, tab-led bullets become `- `, blank-line runs collapse to one
/// blank line and space runs to one space.
pub fn clean_llm_output(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let text = text
        .replace("\\n", "\n")
        .replace("\\t", "\t")
        .replace("\\r", "\r")
        .replace("\t+", "- ")
        .replace("\t-", "- ")
        .replace("\t*", "- ");
    let text = BLANK_LINE_RUNS.replace_all(&text, "\n\n");
    let text = SPACE_RUNS.replace_all(&text, " ");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_escapes_become_real() {
        assert_eq!(clean_llm_output("## Roles\\n- SRE\\n- DevOps"), "## Roles\n- SRE\n- DevOps");
    }

    #[test]
    fn test_tab_bullets_and_runs_collapse() {
        let raw = "Intro\n\n\n\n\t+ first\n\t* second   item  ";
        assert_eq!(clean_llm_output(raw), "Intro\n\n- first\n- second item");
    }

    #[test]
    fn test_empty_stays_empty() {
        assert_eq!(clean_llm_output(""), "");
    }
}
