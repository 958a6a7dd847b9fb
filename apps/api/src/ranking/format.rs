// Markdown rendering of ranked course recommendations.

use std::fmt::Write;

use crate::models::analysis::RankedItem;
use crate::models::item::meta_text;

pub const NO_RELEVANT_COURSES: &str = "📚 No relevant courses found for your profile.";

pub fn format_course_recommendations(courses: &[RankedItem], user_skills: &[String], target_role: &str) -> String {
    if courses.is_empty() {
        return NO_RELEVANT_COURSES.to_string();
    }

    let mut out = format!("🎯 **Intelligent Course Recommendations for {target_role}**\n\n");
    let _ = write!(out, "**Your Skills:** {}\n\n", user_skills.join(", "));

    for (i, course) in courses.iter().enumerate() {
        let meta = &course.item.metadata;
        let title = non_empty(meta_text(meta, "title").into_owned(), "Unknown Course");
        let url = non_empty(meta_text(meta, "url").into_owned(), "#");
        let institution = non_empty(meta_text(meta, "institution").into_owned(), "Unknown Institution");
        let rating = meta_text(meta, "rating");
        let analysis = &course.analysis;

        let _ = writeln!(out, "**{}. [{}]({})**", i + 1, title, url);
        let _ = write!(out, "   🎓 {institution}");
        if !rating.is_empty() {
            let _ = write!(out, " - ⭐ {rating}");
        }
        let _ = writeln!(out, " - 📊 **{}/10 Relevance**", course.relevance_score);
        let _ = writeln!(
            out,
            "   🎯 **{}** - Level: {}",
            analysis.recommendation.label(),
            analysis.learning_level.label()
        );
        if !analysis.skill_gaps_covered.is_empty() {
            let _ = writeln!(out, "   🔧 **Skills Covered:** {}", analysis.skill_gaps_covered.join(", "));
        }
        if !analysis.reasoning.is_empty() {
            let _ = writeln!(out, "   💡 **Why:** {}", analysis.reasoning);
        }
        out.push('\n');
    }

    out.trim().to_string()
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
