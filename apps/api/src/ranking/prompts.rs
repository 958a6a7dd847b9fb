pub const ANALYSIS_SYSTEM: &str = "You are an expert learning advisor and career coach. \
Analyze course relevance objectively and return only valid JSON.";

pub const ANALYSIS_MAX_TOKENS: u32 = 500;

/// Placeholders: {skills}, {role}, {title}, {institution}, {rating}, {description}
pub const ANALYSIS_PROMPT: &str = r#"Analyze the relevance of this course for a user with the following profile:

**User Skills:** {skills}
**Target Role:** {role}

**Course Information:**
- Title: {title}
- Institution: {institution}
- Rating: {rating}
- Description: {description}

Please provide:
1. Relevance Score (1-10): How well does this course align with the user's skills and target role?
2. Skill Gap Coverage: Which missing skills does this course address?
3. Learning Level: Is this course suitable for the user's current level (Beginner/Intermediate/Advanced)?
4. Career Impact: How will this course help in achieving the target role?
5. Recommendation: Strongly Recommend/Recommend/Consider/Not Recommended

Format your response as JSON:
{
    "relevance_score": 8,
    "skill_gaps_covered": ["skill1", "skill2"],
    "learning_level": "Intermediate",
    "career_impact": "High impact for target role",
    "recommendation": "Strongly Recommend",
    "reasoning": "Brief explanation"
}"#;
