// Prompt text for the assistant endpoints.

/// Used by `/api/ai/ask` when no prompt file is found at `AI_PROMPT_PATH`.
pub const DEFAULT_ASSISTANT_SYSTEM: &str = "You are a resume writing assistant. \
    Help the user describe their experience clearly and concisely. \
    Ask for missing details instead of inventing them. \
    Prefer short, concrete bullet points that name the action, the method, and a measurable result.";

/// The exact JSON document shape the site can load back into the editor.
pub const RESUME_SCHEMA: &str = r##"Output exactly one strict JSON object with these keys and structure (all lowercase):
{"name":"","email":"","phone":"","summary":"","avatar":"","config":{"template":"classic","color":"#333333","font":"","font_size":"","paper_size":"a4"},"experience":[{"title":"","company":"","date":"YYYY-MM","description":""}],"education":[{"degree":"","school":"","date":"YYYY-MM"}]}"##;

pub const GENERATE_SYSTEM: &str = "You are a resume generation assistant. \
    Without inventing personal information, fill the resume as fully as the input allows: \
    a concise but complete summary, and for each experience 3-5 points separated by semicolons \
    covering action, method, and measurable result. \
    Produce strict JSON matching the site schema, lowercase keys, JSON only.";

pub const REVISE_SYSTEM: &str = "You are a resume generation assistant. \
    Update and improve the existing JSON resume according to the user's request. \
    Keep the facts and do not invent any. \
    For each experience, use 3-5 semicolon-separated points covering action, method, and data. \
    Return strict JSON matching the site schema, lowercase keys, JSON only.";

/// User turn for `/api/ai/generate/simple`.
pub fn generate_prompt(input: &str) -> String {
    format!(
        "Input: {input}\nRequirements: {RESUME_SCHEMA}\n\
         Return only JSON with no explanation. Leave unknown values as empty strings or empty arrays."
    )
}

/// User turn for `/api/ai/revise`.
pub fn revise_prompt(resume_json: &str, instruction: &str) -> String {
    format!(
        "Current resume: {resume_json}\nRequested changes: {instruction}\n\
         Output: {RESUME_SCHEMA}\nReturn only JSON with no explanation."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_prompt_embeds_input_and_schema() {
        let prompt = generate_prompt("backend engineer, 5 years");
        assert!(prompt.contains("backend engineer, 5 years"));
        assert!(prompt.contains(r#""paper_size":"a4""#));
    }

    #[test]
    fn test_revise_prompt_embeds_resume_and_instruction() {
        let prompt = revise_prompt(r#"{"name":"Ada"}"#, "make it shorter");
        assert!(prompt.contains(r#"{"name":"Ada"}"#));
        assert!(prompt.contains("make it shorter"));
        assert!(prompt.contains("experience"));
    }
}
