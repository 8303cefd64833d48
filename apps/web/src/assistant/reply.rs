//! Lenient parsing of model replies that are supposed to be a resume document.

use crate::llm_client::strip_json_fences;
use crate::models::resume::Resume;

/// Tries the whole reply, then the reply without code fences, then the span
/// from the first `{` to the last `}`.
pub fn parse_resume_reply(content: &str) -> Option<Resume> {
    if let Ok(resume) = serde_json::from_str(content) {
        return Some(resume);
    }

    let text = strip_json_fences(content);
    if let Ok(resume) = serde_json::from_str(text) {
        return Some(resume);
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str(&text[start..=end]).ok()
}
