//! Lenient salvage of JSON from model output
//!
//! Models asked for JSON frequently wrap it in prose or a markdown fence.
//! [`extract_json_lenient`] pulls the first plausible JSON object out of a
//! raw response; callers parse the result with serde and fall back to the
//! deterministic path on any failure.

use regex::Regex;

/// Extracts a JSON object from a raw model response.
///
/// Accepts, in order of preference: a bare JSON object, a ```json fenced
/// block, or the outermost `{...}` span embedded in surrounding text.
/// Returns `None` when no object can be found; this is the caller's cue to
/// use the deterministic fallback, never an error.
pub fn extract_json_lenient(response: &str) -> Option<String> {
    let trimmed = response.trim();

    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed.to_string());
    }

    if trimmed.contains("```") {
        if let Some(json) = extract_from_markdown_fence(trimmed) {
            return Some(json);
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            return Some(trimmed[start..=end].to_string());
        }
    }

    None
}

fn extract_from_markdown_fence(text: &str) -> Option<String> {
    let re = Regex::new(r"```(?:json)?\s*\n?([\s\S]*?)\n?```").expect("static regex");

    let captures = re.captures(text)?;
    let json = captures.get(1)?.as_str().trim();
    if json.starts_with('{') && json.ends_with('}') {
        Some(json.to_string())
    } else {
        None
    }
}
