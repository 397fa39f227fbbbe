//! Live-URL extraction from CLI output.

use regex::Regex;

/// First substring of `output` matching `pattern`, scanning line by line.
///
/// Returns `None` on an invalid pattern as well; callers treat "no URL
/// found" and "bad pattern" the same way and report the deployment without
/// a live URL rather than fabricating one.
pub fn extract_first_url_matching(pattern: &str, output: &str) -> Option<String> {
    let re = Regex::new(pattern).ok()?;
    output
        .lines()
        .find_map(|line| re.find(line).map(|m| m.as_str().to_string()))
}

/// First line of `output` that starts with `https://`, trimmed.
pub fn first_https_line(output: &str) -> Option<String> {
    output
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("https://"))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_first_match_across_lines() {
        let output = "Deploying...\nWebsite URL: https://calm-otter-1234.netlify.app\nDone";
        let url = extract_first_url_matching(r"https://[\w.-]+\.netlify\.app\S*", output);
        assert_eq!(url.as_deref(), Some("https://calm-otter-1234.netlify.app"));
    }

    #[test]
    fn ignores_non_matching_urls() {
        let output = "See https://docs.netlify.com for help";
        let url = extract_first_url_matching(r"https://[\w.-]+\.netlify\.app\S*", output);
        assert_eq!(url, None);
    }

    #[test]
    fn no_match_yields_none() {
        assert_eq!(extract_first_url_matching(r"https://\S+", "all done"), None);
    }

    #[test]
    fn https_line_is_trimmed() {
        let output = "Production deployment\n  https://myapp.vercel.app  \n";
        assert_eq!(
            first_https_line(output).as_deref(),
            Some("https://myapp.vercel.app")
        );
    }

    #[test]
    fn https_mid_line_is_not_a_line_start() {
        let output = "Inspect: visit https://vercel.com/acme/myapp";
        assert_eq!(first_https_line(output), None);
    }
}
