use std::sync::LazyLock;

use log::{debug, info};
use regex::Regex;
use reqwest::Client;

use super::SourceError;

static SCRIPT_OR_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|noscript|head)\b[^>]*>.*?</(script|style|noscript|head)\s*>")
        .expect("script/style pattern is valid")
});
static BLOCK_BREAK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<(br|/p|/div|/li|/h[1-6]|/tr|/section|/article)\b[^>]*>")
        .expect("block pattern is valid")
});
static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("tag pattern is valid"));
static INLINE_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f\v]+").expect("space pattern is valid"));
static BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\s*\n+").expect("blank line pattern is valid"));

/// Download a page and reduce it to readable text.
pub async fn fetch_link(client: &Client, url: &str) -> Result<String, SourceError> {
    let fetch_error = |source: reqwest::Error| SourceError::Fetch {
        url: url.to_string(),
        source,
    };

    info!("Fetching {}", url);
    let response = client.get(url).send().await.map_err(fetch_error)?;

    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let is_html = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_none_or(|value| value.contains("html"));

    let body = response.text().await.map_err(fetch_error)?;
    debug!("Fetched {} bytes from {}", body.len(), url);

    let text = if is_html {
        html_to_text(&body)
    } else {
        collapse_whitespace(&body)
    };

    if text.is_empty() {
        return Err(SourceError::Empty(url.to_string()));
    }
    Ok(text)
}

/// Strip markup from an HTML document, keeping paragraph breaks.
pub fn html_to_text(html: &str) -> String {
    let without_scripts = SCRIPT_OR_STYLE.replace_all(html, " ");
    let with_breaks = BLOCK_BREAK.replace_all(&without_scripts, "\n");
    let without_tags = TAG.replace_all(&with_breaks, " ");
    collapse_whitespace(&decode_entities(&without_tags))
}

pub(super) fn strip_tags(markup: &str) -> String {
    decode_entities(&TAG.replace_all(markup, ""))
}

pub(super) fn collapse_whitespace(text: &str) -> String {
    let spaced = INLINE_SPACE.replace_all(text, " ");
    let lines: Vec<&str> = spaced.lines().map(str::trim).collect();
    BLANK_LINES
        .replace_all(&lines.join("\n"), "\n\n")
        .trim()
        .to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_to_text_drops_scripts_and_tags() {
        let html = r#"<html><head><title>T</title><style>p { color: red; }</style></head>
            <body><h1>Rivers</h1><script>alert("x")</script>
            <p>The <b>Amazon</b> carries more water &amp; sediment.</p>
            <p>It ends in the Atlantic.</p></body></html>"#;

        let text = html_to_text(html);
        assert!(text.contains("Rivers"));
        assert!(text.contains("The Amazon carries more water & sediment."));
        assert!(text.contains("It ends in the Atlantic."));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t b \n\n\n\n c  "), "a b\n\nc");
    }

    #[test]
    fn test_strip_tags_decodes_entities() {
        assert_eq!(strip_tags("<w:t>Fish &amp; chips</w:t>"), "Fish & chips");
    }
}
