//! Turns raw model output into a [`GeneratedArticleData`].

use ntr_core::categories::{category_slug, hyphenate};
use ntr_core::types::{DEFAULT_IMAGE_ALT, DEFAULT_READ_TIME};
use ntr_core::{normalize_category, GeneratedArticleData, AUTHOR_NAME};
use serde_json::{Map, Number, Value};

pub const PLACEHOLDER_IMAGE: &str = "https://picsum.photos/800/450";
const TAGGED_IMAGE_BASE: &str = "https://loremflickr.com/800/450";

/// Removes a surrounding triple-backtick fence, optionally tagged `json`.
pub fn strip_code_fence(text: &str) -> &str {
    let text = text.trim();
    if text.len() < 6 || !text.starts_with("```") || !text.ends_with("```") {
        return text;
    }
    let inner = &text[3..text.len() - 3];
    inner.strip_prefix("json").unwrap_or(inner).trim()
}

/// Parses `text` as a JSON object, ignoring a code fence around it.
pub fn parse_json_object(text: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str(strip_code_fence(text)) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

fn string_field<'a>(obj: &'a Map<String, Value>, key: &str) -> &'a str {
    obj.get(key).and_then(Value::as_str).unwrap_or("")
}

/// Joins runs of whitespace inside `input` with `sep`, without changing case.
fn collapse_whitespace(input: &str, sep: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(sep)
}

/// Placeholder service URL tagged with the model's keywords.
pub fn keyword_image_url(keywords: &str) -> String {
    let keywords = keywords.trim();
    if keywords.is_empty() {
        return PLACEHOLDER_IMAGE.to_string();
    }
    let tags = keywords
        .split(',')
        .map(|tag| collapse_whitespace(tag, "-"))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}/{}", TAGGED_IMAGE_BASE, tags)
}

/// Validates a model response. `None` means the output is unusable and the
/// next model should be tried.
pub fn parse_and_validate(content: &str) -> Option<GeneratedArticleData> {
    let obj = parse_json_object(content)?;

    let slug = hyphenate(string_field(&obj, "slug").trim());
    let title = string_field(&obj, "title").trim().to_string();
    let body = string_field(&obj, "body").trim().to_string();
    if slug.is_empty() || title.is_empty() || body.is_empty() {
        return None;
    }

    let excerpt = match string_field(&obj, "excerpt").trim() {
        "" => title.clone(),
        excerpt => excerpt.to_string(),
    };
    let category = normalize_category(string_field(&obj, "category"));
    let keywords = string_field(&obj, "imageKeywords").trim();
    let image_alt = match string_field(&obj, "imageAlt").trim() {
        "" => DEFAULT_IMAGE_ALT.to_string(),
        alt => alt.to_string(),
    };
    let read_time = match obj.get("readTime") {
        Some(Value::Number(n)) => number_text(n),
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => DEFAULT_READ_TIME.to_string(),
    };

    Some(GeneratedArticleData {
        slug,
        title,
        excerpt,
        body,
        category: category.to_string(),
        category_slug: category_slug(category),
        author: AUTHOR_NAME.to_string(),
        image: keyword_image_url(keywords),
        image_alt,
        read_time,
        image_keywords: (!keywords.is_empty()).then(|| keywords.to_string()),
    })
}

/// Integral floats print without a fraction, so `6.0` reads as `"6"`.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"{
        "slug": "New Sci-Fi Film",
        "title": "A New Sci-Fi Film Lands",
        "excerpt": "Space is back.",
        "body": "First paragraph.\n\n## The Cast\n\nSecond paragraph.",
        "category": "movies",
        "imageKeywords": "sci-fi movie, cinema ,space",
        "imageAlt": "A cinema screen",
        "readTime": 6
    }"#;

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  ```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```"), "```");
    }

    #[test]
    fn test_fenced_and_plain_parse_identically() {
        let fenced = format!("```json\n{}\n```", RESPONSE);
        assert_eq!(parse_and_validate(&fenced), parse_and_validate(RESPONSE));
        assert!(parse_and_validate(RESPONSE).is_some());
    }

    #[test]
    fn test_parse_applies_normalization() {
        let data = parse_and_validate(RESPONSE).unwrap();
        assert_eq!(data.slug, "new-sci-fi-film");
        assert_eq!(data.category, "Movies");
        assert_eq!(data.category_slug, "movies");
        assert_eq!(data.author, "ntr");
        assert_eq!(data.read_time, "6");
        assert_eq!(data.image, "https://loremflickr.com/800/450/sci-fi-movie,cinema,space");
        assert_eq!(data.image_keywords.as_deref(), Some("sci-fi movie, cinema ,space"));
        assert_eq!(data.image_alt, "A cinema screen");
    }

    #[test]
    fn test_parse_defaults() {
        let data = parse_and_validate(
            r#"{"slug":"x","title":"Only Title","body":"Text","category":"Sports","readTime":null,"imageAlt":3}"#,
        )
        .unwrap();
        assert_eq!(data.excerpt, "Only Title");
        assert_eq!(data.category, "Movies");
        assert_eq!(data.read_time, "5");
        assert_eq!(data.image_alt, "Article image");
        assert_eq!(data.image, PLACEHOLDER_IMAGE);
        assert!(data.image_keywords.is_none());
    }

    #[test]
    fn test_parse_rejects_unusable_output() {
        assert!(parse_and_validate("not json").is_none());
        assert!(parse_and_validate("[1, 2]").is_none());
        assert!(parse_and_validate(r#"{"slug":"x","title":"T"}"#).is_none());
        assert!(parse_and_validate(r#"{"slug":"","title":"T","body":"B"}"#).is_none());
        assert!(parse_and_validate(r#"{"slug":"x","title":42,"body":"B"}"#).is_none());
    }

    #[test]
    fn test_read_time_string_is_kept() {
        let data = parse_and_validate(r#"{"slug":"x","title":"T","body":"B","readTime":"8"}"#).unwrap();
        assert_eq!(data.read_time, "8");
    }

    #[test]
    fn test_read_time_number_text() {
        let read_time = |raw: &str| {
            parse_and_validate(&format!(r#"{{"slug":"x","title":"T","body":"B","readTime":{}}}"#, raw))
                .unwrap()
                .read_time
        };
        assert_eq!(read_time("6.0"), "6");
        assert_eq!(read_time("6.5"), "6.5");
        assert_eq!(read_time("7"), "7");
    }
}
