//! AI enrichment of notes: summary, category and key points.
//!
//! Every public operation is infallible. Each one has a `try_*` form that
//! reports the model failure, and the public form logs it at WARN and
//! substitutes a local fallback:
//!
//! | Operation | Fallback |
//! |-----------|----------|
//! | [`NoteEnricher::summarize`] | first 150 characters of the content, `...` if cut |
//! | [`NoteEnricher::suggest_category`] | `"General"` |
//! | [`NoteEnricher::extract_key_points`] | empty list |

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use tracing::{debug, error, warn};

use echonotes_core::defaults::{
    CATEGORY_CONTENT_CHARS, CATEGORY_MAX_CHARS, FALLBACK_CATEGORY, KEY_POINTS_COUNT,
    KEY_POINT_MAX_WORDS, SUGGESTED_CATEGORIES, SUMMARY_FALLBACK_CHARS, SUMMARY_MAX_WORDS,
};
use echonotes_core::{EnrichmentResult, Error, GenerationBackend, Result};

// ============================================================================
// PROMPTS
// ============================================================================

/// Prompt asking for a summary under `max_words` words.
pub fn summary_prompt(content: &str, max_words: usize) -> String {
    format!(
        r#"Summarize the following note content in a clear and concise way.
Keep the summary under {max_words} words.
Focus on the main points and the most important information.

Content:
{content}

Summary:"#
    )
}

/// Prompt asking for a single category label. Only the head of the content
/// is included.
pub fn category_prompt(title: &str, content: &str) -> String {
    let head = truncate_chars(content, CATEGORY_CONTENT_CHARS);
    let suggestions = SUGGESTED_CATEGORIES.join(", ");
    format!(
        r#"Based on the following note title and content, suggest a single, concise category name.

Choose from common categories like: {suggestions}.
Or suggest a new relevant category if none fit.

Respond with ONLY the category name, nothing else.

Title: {title}
Content: {head}

Category:"#
    )
}

/// Prompt asking for up to `num_points` bullet points.
pub fn key_points_prompt(content: &str, num_points: usize) -> String {
    format!(
        r#"Extract the {num_points} most important key points from the following content.
Present them as a bullet list, one point per line.
Keep each point concise (under {KEY_POINT_MAX_WORDS} words).

Content:
{content}

Key Points:"#
    )
}

// ============================================================================
// RESPONSE PARSING
// ============================================================================

/// Local summary used when the model is unavailable.
pub fn fallback_summary(content: &str) -> String {
    if content.chars().count() > SUMMARY_FALLBACK_CHARS {
        format!("{}...", truncate_chars(content, SUMMARY_FALLBACK_CHARS))
    } else {
        content.to_string()
    }
}

/// Reduce a model answer to a category label.
///
/// Quotes are removed and only the first line is kept. Labels longer than
/// the category column, or empty ones, become `"General"`.
pub fn clean_category(raw: &str) -> String {
    let cleaned: String = raw.trim().chars().filter(|c| *c != '"' && *c != '\'').collect();
    let label = cleaned.lines().next().unwrap_or("").trim();

    if label.is_empty() || label.chars().count() > CATEGORY_MAX_CHARS {
        FALLBACK_CATEGORY.to_string()
    } else {
        label.to_string()
    }
}

/// Split a bullet list answer into at most `num_points` entries.
pub fn parse_key_points(raw: &str, num_points: usize) -> Vec<String> {
    raw.lines()
        .map(|line| line.trim().trim_start_matches(['•', '-', '*']).trim())
        .filter(|point| !point.is_empty())
        .take(num_points)
        .map(str::to_string)
        .collect()
}

fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

// ============================================================================
// ENRICHER
// ============================================================================

/// Derives summaries, categories and key points from note text.
#[derive(Clone)]
pub struct NoteEnricher {
    backend: Arc<dyn GenerationBackend>,
}

impl NoteEnricher {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    /// Name of the model behind the enricher.
    pub fn model_name(&self) -> &str {
        self.backend.model_name()
    }

    /// Summary of `content` under `max_words` words, or the local fallback.
    pub async fn summarize(&self, content: &str, max_words: usize) -> String {
        match self.try_summarize(content, max_words).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "enrichment",
                    op = "summarize",
                    error = %e,
                    "Summary generation failed, using truncated content"
                );
                fallback_summary(content)
            }
        }
    }

    pub async fn try_summarize(&self, content: &str, max_words: usize) -> Result<String> {
        let start = Instant::now();
        let response = self
            .backend
            .generate(&summary_prompt(content, max_words))
            .await?;
        let summary = response.trim();
        if summary.is_empty() {
            return Err(Error::Inference("model returned an empty summary".to_string()));
        }

        debug!(
            subsystem = "inference",
            component = "enrichment",
            op = "summarize",
            response_len = summary.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Summary generated"
        );
        Ok(summary.to_string())
    }

    /// One category label for the note, or `"General"`.
    pub async fn suggest_category(&self, title: &str, content: &str) -> String {
        match self.try_suggest_category(title, content).await {
            Ok(category) => category,
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "enrichment",
                    op = "suggest_category",
                    error = %e,
                    "Category suggestion failed, using default category"
                );
                FALLBACK_CATEGORY.to_string()
            }
        }
    }

    pub async fn try_suggest_category(&self, title: &str, content: &str) -> Result<String> {
        let start = Instant::now();
        let response = self
            .backend
            .generate(&category_prompt(title, content))
            .await?;
        let category = clean_category(&response);

        debug!(
            subsystem = "inference",
            component = "enrichment",
            op = "suggest_category",
            category = %category,
            duration_ms = start.elapsed().as_millis() as u64,
            "Category suggested"
        );
        Ok(category)
    }

    /// Up to `num_points` key points, or an empty list.
    pub async fn extract_key_points(&self, content: &str, num_points: usize) -> Vec<String> {
        match self.try_extract_key_points(content, num_points).await {
            Ok(points) => points,
            Err(e) => {
                warn!(
                    subsystem = "inference",
                    component = "enrichment",
                    op = "extract_key_points",
                    error = %e,
                    "Key point extraction failed, returning no key points"
                );
                Vec::new()
            }
        }
    }

    pub async fn try_extract_key_points(
        &self,
        content: &str,
        num_points: usize,
    ) -> Result<Vec<String>> {
        if num_points == 0 {
            return Ok(Vec::new());
        }

        let start = Instant::now();
        let response = self
            .backend
            .generate(&key_points_prompt(content, num_points))
            .await?;
        let points = parse_key_points(&response, num_points);

        debug!(
            subsystem = "inference",
            component = "enrichment",
            op = "extract_key_points",
            count = points.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Key points extracted"
        );
        Ok(points)
    }

    /// Run all three operations with their default limits and combine the
    /// results.
    ///
    /// Never fails. A panic inside any of the operations yields the
    /// degraded result instead.
    pub async fn enhance(&self, title: &str, content: &str) -> EnrichmentResult {
        let start = Instant::now();
        let all = async {
            tokio::join!(
                self.summarize(content, SUMMARY_MAX_WORDS),
                self.suggest_category(title, content),
                self.extract_key_points(content, KEY_POINTS_COUNT),
            )
        };

        match AssertUnwindSafe(all).catch_unwind().await {
            Ok((summary, category, key_points)) => {
                debug!(
                    subsystem = "inference",
                    component = "enrichment",
                    op = "enhance",
                    key_points = key_points.len(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Note enriched"
                );
                EnrichmentResult {
                    summary,
                    category,
                    key_points,
                }
            }
            Err(_) => {
                error!(
                    subsystem = "inference",
                    component = "enrichment",
                    op = "enhance",
                    "Enrichment panicked, returning degraded result"
                );
                Self::degraded(content)
            }
        }
    }

    /// Result built without the model.
    pub fn degraded(content: &str) -> EnrichmentResult {
        EnrichmentResult {
            summary: fallback_summary(content),
            category: FALLBACK_CATEGORY.to_string(),
            key_points: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerationBackend;

    fn enricher(backend: MockGenerationBackend) -> NoteEnricher {
        NoteEnricher::new(Arc::new(backend))
    }

    #[test]
    fn test_fallback_summary_short_content_unchanged() {
        assert_eq!(fallback_summary("Buy milk"), "Buy milk");
    }

    #[test]
    fn test_fallback_summary_truncates_at_150_chars() {
        let content = "a".repeat(200);
        let summary = fallback_summary(&content);
        assert_eq!(summary, format!("{}...", "a".repeat(150)));
    }

    #[test]
    fn test_fallback_summary_exactly_150_chars() {
        let content = "b".repeat(150);
        assert_eq!(fallback_summary(&content), content);
    }

    #[test]
    fn test_fallback_summary_counts_chars_not_bytes() {
        let content = "é".repeat(151);
        let summary = fallback_summary(&content);
        assert_eq!(summary.chars().count(), 153);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_clean_category_strips_quotes_and_extra_lines() {
        assert_eq!(clean_category("\"Tasks\"\nBecause it lists chores"), "Tasks");
        assert_eq!(clean_category("  'Work'  "), "Work");
    }

    #[test]
    fn test_clean_category_too_long_is_general() {
        assert_eq!(clean_category(&"x".repeat(101)), "General");
        assert_eq!(clean_category(&"x".repeat(100)), "x".repeat(100));
    }

    #[test]
    fn test_clean_category_empty_is_general() {
        assert_eq!(clean_category("\"\""), "General");
        assert_eq!(clean_category("   "), "General");
    }

    #[test]
    fn test_parse_key_points_strips_bullets_and_blanks() {
        let raw = "• Buy milk\n\n- Buy eggs\n* Call the plumber\n   \n-\n";
        assert_eq!(
            parse_key_points(raw, 5),
            vec!["Buy milk", "Buy eggs", "Call the plumber"]
        );
    }

    #[test]
    fn test_parse_key_points_limits_count() {
        let raw = "- one\n- two\n- three\n- four";
        assert_eq!(parse_key_points(raw, 2), vec!["one", "two"]);
    }

    #[test]
    fn test_category_prompt_sends_only_content_head() {
        let content = format!("{}{}", "h".repeat(500), "TAIL");
        let prompt = category_prompt("title", &content);
        assert!(prompt.contains(&"h".repeat(500)));
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains("Personal, Work, Ideas"));
    }

    #[tokio::test]
    async fn test_summarize_trims_model_output() {
        let enricher = enricher(MockGenerationBackend::new().with_fixed_response("  Short.  \n"));
        assert_eq!(enricher.summarize("long content", 150).await, "Short.");
    }

    #[tokio::test]
    async fn test_summarize_prompt_carries_word_limit() {
        let backend = MockGenerationBackend::new();
        let enricher = enricher(backend.clone());
        enricher.summarize("content", 42).await;

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].prompt.contains("under 42 words"));
    }

    #[tokio::test]
    async fn test_empty_summary_uses_fallback() {
        let enricher = enricher(MockGenerationBackend::new().with_fixed_response("   "));
        assert_eq!(enricher.summarize("Buy milk", 150).await, "Buy milk");
    }

    #[tokio::test]
    async fn test_failures_use_fallbacks() {
        let enricher = enricher(MockGenerationBackend::failing());
        let content = "c".repeat(180);

        assert_eq!(
            enricher.summarize(&content, 150).await,
            format!("{}...", "c".repeat(150))
        );
        assert_eq!(enricher.suggest_category("t", &content).await, "General");
        assert!(enricher.extract_key_points(&content, 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_try_forms_report_failure() {
        let enricher = enricher(MockGenerationBackend::failing());
        assert!(enricher.try_summarize("c", 150).await.is_err());
        assert!(enricher.try_suggest_category("t", "c").await.is_err());
        assert!(enricher.try_extract_key_points("c", 5).await.is_err());
    }

    #[tokio::test]
    async fn test_zero_key_points_skips_model() {
        let backend = MockGenerationBackend::new();
        let enricher = enricher(backend.clone());

        assert!(enricher.extract_key_points("content", 0).await.is_empty());
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_enhance_combines_all_three() {
        let backend = MockGenerationBackend::new()
            .with_response_for("Summarize", "Shopping and a plumber call.")
            .with_response_for("category name", "Tasks")
            .with_response_for("key points", "- Buy milk\n- Buy eggs\n- Buy bread\n- Call plumber");
        let enricher = enricher(backend.clone());

        let result = enricher
            .enhance(
                "Groceries",
                "Buy milk, eggs, and bread. Also need to call the plumber.",
            )
            .await;

        assert_eq!(result.summary, "Shopping and a plumber call.");
        assert_eq!(result.category, "Tasks");
        assert_eq!(result.key_points.len(), 4);
        assert_eq!(backend.call_count(), 3);
    }

    #[tokio::test]
    async fn test_enhance_with_failing_model_is_degraded() {
        let enricher = enricher(MockGenerationBackend::failing());
        let result = enricher.enhance("t", "short content").await;
        assert_eq!(result, NoteEnricher::degraded("short content"));
    }

    #[tokio::test]
    async fn test_enhance_survives_panicking_backend() {
        let enricher = enricher(MockGenerationBackend::panicking());
        let result = enricher.enhance("t", "short content").await;

        assert_eq!(result.summary, "short content");
        assert_eq!(result.category, "General");
        assert!(result.key_points.is_empty());
    }
}
