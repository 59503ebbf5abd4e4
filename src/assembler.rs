//! Turns a structured summary into the multi-line synopsis shown to readers.

use crate::sanitize::{collapse_blank_lines, contains_captcha, sanitize_summary, strip_field_labels};
use crate::summary::{SummarySchema, FALLBACK_SUMMARY};

/// Validate, join and clean a structured summary.
///
/// Redaction runs before label stripping and blank-line collapsing so the
/// cosmetic passes never see an unredacted address.
pub fn assemble_summary<S: SummarySchema>(summary: Option<&S>) -> String {
    let Some(summary) = summary else {
        return FALLBACK_SUMMARY.to_string();
    };

    let context = summary.context().trim();
    let core_idea = summary.core_idea().trim();
    if context.is_empty() || core_idea.is_empty() {
        tracing::warn!(
            has_context = !context.is_empty(),
            has_core_idea = !core_idea.is_empty(),
            "structured summary is missing required fields"
        );
        return FALLBACK_SUMMARY.to_string();
    }

    if context == FALLBACK_SUMMARY || core_idea == FALLBACK_SUMMARY {
        tracing::info!("model reported the content as not summarizable");
        return FALLBACK_SUMMARY.to_string();
    }

    let joined = join_fields(&summary.body());
    if joined.is_empty() {
        return FALLBACK_SUMMARY.to_string();
    }

    if contains_captcha(&joined) {
        tracing::info!("captcha marker in generated summary, treating content as unavailable");
    }
    let redacted = sanitize_summary(&joined);
    collapse_blank_lines(&strip_field_labels(&redacted))
}

/// Trimmed, non-empty fields, one per line.
fn join_fields(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|field| field.trim())
        .filter(|field| !field.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::StructuredSummary;

    fn summary(context: &str, core_idea: &str) -> StructuredSummary {
        StructuredSummary {
            context: context.to_string(),
            core_idea: core_idea.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_result_is_fallback() {
        assert_eq!(assemble_summary::<StructuredSummary>(None), FALLBACK_SUMMARY);
    }

    #[test]
    fn test_empty_insights_are_skipped() {
        let mut s = summary("C", "I");
        s.author_conclusion = "Done".to_string();
        s.insight_2 = "   ".to_string();
        assert_eq!(assemble_summary(Some(&s)), "C\nI\nDone");
    }

    #[test]
    fn test_fields_are_trimmed_and_ordered() {
        let s = StructuredSummary {
            thinking: "let me think".to_string(),
            context: "  Context line  ".to_string(),
            core_idea: "\tCore\n".to_string(),
            insight_1: "First".to_string(),
            insight_3: "Third".to_string(),
            insight_5: "Fifth".to_string(),
            author_conclusion: "End".to_string(),
            ..Default::default()
        };
        assert_eq!(
            assemble_summary(Some(&s)),
            "Context line\nCore\nFirst\nThird\nFifth\nEnd"
        );
    }

    #[test]
    fn test_missing_core_idea_is_fallback_even_when_rest_is_filled() {
        let s = StructuredSummary {
            context: "C".to_string(),
            core_idea: "".to_string(),
            insight_1: "1".to_string(),
            insight_2: "2".to_string(),
            insight_3: "3".to_string(),
            insight_4: "4".to_string(),
            insight_5: "5".to_string(),
            author_conclusion: "Done".to_string(),
            ..Default::default()
        };
        assert_eq!(assemble_summary(Some(&s)), FALLBACK_SUMMARY);
    }

    #[test]
    fn test_whitespace_context_is_fallback() {
        assert_eq!(assemble_summary(Some(&summary("  \n", "I"))), FALLBACK_SUMMARY);
    }

    #[test]
    fn test_model_sentinel_is_fallback() {
        let s = summary(FALLBACK_SUMMARY, FALLBACK_SUMMARY);
        assert_eq!(assemble_summary(Some(&s)), FALLBACK_SUMMARY);
    }

    #[test]
    fn test_captcha_in_context_is_fallback() {
        let mut s = summary("Captcha required", "I");
        s.insight_1 = "Host 10.1.2.3".to_string();
        assert_eq!(assemble_summary(Some(&s)), FALLBACK_SUMMARY);
    }

    #[test]
    fn test_ip_is_redacted_and_labels_stripped() {
        let mut s = summary("Context: Servers at 192.168.0.10 failed", "Core_idea: Outage");
        s.insight_1 = "Traffic moved to 10.0.0.2".to_string();
        assert_eq!(
            assemble_summary(Some(&s)),
            "Servers at REDACTED failed\nOutage\nTraffic moved to REDACTED"
        );
    }

    #[test]
    fn test_blank_lines_inside_fields_are_collapsed() {
        let mut s = summary("C", "I");
        s.insight_1 = "para one\n\n\npara two".to_string();
        assert_eq!(assemble_summary(Some(&s)), "C\nI\npara one\npara two");
    }
}
