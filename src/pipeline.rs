//! The per-article pipeline and the sequential batch driver.

use crate::article::Article;
use crate::assembler::assemble_summary;
use crate::backend::StructuredBackend;
use crate::config::PipelineConfig;
use crate::extractor::Extractor;
use crate::progress::Progress;
use crate::prompt::{prepare_content, Prompt};
use crate::summary::{StructuredSummary, SummarySchema, FALLBACK_SUMMARY};

/// Summarizes articles with one backend and one immutable configuration.
pub struct Summarizer<B, S = StructuredSummary> {
    config: PipelineConfig,
    extractor: Extractor<S, B>,
}

impl<B: StructuredBackend> Summarizer<B, StructuredSummary> {
    pub fn new(config: PipelineConfig, backend: B) -> Self {
        Self::with_extractor(config, Extractor::new(backend))
    }
}

impl<B: StructuredBackend, S: SummarySchema> Summarizer<B, S> {
    pub fn with_extractor(config: PipelineConfig, extractor: Extractor<S, B>) -> Self {
        Self { config, extractor }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The prompt that would be sent for this content, or `None` if the
    /// content would not reach the backend at all.
    pub fn prompt_for(&self, title: &str, content: Option<&str>) -> Option<Prompt> {
        let prepared = prepare_content(content, &self.config)?;
        Some(Prompt::build(title, prepared.text, prepared.truncated))
    }

    /// Summarize one article body. Always returns text: the synopsis or
    /// [`FALLBACK_SUMMARY`].
    pub async fn summarize_content(&self, title: &str, content: Option<&str>) -> String {
        let Some(prompt) = self.prompt_for(title, content) else {
            tracing::debug!(
                title,
                minimum = self.config.minimum_content_length(),
                "content missing or too short, skipping model call"
            );
            return FALLBACK_SUMMARY.to_string();
        };

        let summary = self.extractor.extract(&prompt, &self.config).await;
        assemble_summary(summary.as_ref())
    }

    /// Summarize an article in place, stamping the model name even on failure.
    pub async fn summarize_article(&self, article: &mut Article) {
        let summary = self
            .summarize_content(&article.title, article.content.as_deref())
            .await;
        article.summary = Some(summary);
        article.model_name = Some(self.config.model.clone());
    }

    /// Summarize every article, strictly one at a time, in order.
    ///
    /// A failed article gets [`FALLBACK_SUMMARY`] and the batch moves on.
    pub async fn summarize_articles<P: Progress + ?Sized>(
        &self,
        articles: &mut [Article],
        progress: &mut P,
    ) {
        let total = articles.len();
        progress.start(total);

        for (index, article) in articles.iter_mut().enumerate() {
            self.summarize_article(article).await;
            progress.advance(index + 1, total, &article.title);
        }

        progress.finish();
        tracing::info!(total, model = %self.config.model, "batch complete");
    }
}
