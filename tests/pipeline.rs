use async_trait::async_trait;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use synopsis::backend::{BackendError, ExtractionRequest, OllamaBackend};
use synopsis::progress::Progress;
use synopsis::{Article, PipelineConfig, StructuredBackend, Summarizer, FALLBACK_SUMMARY};

const MODEL: &str = "llama3.1:8b";

fn config() -> PipelineConfig {
    PipelineConfig::new(4000, 512, 8192, MODEL).unwrap()
}

fn long_text() -> String {
    "The council approved the new transit plan after months of debate. ".repeat(20)
}

/// Replies with a fixed JSON value, or fails for titles containing "fail".
struct FakeBackend {
    reply: serde_json::Value,
    calls: Arc<AtomicUsize>,
}

impl FakeBackend {
    fn new(reply: serde_json::Value) -> Self {
        Self {
            reply,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl StructuredBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn generate(&self, request: &ExtractionRequest) -> Result<serde_json::Value, BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.messages[1].content.contains("fail") {
            return Err(BackendError::RequestFailed("connection reset by peer".to_string()));
        }
        Ok(self.reply.clone())
    }
}

#[derive(Default)]
struct RecordingProgress {
    total: Option<usize>,
    positions: Vec<usize>,
    finished: bool,
}

impl Progress for RecordingProgress {
    fn start(&mut self, total: usize) {
        self.total = Some(total);
    }

    fn advance(&mut self, position: usize, total: usize, _title: &str) {
        assert_eq!(Some(total), self.total);
        self.positions.push(position);
    }

    fn finish(&mut self) {
        self.finished = true;
    }
}

fn simple_reply() -> serde_json::Value {
    json!({
        "thinking": "The article is about a transit plan.",
        "context": "C",
        "core_idea": "I",
        "insight_1": "",
        "insight_2": "",
        "insight_3": "",
        "insight_4": "",
        "insight_5": "",
        "author_conclusion": "Done"
    })
}

#[tokio::test]
async fn short_content_returns_fallback_without_backend_call() {
    let backend = FakeBackend::new(simple_reply());
    let calls = backend.calls.clone();
    let summarizer = Summarizer::new(config(), backend);

    let lorem = "Lorem ipsum dolor sit amet, consectetur adipiscing";
    assert_eq!(lorem.len(), 50);

    let summary = summarizer.summarize_content("Lorem", Some(lorem)).await;
    assert_eq!(summary, FALLBACK_SUMMARY);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn empty_insights_are_omitted_and_model_is_stamped() {
    let summarizer = Summarizer::new(config(), FakeBackend::new(simple_reply()));
    let mut article = Article::new("Transit plan", Some(long_text()));

    summarizer.summarize_article(&mut article).await;

    assert_eq!(article.summary.as_deref(), Some("C\nI\nDone"));
    assert_eq!(article.model_name.as_deref(), Some(MODEL));
}

#[tokio::test]
async fn null_insights_are_treated_as_empty() {
    let reply = json!({
        "thinking": null,
        "context": "C",
        "core_idea": "I",
        "insight_1": null,
        "insight_2": null,
        "insight_3": null,
        "insight_4": null,
        "insight_5": null,
        "author_conclusion": "Done"
    });
    let summarizer = Summarizer::new(config(), FakeBackend::new(reply));

    let summary = summarizer.summarize_content("Transit plan", Some(&long_text())).await;
    assert_eq!(summary, "C\nI\nDone");
}

#[tokio::test]
async fn network_failure_falls_back_and_batch_continues() {
    let summarizer = Summarizer::new(config(), FakeBackend::new(simple_reply()));
    let mut articles = vec![
        Article::new("Please fail here", Some(long_text())),
        Article::new("Fine", Some(long_text())),
    ];

    summarizer
        .summarize_articles(&mut articles, &mut RecordingProgress::default())
        .await;

    assert_eq!(articles[0].summary.as_deref(), Some(FALLBACK_SUMMARY));
    assert_eq!(articles[0].model_name.as_deref(), Some(MODEL));
    assert_eq!(articles[1].summary.as_deref(), Some("C\nI\nDone"));
}

#[tokio::test]
async fn unreachable_server_falls_back() {
    let backend = OllamaBackend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
    let summarizer = Summarizer::new(config(), backend);
    let mut article = Article::new("Offline", Some(long_text()));

    summarizer.summarize_article(&mut article).await;

    assert_eq!(article.summary.as_deref(), Some(FALLBACK_SUMMARY));
    assert_eq!(article.model_name.as_deref(), Some(MODEL));
}

#[tokio::test]
async fn captcha_in_context_falls_back() {
    let reply = json!({
        "context": "Captcha required before the page can be shown",
        "core_idea": "I",
        "insight_1": "Visitor address 203.0.113.7 was logged",
        "author_conclusion": "Done"
    });
    let summarizer = Summarizer::new(config(), FakeBackend::new(reply));

    let summary = summarizer.summarize_content("Blocked", Some(&long_text())).await;
    assert_eq!(summary, FALLBACK_SUMMARY);
}

#[tokio::test]
async fn output_is_redacted_and_cleaned() {
    let reply = json!({
        "context": "Context: The outage began at 10.20.30.40 on Monday.",
        "core_idea": "Insight: Redundancy was missing.",
        "insight_1": "Two teams responded.\n\n\nBoth were late.",
        "author_conclusion": "Author_conclusion: Invest in failover."
    });
    let summarizer = Summarizer::new(config(), FakeBackend::new(reply));

    let summary = summarizer.summarize_content("Outage", Some(&long_text())).await;
    assert_eq!(
        summary,
        "The outage began at REDACTED on Monday.\nRedundancy was missing.\nTwo teams responded.\nBoth were late.\nInvest in failover."
    );
}

#[tokio::test]
async fn batch_of_five_with_one_failure() {
    let backend = FakeBackend::new(simple_reply());
    let calls = backend.calls.clone();
    let summarizer = Summarizer::new(config(), backend);

    let mut articles: Vec<Article> = (1..=5)
        .map(|n| {
            let title = if n == 3 {
                "Article that will fail".to_string()
            } else {
                format!("Article {}", n)
            };
            Article::new(title, Some(long_text()))
        })
        .collect();
    let titles: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();

    let mut progress = RecordingProgress::default();
    summarizer.summarize_articles(&mut articles, &mut progress).await;

    assert_eq!(articles.len(), 5);
    assert_eq!(calls.load(Ordering::SeqCst), 5);
    assert!(articles.iter().all(|a| a.model_name.as_deref() == Some(MODEL)));

    let fallbacks: Vec<usize> = articles
        .iter()
        .enumerate()
        .filter(|(_, a)| a.summary.as_deref() == Some(FALLBACK_SUMMARY))
        .map(|(i, _)| i)
        .collect();
    assert_eq!(fallbacks, vec![2]);

    // order and identity preserved
    let after: Vec<String> = articles.iter().map(|a| a.title.clone()).collect();
    assert_eq!(after, titles);

    assert_eq!(progress.total, Some(5));
    assert_eq!(progress.positions, vec![1, 2, 3, 4, 5]);
    assert!(progress.finished);
}

#[tokio::test]
async fn empty_batch_reports_zero() {
    let summarizer = Summarizer::new(config(), FakeBackend::new(simple_reply()));
    let mut articles: Vec<Article> = Vec::new();
    let mut progress = RecordingProgress::default();

    summarizer.summarize_articles(&mut articles, &mut progress).await;

    assert_eq!(progress.total, Some(0));
    assert!(progress.positions.is_empty());
}
