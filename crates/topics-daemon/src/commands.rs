//! Command implementations for the news-topics daemon.
//!
//! Handles:
//! - run: execute one analyzer pass and exit
//! - start: run the analyzer on the configured schedule
//! - seed: load articles into the store
//! - topics: list stored topics

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info};

use topics_engine::{DocumentSource, TopicAnalyzer, TopicStore};
use topics_labeling::{ApiLabeler, ApiLabelerConfig, TopicLabeler};
use topics_scheduler::SchedulerService;
use topics_store::Storage;
use topics_types::Document;

use crate::settings::Settings;

/// Initialize the tracing subscriber.
///
/// RUST_LOG takes precedence; the configured level is the fallback.
pub fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;
    Ok(())
}

fn open_storage(settings: &Settings) -> Result<Arc<Storage>> {
    let db_path = settings.db_path();
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("Failed to create database directory")?;
    }
    let storage = Storage::open(&db_path).context("Failed to open storage")?;
    Ok(Arc::new(storage))
}

fn build_labeler(settings: &Settings) -> Result<Arc<dyn TopicLabeler>> {
    let mut config = match &settings.labeling.api_key {
        Some(key) => ApiLabelerConfig::openai(key.clone(), settings.labeling.model.clone()),
        None => ApiLabelerConfig::unconfigured(),
    };
    config.base_url = settings.labeling.base_url.clone();
    config.model = settings.labeling.model.clone();

    let labeler = ApiLabeler::new(config).context("Failed to build labeling gateway")?;
    Ok(Arc::new(labeler))
}

fn build_analyzer(settings: &Settings, storage: Arc<Storage>) -> Result<Arc<TopicAnalyzer>> {
    let labeler = build_labeler(settings)?;
    let documents: Arc<dyn DocumentSource> = storage.clone();
    let topics: Arc<dyn TopicStore> = storage;
    Ok(Arc::new(TopicAnalyzer::new(
        documents,
        topics,
        labeler,
        settings.analyzer.clone(),
    )))
}

/// Execute one analyzer pass immediately.
///
/// An abort-class failure (data source unavailable) propagates so the
/// process exits non-zero.
pub async fn run_once(settings: &Settings) -> Result<()> {
    let storage = open_storage(settings)?;
    let analyzer = build_analyzer(settings, storage)?;

    let summary = analyzer.run().await.context("Topic analyzer run failed")?;

    println!(
        "articles={} clusters={} new={} updated={} saved={} failed={}",
        summary.articles_loaded,
        summary.clusters_formed,
        summary.topics_created,
        summary.topics_updated,
        summary.topics_saved,
        summary.topics_failed,
    );
    Ok(())
}

/// Start the scheduled daemon.
///
/// Runs the analyzer on the configured cron cadence until Ctrl-C.
/// Errors from scheduled runs are logged as fatal and the next fire
/// proceeds; the hosting scheduler owns retry policy.
pub async fn start_daemon(settings: &Settings, run_on_startup_flag: bool) -> Result<()> {
    let storage = open_storage(settings)?;
    let analyzer = build_analyzer(settings, storage)?;

    let run_on_startup = run_on_startup_flag || settings.scheduler.run_on_startup;
    if run_on_startup {
        info!("Running analyzer once on startup");
        if let Err(e) = analyzer.run().await {
            error!(error = %e, "Fatal error in topic analyzer startup run");
        }
    }

    let mut scheduler = SchedulerService::new(settings.scheduler.clone())
        .await
        .context("Failed to create scheduler")?;

    let job_analyzer = analyzer.clone();
    scheduler
        .add_cron_job(
            "topic-analyzer",
            &settings.scheduler.schedule,
            None,
            Some(settings.scheduler.period_secs),
            move |token| {
                let analyzer = job_analyzer.clone();
                async move {
                    if token.is_cancelled() {
                        return;
                    }
                    if let Err(e) = analyzer.run().await {
                        error!(error = %e, "Fatal error in topic analyzer run");
                    }
                }
            },
        )
        .await
        .context("Failed to register analyzer job")?;

    scheduler.start().await.context("Failed to start scheduler")?;
    info!(
        schedule = %settings.scheduler.schedule,
        "news-topics daemon running, press Ctrl-C to stop"
    );

    signal::ctrl_c().await.context("Failed to wait for Ctrl-C")?;
    scheduler
        .shutdown()
        .await
        .context("Failed to shut down scheduler")?;
    Ok(())
}

/// Load a JSON array of article documents into the store.
pub fn seed(settings: &Settings, file: &Path) -> Result<()> {
    let storage = open_storage(settings)?;

    let raw = fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let articles: Vec<Document> =
        serde_json::from_str(&raw).context("Failed to parse article JSON")?;

    for article in &articles {
        storage
            .put_article(article)
            .with_context(|| format!("Failed to store article {}", article.id))?;
    }

    println!("Seeded {} articles", articles.len());
    Ok(())
}

/// Print stored topics from the last `days` days.
pub fn list_topics(settings: &Settings, days: u32) -> Result<()> {
    let storage = open_storage(settings)?;
    let cutoff = chrono::Utc::now().date_naive() - chrono::Duration::days(i64::from(days));

    let mut topics = storage.list_topics().context("Failed to list topics")?;
    topics.retain(|t| t.date >= cutoff);
    topics.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

    if topics.is_empty() {
        println!("No topics in the last {} days", days);
        return Ok(());
    }

    for topic in topics {
        println!(
            "{}  {}  {}  [{}]  articles={} total={}",
            topic.date,
            topic.id,
            topic.topic_name,
            topic.category.as_deref().unwrap_or("-"),
            topic.article_count,
            topic.total_articles_seen,
        );
    }
    Ok(())
}
