//! Loads the tracking file and the record export named by the config.

use aivis_analytics::{AnalysisContext, MemoryStore};
use aivis_core::{load_tracking, AppConfig, ExecutionRecord, TrackingConfig};
use anyhow::Context as _;

pub(crate) struct Session {
    pub(crate) tracking: TrackingConfig,
    pub(crate) ctx: AnalysisContext,
    pub(crate) store: MemoryStore,
}

impl Session {
    pub(crate) async fn load(config: &AppConfig) -> anyhow::Result<Self> {
        let tracking = load_tracking(&config.tracking_path)?;

        let raw = tokio::fs::read_to_string(&config.records_path)
            .await
            .with_context(|| format!("reading {}", config.records_path.display()))?;
        let records: Vec<ExecutionRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", config.records_path.display()))?;

        tracing::info!(
            env = %config.env,
            business = %tracking.business.name,
            competitors = tracking.competitors.len(),
            records = records.len(),
            "loaded execution export"
        );

        let ctx = AnalysisContext::from_tracking(&tracking, config.default_days);
        let store = MemoryStore::with_records(ctx.business.id, records);
        Ok(Self {
            tracking,
            ctx,
            store,
        })
    }
}
