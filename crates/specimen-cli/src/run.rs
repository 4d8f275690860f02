use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use specimen_core::Value;
use specimen_generate::{GenerateOptions, GenerationReport};

/// Metadata captured when a generate command starts.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub started_at: DateTime<Utc>,
    pub root: String,
    pub options: GenerateOptions,
}

impl RunContext {
    pub fn start(root: &str, options: &GenerateOptions) -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            root: root.to_string(),
            options: options.clone(),
        }
    }
}

/// Document printed by `generate --report`.
#[derive(Debug, Serialize)]
pub struct RunEnvelope {
    pub run_id: String,
    pub started_at: String,
    pub root: String,
    pub seed: u64,
    pub options: GenerateOptions,
    pub values: Vec<Value>,
    pub reports: Vec<GenerationReport>,
}

impl RunEnvelope {
    pub fn new(ctx: RunContext, values: Vec<Value>, reports: Vec<GenerationReport>) -> Self {
        Self {
            run_id: ctx.run_id,
            started_at: ctx.started_at.to_rfc3339(),
            root: ctx.root,
            seed: ctx.options.seed,
            options: ctx.options,
            values,
            reports,
        }
    }
}
