//! # Schema and Contexts Subcommands
//!
//! Introspection over the built-in schema registry.

use anyhow::{Context, Result};
use clap::Args;
use rdsl_core::ScriptContext;
use rdsl_schema::SchemaRegistry;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::registry;

/// Arguments for `rdsl schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Script context whose schema to print.
    pub context: ScriptContext,
}

/// One line of `rdsl contexts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextSummary {
    pub context: ScriptContext,
    /// Top-level receiver type, when the context has a schema.
    pub top_level: Option<String>,
}

/// The analysis schema of `context` with its fingerprint, as JSON.
pub fn schema_document(registry: &SchemaRegistry, context: ScriptContext) -> Result<JsonValue> {
    let schema = registry
        .schema_for(context)
        .schema()
        .cloned()
        .with_context(|| format!("no schema is built for {context} scripts"))?;
    let fingerprint = schema
        .fingerprint()
        .context("failed to fingerprint schema")?;
    Ok(serde_json::json!({
        "context": context,
        "fingerprint": fingerprint.to_string(),
        "schema": serde_json::to_value(schema.as_ref())?,
    }))
}

/// Every script context and the receiver its scripts configure.
pub fn context_summaries(registry: &SchemaRegistry) -> Vec<ContextSummary> {
    ScriptContext::all()
        .iter()
        .map(|&context| ContextSummary {
            context,
            top_level: registry
                .schema_for(context)
                .schema()
                .map(|s| s.top_level().to_string()),
        })
        .collect()
}

/// Execute `rdsl schema`.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let document = schema_document(registry()?, args.context)?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    Ok(0)
}

/// Execute `rdsl contexts`.
pub fn run_contexts() -> Result<u8> {
    for summary in context_summaries(registry()?) {
        println!(
            "  {:<10} {}",
            summary.context.as_str(),
            summary.top_level.as_deref().unwrap_or("(no schema)")
        );
    }
    Ok(0)
}
