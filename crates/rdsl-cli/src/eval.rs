//! # Eval and Check Subcommands
//!
//! `rdsl eval` runs a script against a fresh built-in model for its context
//! and prints the configured model as JSON. `rdsl check` stops after
//! resolution and touches no model.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use rdsl_core::ScriptContext;
use rdsl_eval::{EvaluationResult, EvaluatorConfig, FailurePolicy};
use rdsl_model::{builtin_evaluator, TargetModel};
use serde::Serialize;

use crate::{load_script, registry};

/// Arguments for `rdsl eval`.
#[derive(Args, Debug)]
pub struct EvalArgs {
    /// Script file to evaluate.
    pub script: PathBuf,

    /// Evaluate as this context (settings, plugins, project) instead of
    /// classifying by file name.
    #[arg(long)]
    pub context: Option<ScriptContext>,

    /// Leave the model untouched if any statement fails.
    #[arg(long)]
    pub transactional: bool,
}

/// Arguments for `rdsl check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Script file to check.
    pub script: PathBuf,

    /// Check as this context instead of classifying by file name.
    #[arg(long)]
    pub context: Option<ScriptContext>,
}

/// Outcome of one `eval` run.
#[derive(Debug, Serialize)]
pub struct EvalReport {
    pub script: String,
    pub context: ScriptContext,
    pub result: EvaluationResult,
    /// The configured model; present only when the script was evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<TargetModel>,
}

/// Evaluate the script named by `args` against a fresh target model.
pub fn evaluate_script(args: &EvalArgs, config: EvaluatorConfig) -> Result<EvalReport> {
    let source = load_script(&args.script, args.context)?;
    let config = if args.transactional {
        config.with_failure_policy(FailurePolicy::Transactional)
    } else {
        config
    };
    let evaluator = builtin_evaluator(registry()?).with_config(config);
    let context = evaluator.context_of(&source);

    let (result, model) = match TargetModel::for_context(context) {
        Some(mut target) => {
            let result = evaluator.evaluate(&mut target, &source);
            let model = result.is_evaluated().then_some(target);
            (result, model)
        }
        // No model means no schema; `check` reports it uniformly.
        None => (evaluator.check(&source), None),
    };
    Ok(EvalReport {
        script: source.display_name().to_string(),
        context,
        result,
        model,
    })
}

/// Execute `rdsl eval`.
pub fn run_eval(args: &EvalArgs, config: EvaluatorConfig) -> Result<u8> {
    let report = evaluate_script(args, config)?;
    match (&report.result, &report.model) {
        (EvaluationResult::Evaluated, Some(model)) => {
            println!("{}", serde_json::to_string_pretty(model)?);
            Ok(0)
        }
        (EvaluationResult::NotEvaluated(reason), _) => {
            println!("{}", serde_json::to_string_pretty(reason)?);
            eprintln!("{}: not evaluated: {reason}", report.script);
            Ok(1)
        }
        (EvaluationResult::Evaluated, None) => {
            anyhow::bail!("{} evaluated without a target model", report.script)
        }
    }
}

/// Parse and resolve the script named by `args`.
pub fn check_script(args: &CheckArgs, config: EvaluatorConfig) -> Result<(ScriptContext, EvaluationResult)> {
    let source = load_script(&args.script, args.context)?;
    let evaluator = builtin_evaluator(registry()?).with_config(config);
    Ok((evaluator.context_of(&source), evaluator.check(&source)))
}

/// Execute `rdsl check`.
pub fn run_check(args: &CheckArgs, config: EvaluatorConfig) -> Result<u8> {
    let (context, result) = check_script(args, config)?;
    match result {
        EvaluationResult::Evaluated => {
            println!("{}: ok ({context})", args.script.display());
            Ok(0)
        }
        EvaluationResult::NotEvaluated(reason) => {
            println!("{}", serde_json::to_string_pretty(&reason)?);
            eprintln!("{}: {reason}", args.script.display());
            Ok(1)
        }
    }
}
