//! Analysis Pipeline — runs a mode's prompt steps strictly in order.
//!
//! Flow (competitor-breakdown): competitor_list → competitor_details → comparative_analysis
//! Flow (positioning):          competitors_analysis → company_positioning
//!
//! Each step's prompt may read the request and every earlier step's output, so there is
//! exactly one completion call in flight per run. The first failing step aborts the run
//! and nothing partial is returned.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analysis::prompts::{
    comparative_analysis_prompt, competitor_details_prompt, competitor_list_prompt,
    competitors_analysis_prompt, positioning_prompt,
};
use crate::analysis::{AnalysisMode, AnalysisRequest, AnalysisResult};
use crate::llm_client::{ProviderError, TextCompleter, DEFAULT_MAX_TOKENS};

// ────────────────────────────────────────────────────────────────────────────
// Steps
// ────────────────────────────────────────────────────────────────────────────

/// One templated prompt in a mode's chain.
/// `build` receives the request and the outputs of all earlier steps, in order.
pub struct PromptStep {
    pub name: &'static str,
    pub max_tokens: u32,
    pub build: fn(&AnalysisRequest, &[String]) -> String,
}

static COMPETITOR_BREAKDOWN_STEPS: [PromptStep; 3] = [
    PromptStep {
        name: "competitor_list",
        max_tokens: DEFAULT_MAX_TOKENS,
        build: |request, _| competitor_list_prompt(request),
    },
    PromptStep {
        name: "competitor_details",
        max_tokens: DEFAULT_MAX_TOKENS,
        build: |request, outputs| {
            competitor_details_prompt(request, &parse_competitor_names(prior(outputs, 0)))
        },
    },
    PromptStep {
        name: "comparative_analysis",
        max_tokens: DEFAULT_MAX_TOKENS,
        build: |request, outputs| comparative_analysis_prompt(request, prior(outputs, 1)),
    },
];

static POSITIONING_STEPS: [PromptStep; 2] = [
    PromptStep {
        name: "competitors_analysis",
        max_tokens: DEFAULT_MAX_TOKENS,
        build: |request, _| competitors_analysis_prompt(request),
    },
    PromptStep {
        name: "company_positioning",
        max_tokens: DEFAULT_MAX_TOKENS,
        build: |request, outputs| positioning_prompt(request, prior(outputs, 0)),
    },
];

impl AnalysisMode {
    pub fn steps(&self) -> &'static [PromptStep] {
        match self {
            AnalysisMode::CompetitorBreakdown => &COMPETITOR_BREAKDOWN_STEPS,
            AnalysisMode::Positioning => &POSITIONING_STEPS,
        }
    }
}

/// Output of an earlier step. The run loop only calls `build` for step i after
/// steps 0..i have produced output.
fn prior(outputs: &[String], index: usize) -> &str {
    outputs.get(index).map(String::as_str).unwrap_or_default()
}

/// Splits the list step's reply on commas and trims each name.
/// Order, duplicates and empty entries are kept as returned.
pub fn parse_competitor_names(raw: &str) -> Vec<String> {
    raw.split(',').map(|name| name.trim().to_string()).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Errors
// ────────────────────────────────────────────────────────────────────────────

/// A step's provider failure, tagged with where it happened.
/// Displays exactly as the underlying provider error.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct PipelineError {
    pub step: &'static str,
    pub index: usize,
    pub source: ProviderError,
}

// ────────────────────────────────────────────────────────────────────────────
// Run
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_pipeline(
    completer: &dyn TextCompleter,
    mode: AnalysisMode,
    request: &AnalysisRequest,
) -> Result<AnalysisResult, PipelineError> {
    let steps = mode.steps();
    let mut outputs: Vec<String> = Vec::with_capacity(steps.len());

    for (index, step) in steps.iter().enumerate() {
        let prompt = (step.build)(request, &outputs);
        info!(
            "Running step {}/{} ({}) for {}",
            index + 1,
            steps.len(),
            step.name,
            request.company_name
        );
        debug!("Step {} prompt is {} chars", step.name, prompt.len());

        let output = completer
            .complete(&prompt, step.max_tokens)
            .await
            .map_err(|source| {
                warn!("Step {} ({}) failed: {source}", index + 1, step.name);
                PipelineError {
                    step: step.name,
                    index,
                    source,
                }
            })?;

        outputs.push(output);
    }

    info!("Analysis ({mode}) complete for {}", request.company_name);
    Ok(assemble(mode, request, outputs))
}

/// Builds the mode's result from the full, ordered list of step outputs.
fn assemble(mode: AnalysisMode, request: &AnalysisRequest, outputs: Vec<String>) -> AnalysisResult {
    let mut outputs = outputs.into_iter();
    let mut next = || outputs.next().unwrap_or_default();

    match mode {
        AnalysisMode::CompetitorBreakdown => {
            let competitor_list = next();
            AnalysisResult::CompetitorBreakdown {
                company_name: request.company_name.clone(),
                industry: request.industry.clone(),
                main_competitors: parse_competitor_names(&competitor_list),
                competitor_details: next(),
                comparative_analysis: next(),
                analysis_includes_loyalty: request.include_loyalty_program,
            }
        }
        AnalysisMode::Positioning => AnalysisResult::Positioning {
            company_name: request.company_name.clone(),
            industry: request.industry.clone(),
            competitors_analysis: next(),
            company_positioning: next(),
            analysis_includes_loyalty: request.include_loyalty_program,
        },
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
