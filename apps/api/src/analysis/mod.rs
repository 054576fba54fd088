// Competitor analysis: request/response models, prompt templates, the step pipeline
// and its HTTP handler. All model calls go through llm_client::TextCompleter.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

pub mod handlers;
pub mod pipeline;
pub mod prompts;

// ────────────────────────────────────────────────────────────────────────────
// Request
// ────────────────────────────────────────────────────────────────────────────

/// Body of `POST /api/v1/competitor-analysis`. Never mutated once decoded.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub company_name: String,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default = "default_include_loyalty")]
    pub include_loyalty_program: bool,
}

fn default_include_loyalty() -> bool {
    true
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.company_name.trim().is_empty() {
            return Err(AppError::Validation(
                "company_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Industry to scope prompts with; blank strings count as absent.
    pub fn industry_scope(&self) -> Option<&str> {
        self.industry
            .as_deref()
            .map(str::trim)
            .filter(|industry| !industry.is_empty())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Mode
// ────────────────────────────────────────────────────────────────────────────

/// Named pipeline configuration: which steps run and which result fields come back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AnalysisMode {
    /// List → per-competitor detail → comparative analysis.
    #[default]
    CompetitorBreakdown,
    /// Competitor landscape → company positioning.
    Positioning,
}

impl AnalysisMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::CompetitorBreakdown => "competitor-breakdown",
            AnalysisMode::Positioning => "positioning",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown analysis mode '{0}' (expected 'competitor-breakdown' or 'positioning')")]
pub struct ParseModeError(String);

impl FromStr for AnalysisMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "competitor-breakdown" => Ok(AnalysisMode::CompetitorBreakdown),
            "positioning" => Ok(AnalysisMode::Positioning),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// Complete output of one pipeline run. Serialized as a flat JSON object whose
/// fields depend on the mode. Only ever built after every step succeeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResult {
    CompetitorBreakdown {
        company_name: String,
        industry: Option<String>,
        main_competitors: Vec<String>,
        competitor_details: String,
        comparative_analysis: String,
        analysis_includes_loyalty: bool,
    },
    Positioning {
        company_name: String,
        industry: Option<String>,
        competitors_analysis: String,
        company_positioning: String,
        analysis_includes_loyalty: bool,
    },
}
