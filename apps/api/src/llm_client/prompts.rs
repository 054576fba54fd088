// Fixed parameters for every completion call. Per-mode templates live in analysis::prompts.

/// System role message sent ahead of every user prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert in market research, competitive analysis, \
    and loyalty programs. Provide detailed, actionable insights based on available market data.";

/// Sampling temperature for all completions.
pub const TEMPERATURE: f64 = 0.7;
