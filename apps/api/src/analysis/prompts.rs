// Prompt templates for both analysis modes.
// Placeholders: {company_name}, {industry_scope}, {competitors}, {competitor_details},
// {competitors_analysis}, plus one {extra} slot per template that is filled with the
// matching clause only when the request asks for loyalty coverage, and emptied otherwise.
// No text outside the *_LOYALTY_* clauses may mention loyalty.

use crate::analysis::AnalysisRequest;

// ── Mode A: competitor-breakdown ────────────────────────────────────────────

pub const COMPETITOR_LIST_TEMPLATE: &str = "List exactly the top 5 direct competitors of \
{company_name}{industry_scope}.
Return ONLY the competitor names as a comma-separated list. \
Do not number them and do not add descriptions or any other text.";

pub const COMPETITOR_DETAILS_TEMPLATE: &str = "Provide a structured breakdown of each of \
the following competitors: {competitors}.

For each competitor, cover:
1. Market position
2. Target demographics
3. Key differentiators
4. Estimated market share{extra}

Use one clearly headed section per competitor.";

pub const DETAILS_LOYALTY_CLAUSE: &str = "
5. Loyalty program: name, structure, tiers, rewards, and notable member benefits";

pub const COMPARATIVE_ANALYSIS_TEMPLATE: &str = "Compare {company_name}{industry_scope} \
against the competitors described below.

Competitor breakdown:
{competitor_details}

Cover:
1. Competitive advantages of {company_name}
2. Gaps where competitors outperform {company_name}
3. Threats each competitor poses
4. Recommended market positioning{extra}";

pub const COMPARATIVE_LOYALTY_CLAUSE: &str = "
5. Loyalty program recommendations: how {company_name} can design or improve its loyalty \
program to win and retain customers against these competitors";

// ── Mode B: positioning ─────────────────────────────────────────────────────

pub const COMPETITORS_ANALYSIS_TEMPLATE: &str = "Identify the main competitors of \
{company_name}{industry_scope}.

For each competitor, describe:
- Market positioning
- Target audience
- Key differentiators{extra}";

pub const COMPETITORS_LOYALTY_CLAUSE: &str = "
- Loyalty program details: structure, rewards, and how it drives customer engagement";

pub const POSITIONING_TEMPLATE: &str = "Based on this competitor analysis:

{competitors_analysis}

Analyze the market positioning of {company_name}{industry_scope}, covering:
- Strengths
- Weaknesses
- Opportunities{extra}";

pub const POSITIONING_LOYALTY_CLAUSE: &str = "
- Loyalty program recommendations that would set {company_name} apart";

// ── Builders ────────────────────────────────────────────────────────────────

/// Fills the {extra} slot first, then request fields, then model output, so text
/// coming back from the model is never re-scanned for placeholders.
fn render(
    template: &str,
    loyalty_clause: &str,
    request: &AnalysisRequest,
    context: &[(&str, &str)],
) -> String {
    let loyalty = if request.include_loyalty_program {
        loyalty_clause
    } else {
        ""
    };
    let industry_scope = request
        .industry_scope()
        .map(|industry| format!(" in the {industry} industry"))
        .unwrap_or_default();

    let mut prompt = template
        .replace("{extra}", loyalty)
        .replace("{industry_scope}", &industry_scope)
        .replace("{company_name}", request.company_name.trim());

    for &(placeholder, value) in context {
        prompt = prompt.replace(placeholder, value);
    }
    prompt
}

pub fn competitor_list_prompt(request: &AnalysisRequest) -> String {
    render(COMPETITOR_LIST_TEMPLATE, "", request, &[])
}

pub fn competitor_details_prompt(request: &AnalysisRequest, competitors: &[String]) -> String {
    render(
        COMPETITOR_DETAILS_TEMPLATE,
        DETAILS_LOYALTY_CLAUSE,
        request,
        &[("{competitors}", competitors.join(", ").as_str())],
    )
}

pub fn comparative_analysis_prompt(request: &AnalysisRequest, competitor_details: &str) -> String {
    render(
        COMPARATIVE_ANALYSIS_TEMPLATE,
        COMPARATIVE_LOYALTY_CLAUSE,
        request,
        &[("{competitor_details}", competitor_details)],
    )
}

pub fn competitors_analysis_prompt(request: &AnalysisRequest) -> String {
    render(
        COMPETITORS_ANALYSIS_TEMPLATE,
        COMPETITORS_LOYALTY_CLAUSE,
        request,
        &[],
    )
}

pub fn positioning_prompt(request: &AnalysisRequest, competitors_analysis: &str) -> String {
    render(
        POSITIONING_TEMPLATE,
        POSITIONING_LOYALTY_CLAUSE,
        request,
        &[("{competitors_analysis}", competitors_analysis)],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(industry: Option<&str>, loyalty: bool) -> AnalysisRequest {
        AnalysisRequest {
            company_name: "Acme".to_string(),
            industry: industry.map(str::to_string),
            include_loyalty_program: loyalty,
        }
    }

    #[test]
    fn test_templates_only_mention_loyalty_in_clauses() {
        assert!(!COMPETITOR_LIST_TEMPLATE.to_lowercase().contains("loyalty"));
        for template in [
            COMPETITOR_DETAILS_TEMPLATE,
            COMPARATIVE_ANALYSIS_TEMPLATE,
            COMPETITORS_ANALYSIS_TEMPLATE,
            POSITIONING_TEMPLATE,
        ] {
            assert!(template.contains("{extra}"), "{template}");
            assert!(!template.to_lowercase().contains("loyalty"), "{template}");
        }
    }

    #[test]
    fn test_list_prompt_scopes_industry() {
        let prompt = competitor_list_prompt(&request(Some("retail"), true));
        assert!(prompt.contains("competitors of Acme in the retail industry."));
        assert!(prompt.contains("comma-separated"));

        let unscoped = competitor_list_prompt(&request(None, true));
        assert!(unscoped.contains("competitors of Acme."));
        assert!(!unscoped.contains("industry"));
    }

    #[test]
    fn test_loyalty_clause_toggles() {
        let names = vec!["Globex".to_string(), "Initech".to_string()];

        let with = competitor_details_prompt(&request(None, true), &names);
        assert!(with.contains("Globex, Initech"));
        assert!(with.contains("Loyalty program"));

        let without = competitor_details_prompt(&request(None, false), &names);
        assert!(!without.to_lowercase().contains("loyalty"));
    }

    #[test]
    fn test_loyalty_clause_interpolates_company() {
        let prompt = positioning_prompt(&request(None, true), "landscape text");
        assert!(prompt.contains("set Acme apart"));
        assert!(prompt.contains("landscape text"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_model_output_not_rescanned_for_placeholders() {
        let prompt = comparative_analysis_prompt(&request(None, false), "see {company_name}");
        assert!(prompt.contains("see {company_name}"));
    }
}
