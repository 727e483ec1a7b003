//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use docket_domain::ScenarioModel;
use docket_engine::{ActionCandidate, CoverageEntry, ScenarioReport, ScenarioWeights};
use tabled::{
    builder::Builder,
    settings::{object::Columns, object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a scenario report.
    pub fn format_report(&self, report: &ScenarioReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    fn format_report_table(&self, report: &ScenarioReport) -> String {
        if report.per_claim.is_empty() {
            return self.warning("No claims in this case.");
        }

        let mut builder = Builder::default();
        builder.push_record([
            "ID", "Claim", "Policy", "Facts", "Mean", "P10", "P90", "Amount", "Expected", "Drivers",
        ]);

        for claim in &report.per_claim {
            let drivers = claim
                .top_drivers
                .iter()
                .map(|d| format!("{} ({:.2})", d.title, d.base_probability))
                .collect::<Vec<_>>()
                .join(", ");
            let facts = if claim.forced {
                "forced".to_string()
            } else {
                claim.fact_count.to_string()
            };
            builder.push_record([
                claim.claim_id.short(),
                claim.concept.clone(),
                claim.policy.as_str().to_uppercase(),
                facts,
                format!("{:.3}", claim.mean),
                format!("{:.3}", claim.p10),
                format!("{:.3}", claim.p90),
                format_amount(claim.amount),
                format_amount(claim.expected_value),
                drivers,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()))
            .with(Modify::new(Columns::new(4..9)).with(Alignment::right()));

        let header = self.colorize(
            &format!(
                "Scenario: {} (seed {}, {} samples)",
                report.scenario_name, report.seed, report.samples
            ),
            "cyan",
        );
        let total = self.colorize(
            &format!("Total expected value: {}", format_amount(report.total_expected_value)),
            "green",
        );
        format!("{}\n{}\n{}", header, table, total)
    }

    /// Format fact coverage.
    pub fn format_coverage(&self, coverage: &[CoverageEntry]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(coverage)?),
            OutputFormat::Table => Ok(self.format_coverage_table(coverage)),
        }
    }

    fn format_coverage_table(&self, coverage: &[CoverageEntry]) -> String {
        if coverage.is_empty() {
            return self.warning("No facts to score.");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Fact", "Coverage", "Evidence", "Contradictions", "Status"]);

        for entry in coverage {
            let status = if entry.missing_support {
                self.colorize("missing support", "red")
            } else {
                self.colorize("ok", "green")
            };
            builder.push_record([
                entry.fact_id.short(),
                entry.title.clone(),
                format!("{:.2}", entry.coverage_score),
                entry.evidence_count.to_string(),
                entry.contradiction_count.to_string(),
                status,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format ranked actions.
    pub fn format_actions(&self, actions: &[ActionCandidate]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(actions)?),
            OutputFormat::Table => Ok(self.format_actions_table(actions)),
        }
    }

    fn format_actions_table(&self, actions: &[ActionCandidate]) -> String {
        if actions.is_empty() {
            return self.info("No actions to suggest.");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Action", "Hours", "Delta", "ROI", "Rationale"]);

        for (rank, action) in actions.iter().enumerate() {
            builder.push_record([
                (rank + 1).to_string(),
                action.label.clone(),
                format!("{:.2}", action.effort_hours),
                format_signed(action.expected_delta),
                format!("{:.1}", action.roi),
                action.rationale.clone(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a case's scenarios.
    pub fn format_scenarios(&self, scenarios: &[ScenarioModel]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(scenarios)?),
            OutputFormat::Table => Ok(self.format_scenarios_table(scenarios)),
        }
    }

    fn format_scenarios_table(&self, scenarios: &[ScenarioModel]) -> String {
        if scenarios.is_empty() {
            return self.warning("No scenarios found.");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Name", "Policy", "Evidence", "Rule", "Contradiction"]);

        for scenario in scenarios {
            let weights = ScenarioWeights::parse(&scenario.config);
            let coefficients = weights.coefficients();
            builder.push_record([
                scenario.id.short(),
                scenario.name.clone(),
                weights.policy.as_str().to_uppercase(),
                format!("{:.2}", coefficients.evidence_boost),
                format!("{:.2}", coefficients.rule_penalty),
                format!("{:.2}", coefficients.contradiction_penalty),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Format minor currency units as `1,234.56`.
pub fn format_amount(minor: u64) -> String {
    let major = (minor / 100).to_string();
    let mut grouped = String::with_capacity(major.len() + major.len() / 3);
    for (i, ch) in major.chars().enumerate() {
        if i > 0 && (major.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}.{:02}", grouped, minor % 100)
}

fn format_signed(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "+" };
    format!("{}{}", sign, format_amount(minor.unsigned_abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use docket_domain::{AggregationPolicy, EntityId};
    use docket_engine::{ActionKind, ClaimOutcome, Driver};

    fn report() -> ScenarioReport {
        ScenarioReport {
            scenario_id: None,
            scenario_name: "Engine defaults".to_string(),
            seed: 42,
            samples: 2000,
            per_claim: vec![ClaimOutcome {
                claim_id: EntityId::new(),
                concept: "Unpaid overtime".to_string(),
                amount: 100_000,
                policy: AggregationPolicy::And,
                fact_count: 1,
                mean: 0.97,
                p10: 0.93,
                p90: 0.99,
                expected_value: 97_000,
                top_drivers: vec![Driver {
                    fact_id: EntityId::new(),
                    title: "Badge records".to_string(),
                    base_probability: 0.98,
                }],
                forced: false,
            }],
            total_expected_value: 97_000,
        }
    }

    #[test]
    fn test_report_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_report(&report()).unwrap();
        assert!(output.contains("Unpaid overtime"));
        assert!(output.contains("Badge records (0.98)"));
        assert!(output.contains("Total expected value: 970.00"));
    }

    #[test]
    fn test_report_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_report(&report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total_expected_value"], 97_000);
        assert_eq!(value["per_claim"][0]["policy"], "and");
    }

    #[test]
    fn test_actions_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let actions = vec![ActionCandidate {
            id: "resolve_contradiction:x".to_string(),
            kind: ActionKind::ResolveContradiction,
            label: "Resolve a contradiction on \"Badge records\"".to_string(),
            effort_hours: 1.5,
            expected_delta: 1_200,
            roi: 800.0,
            rationale: "Fact has 1 contradicting link(s)".to_string(),
            target_fact: None,
            target_claim: None,
        }];
        let output = formatter.format_actions(&actions).unwrap();
        assert!(output.contains("+12.00"));
        assert!(output.contains("800.0"));
    }

    #[test]
    fn test_empty_outputs() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_actions(&[]).unwrap().contains("No actions"));
        assert!(formatter.format_coverage(&[]).unwrap().contains("No facts"));
        assert!(formatter.format_scenarios(&[]).unwrap().contains("No scenarios"));
    }

    #[test]
    fn test_scenarios_table_parses_config() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let scenario = ScenarioModel::new(
            EntityId::new(),
            EntityId::new(),
            "Strong defense",
            ScenarioWeights::strong_defense().to_config(),
        );
        let output = formatter.format_scenarios(&[scenario]).unwrap();
        assert!(output.contains("Strong defense"));
        assert!(output.contains("OR"));
        assert!(output.contains("0.07"));
    }

    #[test]
    fn test_amounts() {
        assert_eq!(format_amount(0), "0.00");
        assert_eq!(format_amount(98_000), "980.00");
        assert_eq!(format_amount(123_456_789), "1,234,567.89");
        assert_eq!(format_signed(-250), "-2.50");
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("careful"), "⚠ careful");
    }
}
