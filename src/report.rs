// Display logic for an analysis result.
// Builds a view model where every section is either present with content or
// `None` ("no data"). Nothing here can fail: malformed values degrade to
// absent sections or raw text.

use crate::lenient::NumberOrText;
use crate::models::{
    AnalysisResult, CompetitorBrief, IssueWithCost, ReliabilityReport, ResultSource, ScoreBreakdown, Severity,
};
use crate::quota::QuotaView;

pub const MAX_SCORE: f64 = 100.0;
pub const MAX_SUBSCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarLevel {
    Good,
    Fair,
    Poor,
}

impl BarLevel {
    pub fn for_subscore(score: u8) -> Self {
        if score >= 8 {
            BarLevel::Good
        } else if score >= 6 {
            BarLevel::Fair
        } else {
            BarLevel::Poor
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BarLevel::Good => "good",
            BarLevel::Fair => "fair",
            BarLevel::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscoreView {
    pub label: &'static str,
    pub score: u8,
    pub level: BarLevel,
}

impl SubscoreView {
    // Ten-cell text bar for terminal output
    pub fn bar(&self) -> String {
        let filled = usize::from(self.score.min(10));
        format!("{}{}", "#".repeat(filled), ".".repeat(10 - filled))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostedIssueView {
    pub issue: String,
    pub cost: Option<String>,
    pub severity: Option<Severity>,
    pub source: Option<String>,
}

impl CostedIssueView {
    // Unknown labels are shown as sent
    pub fn severity_label(&self) -> &str {
        self.severity.as_ref().map(Severity::as_str).unwrap_or("")
    }

    pub fn severity_color(&self) -> &'static str {
        match &self.severity {
            Some(Severity::High) => "#ff4444",
            Some(Severity::Medium) => "#ffaa00",
            Some(Severity::Low) => "#44ff44",
            Some(Severity::Other(_)) | None => "#aaaaaa",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuesView {
    pub common: Vec<String>,
    pub costed: Vec<CostedIssueView>,
    pub average_cost: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetitorView {
    pub model: String,
    pub summary: Option<String>,
}

/// Everything the analysis page shows. `None` sections render a "no data" state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportView {
    pub score: Option<u8>,
    pub summary: Option<String>,
    pub source: Option<&'static str>,
    pub used_fallback: bool,
    pub km_warning: bool,
    pub mileage_note: Option<String>,
    pub last_date: Option<String>,
    pub cached_mileage_range: Option<String>,
    pub breakdown: Option<Vec<SubscoreView>>,
    pub issues: Option<IssuesView>,
    pub checks: Option<Vec<String>>,
    pub competitors: Option<Vec<CompetitorView>>,
    pub sources: Option<Vec<String>>,
    pub quota: Option<QuotaView>,
}

impl ReportView {
    pub fn from_result(result: &AnalysisResult) -> Self {
        let empty = ReliabilityReport::default();
        let report = result.result.as_ref().unwrap_or(&empty);

        ReportView {
            score: score(report.base_score_calculated.as_ref()),
            summary: report.reliability_summary.clone(),
            source: result.source.map(|s| match s {
                ResultSource::Cache => "Cache",
                ResultSource::Model => "AI Model",
            }),
            used_fallback: result.used_fallback,
            km_warning: result.km_warn,
            mileage_note: result.mileage_note.clone(),
            last_date: report.last_date.clone(),
            cached_mileage_range: report.cached_mileage_range.clone(),
            breakdown: report.score_breakdown.as_ref().map(breakdown),
            issues: issues(report),
            checks: non_empty(texts(&report.recommended_checks)),
            competitors: non_empty(competitors(&report.common_competitors_brief)),
            sources: non_empty(texts(&report.sources)),
            quota: result.quota.as_ref().map(QuotaView::from),
        }
    }
}

fn non_empty<T>(items: Vec<T>) -> Option<Vec<T>> {
    if items.is_empty() { None } else { Some(items) }
}

fn texts(items: &[Option<String>]) -> Vec<String> {
    items
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// Overall score clamped to 0..=100; non-numeric is "no data"
fn score(value: Option<&NumberOrText>) -> Option<u8> {
    let n = value?.as_f64()?;
    Some(n.round().clamp(0.0, MAX_SCORE) as u8)
}

fn subscore(value: Option<&NumberOrText>) -> u8 {
    value
        .and_then(NumberOrText::as_f64)
        .map(|n| n.round().clamp(0.0, MAX_SUBSCORE) as u8)
        .unwrap_or(0)
}

fn breakdown(b: &ScoreBreakdown) -> Vec<SubscoreView> {
    [
        ("Engine & transmission", b.engine_transmission_score.as_ref()),
        ("Electrical", b.electrical_score.as_ref()),
        ("Suspension & brakes", b.suspension_brakes_score.as_ref()),
        ("Maintenance cost", b.maintenance_cost_score.as_ref()),
        ("Owner satisfaction", b.satisfaction_score.as_ref()),
        ("Recalls", b.recalls_score.as_ref()),
    ]
    .into_iter()
    .map(|(label, value)| {
        let score = subscore(value);
        SubscoreView { label, score, level: BarLevel::for_subscore(score) }
    })
    .collect()
}

fn issues(report: &ReliabilityReport) -> Option<IssuesView> {
    let view = IssuesView {
        common: texts(&report.common_issues),
        costed: report.issues_with_costs.iter().filter_map(costed_issue).collect(),
        average_cost: report.avg_repair_cost_ils.as_ref().and_then(average_cost),
    };
    if view.common.is_empty() && view.costed.is_empty() && view.average_cost.is_none() {
        None
    } else {
        Some(view)
    }
}

fn costed_issue(item: &IssueWithCost) -> Option<CostedIssueView> {
    // avg_cost_ILS wins; zero or blank falls through to `cost`
    let cost = [item.avg_cost_ils.as_ref(), item.cost.as_ref()]
        .into_iter()
        .flatten()
        .find(|c| !c.is_blank() && c.as_f64() != Some(0.0))
        .map(format_cost);

    let view = CostedIssueView {
        issue: item.issue.clone().unwrap_or_default(),
        cost,
        severity: item.severity.clone(),
        source: item.source.clone(),
    };
    if view.issue.is_empty() && view.cost.is_none() && view.severity.is_none() && view.source.is_none() {
        None
    } else {
        Some(view)
    }
}

fn average_cost(value: &NumberOrText) -> Option<String> {
    match value {
        NumberOrText::Number(n) if n.is_finite() => Some(format_shekels(*n)),
        NumberOrText::Number(_) => None,
        NumberOrText::Text(s) if s.trim().is_empty() => None,
        NumberOrText::Text(s) => Some(s.trim().to_string()),
    }
}

/// Formats a repair cost. Numeric values (including numeric strings) become
/// "~1,500 ₪"; anything else is returned as sent.
pub fn format_cost(value: &NumberOrText) -> String {
    match (value.as_f64(), value) {
        (Some(n), _) => format_shekels(n),
        (None, NumberOrText::Text(raw)) => raw.trim().to_string(),
        (None, NumberOrText::Number(n)) => n.to_string(),
    }
}

fn format_shekels(amount: f64) -> String {
    format!("~{} ₪", group_thousands(amount.round() as i64))
}

pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if n < 0 { format!("-{}", grouped) } else { grouped }
}

fn competitors(items: &[CompetitorBrief]) -> Vec<CompetitorView> {
    items
        .iter()
        .filter_map(|c| {
            let model = c.model.as_deref()?.trim();
            if model.is_empty() {
                return None;
            }
            Some(CompetitorView { model: model.to_string(), summary: c.brief_summary.clone() })
        })
        .collect()
}
