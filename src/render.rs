// Terminal rendering of settled pages, via askama text templates.

use askama::Template;

use crate::history::HistoryRow;
use crate::models::{AnalysisRequest, HealthStatus, RoiResult};
use crate::quota::QuotaView;
use crate::report::{ReportView, group_thousands};

#[derive(Template)]
#[template(path = "report.txt")]
pub struct ReportTemplate<'a> {
    pub request: &'a AnalysisRequest,
    pub view: &'a ReportView,
}

#[derive(Template)]
#[template(path = "quota.txt")]
pub struct QuotaTemplate<'a> {
    pub view: &'a QuotaView,
}

#[derive(Template)]
#[template(path = "status.txt")]
pub struct StatusTemplate<'a> {
    pub signed_in: bool,
    pub api_base_url: &'a str,
}

#[derive(Template)]
#[template(path = "history.txt")]
pub struct HistoryTemplate<'a> {
    pub rows: &'a [HistoryRow],
    pub total: Option<u64>,
}

pub struct RoiLine {
    pub horizon: &'static str,
    pub value: String,
    pub cost: String,
}

#[derive(Template)]
#[template(path = "roi.txt")]
pub struct RoiTemplate {
    pub lines: Vec<RoiLine>,
}

impl RoiTemplate {
    pub fn new(result: &RoiResult) -> Self {
        let line = |horizon, value: i64, cost: i64| RoiLine {
            horizon,
            value: format!("{} ₪", group_thousands(value)),
            cost: format!("{} ₪", group_thousands(cost)),
        };
        RoiTemplate {
            lines: vec![
                line("1 year", result.estimated_value_1y, result.total_cost_of_ownership_1y),
                line("3 years", result.estimated_value_3y, result.total_cost_of_ownership_3y),
                line("5 years", result.estimated_value_5y, result.total_cost_of_ownership_5y),
            ],
        }
    }
}

#[derive(Template)]
#[template(path = "health.txt")]
pub struct HealthTemplate<'a> {
    pub health: &'a HealthStatus,
}
