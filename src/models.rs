// Request/response contracts of the reliability backend.
// Requests are strict (closed enums, validated before send); responses are
// lenient so partial or malformed payloads still display.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::error::ValidationError;
use crate::lenient::{self, NumberOrText};

pub const MIN_MODEL_YEAR: i32 = 1960;
pub const DEFAULT_ANNUAL_MILEAGE: i64 = 15000;

// --- Closed enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum FuelType {
    #[default]
    #[serde(rename = "בנזין")]
    Petrol,
    #[serde(rename = "דיזל")]
    Diesel,
    #[serde(rename = "היברידי")]
    Hybrid,
    #[serde(rename = "חשמלי")]
    Electric,
    #[serde(rename = "אחר")]
    Other,
}

impl FuelType {
    pub const ALL: [FuelType; 5] =
        [FuelType::Petrol, FuelType::Diesel, FuelType::Hybrid, FuelType::Electric, FuelType::Other];

    // Wire label
    pub fn label(&self) -> &'static str {
        match self {
            FuelType::Petrol => "בנזין",
            FuelType::Diesel => "דיזל",
            FuelType::Hybrid => "היברידי",
            FuelType::Electric => "חשמלי",
            FuelType::Other => "אחר",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            FuelType::Petrol => "petrol",
            FuelType::Diesel => "diesel",
            FuelType::Hybrid => "hybrid",
            FuelType::Electric => "electric",
            FuelType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Transmission {
    #[default]
    #[serde(rename = "אוטומטית")]
    Automatic,
    #[serde(rename = "ידנית")]
    Manual,
}

impl Transmission {
    pub const ALL: [Transmission; 2] = [Transmission::Automatic, Transmission::Manual];

    pub fn label(&self) -> &'static str {
        match self {
            Transmission::Automatic => "אוטומטית",
            Transmission::Manual => "ידנית",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            Transmission::Automatic => "automatic",
            Transmission::Manual => "manual",
        }
    }
}

/// Odometer bucket. The backend only knows these five ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MileageRange {
    #[serde(rename = "עד 50,000 ק\"מ")]
    UpTo50k,
    #[serde(rename = "50,000 - 100,000 ק\"מ")]
    From50kTo100k,
    #[default]
    #[serde(rename = "100,000 - 150,000 ק\"מ")]
    From100kTo150k,
    #[serde(rename = "150,000 - 200,000 ק\"מ")]
    From150kTo200k,
    #[serde(rename = "200,000+ ק\"מ")]
    Over200k,
}

impl MileageRange {
    pub const ALL: [MileageRange; 5] = [
        MileageRange::UpTo50k,
        MileageRange::From50kTo100k,
        MileageRange::From100kTo150k,
        MileageRange::From150kTo200k,
        MileageRange::Over200k,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            MileageRange::UpTo50k => "עד 50,000 ק\"מ",
            MileageRange::From50kTo100k => "50,000 - 100,000 ק\"מ",
            MileageRange::From100kTo150k => "100,000 - 150,000 ק\"מ",
            MileageRange::From150kTo200k => "150,000 - 200,000 ק\"מ",
            MileageRange::Over200k => "200,000+ ק\"מ",
        }
    }

    fn alias(&self) -> &'static str {
        match self {
            MileageRange::UpTo50k => "0-50k",
            MileageRange::From50kTo100k => "50-100k",
            MileageRange::From100kTo150k => "100-150k",
            MileageRange::From150kTo200k => "150-200k",
            MileageRange::Over200k => "200k+",
        }
    }
}

// Shared FromStr/Display for the closed enums: wire label or English alias
macro_rules! closed_enum_text {
    ($ty:ident, $what:literal) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $ty::ALL
                    .iter()
                    .copied()
                    .find(|v| v.label() == wanted || v.alias().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let choices: Vec<String> =
                            $ty::ALL.iter().map(|v| format!("{} ({})", v.alias(), v.label())).collect();
                        format!("unknown {} '{}', expected one of: {}", $what, wanted, choices.join(", "))
                    })
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

closed_enum_text!(FuelType, "fuel type");
closed_enum_text!(Transmission, "transmission");
closed_enum_text!(MileageRange, "mileage range");

// --- Analysis ---

/// Vehicle description sent to `POST /v1/analyze`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRequest {
    pub make: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_model: Option<String>,
    pub year: i32,
    pub fuel_type: FuelType,
    pub transmission: Transmission,
    pub mileage_range: MileageRange,
    pub advanced_mode: bool,
}

impl AnalysisRequest {
    // Form defaults: empty make/model, current year, petrol, automatic, 100-150k
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i32) -> Self {
        AnalysisRequest {
            make: make.into(),
            model: model.into(),
            sub_model: None,
            year,
            fuel_type: FuelType::default(),
            transmission: Transmission::default(),
            mileage_range: MileageRange::default(),
            advanced_mode: false,
        }
    }

    // Checks done before anything is sent. Enums are closed by construction.
    pub fn validate(&self, current_year: i32) -> Result<(), ValidationError> {
        if self.make.trim().is_empty() {
            return Err(ValidationError::Missing("make"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::Missing("model"));
        }
        if self.year < MIN_MODEL_YEAR || self.year > current_year {
            return Err(ValidationError::YearOutOfRange {
                year: self.year,
                min: MIN_MODEL_YEAR,
                max: current_year,
            });
        }
        Ok(())
    }

    // Trims text fields and drops a blank sub-model
    pub fn normalized(mut self) -> Self {
        self.make = self.make.trim().to_string();
        self.model = self.model.trim().to_string();
        self.sub_model = self
            .sub_model
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Cache,
    Model,
}

/// Issue severity. English or Hebrew labels map onto the three levels;
/// any other non-blank label is kept as sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Severity {
    Low,
    Medium,
    High,
    Other(String),
}

impl Severity {
    pub fn from_label(raw: &str) -> Option<Self> {
        let label = raw.trim();
        match label.to_lowercase().as_str() {
            "" => None,
            "low" | "נמוך" => Some(Severity::Low),
            "medium" | "בינוני" => Some(Severity::Medium),
            "high" | "גבוה" => Some(Severity::High),
            _ => Some(Severity::Other(label.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Other(raw) => raw,
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Severity::from_label(&raw).ok_or_else(|| de::Error::custom("blank severity"))
    }
}

/// Six subscores on a 0..10 scale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub engine_transmission_score: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub electrical_score: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub suspension_brakes_score: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub maintenance_cost_score: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub satisfaction_score: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub recalls_score: Option<NumberOrText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueWithCost {
    #[serde(default, deserialize_with = "lenient::text")]
    pub issue: Option<String>,
    #[serde(rename = "avg_cost_ILS", default, deserialize_with = "lenient::optional")]
    pub avg_cost_ils: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub cost: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub severity: Option<Severity>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompetitorBrief {
    #[serde(default, deserialize_with = "lenient::text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub brief_summary: Option<String>,
}

/// The scored report inside an analysis response. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReliabilityReport {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub base_score_calculated: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub reliability_summary: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub score_breakdown: Option<ScoreBreakdown>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub common_issues: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub issues_with_costs: Vec<IssueWithCost>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub recommended_checks: Vec<Option<String>>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub common_competitors_brief: Vec<CompetitorBrief>,
    #[serde(default, deserialize_with = "lenient::list")]
    pub sources: Vec<Option<String>>,
    #[serde(rename = "avg_repair_cost_ILS", default, deserialize_with = "lenient::optional")]
    pub avg_repair_cost_ils: Option<NumberOrText>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub last_date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub cached_mileage_range: Option<String>,
}

/// Response of `POST /v1/analyze`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default, deserialize_with = "lenient::optional")]
    pub result: Option<ReliabilityReport>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub quota: Option<QuotaInfo>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub source: Option<ResultSource>,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub used_fallback: bool,
    #[serde(default, deserialize_with = "lenient::flag")]
    pub km_warn: bool,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mileage_note: Option<String>,
}

// --- Quota ---

/// Remaining daily analyses. Computed server-side, display only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaInfo {
    pub user_left_today: i64,
    pub global_left_today: i64,
}

// --- History ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryItem {
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub make: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub model: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub sub_model: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub fuel: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub transmission: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub mileage_range: Option<String>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub base_score_calculated: Option<NumberOrText>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryPage {
    #[serde(default, deserialize_with = "lenient::list")]
    pub items: Vec<HistoryItem>,
    #[serde(default, deserialize_with = "lenient::optional")]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub limit: u32,
    pub offset: u32,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        HistoryQuery { limit: 100, offset: 0 }
    }
}

// --- Leads ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadType {
    #[default]
    Insurance,
    Financing,
    Dealer,
}

impl FromStr for LeadType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "insurance" => Ok(LeadType::Insurance),
            "financing" => Ok(LeadType::Financing),
            "dealer" => Ok(LeadType::Dealer),
            other => Err(format!("unknown lead type '{}', expected insurance, financing or dealer", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadContact {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Body of `POST /v1/leads`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadSubmission {
    #[serde(rename = "type")]
    pub lead_type: LeadType,
    pub payload: LeadContact,
}

impl LeadSubmission {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.payload.name.trim().is_empty() {
            return Err(ValidationError::Missing("name"));
        }
        if self.payload.phone.trim().is_empty() {
            return Err(ValidationError::Missing("phone"));
        }
        if self.payload.email.trim().is_empty() {
            return Err(ValidationError::Missing("email"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeadAck {
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub message: Option<String>,
}

// --- ROI ---

/// Body of `POST /v1/roi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiRequest {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub purchase_price: i64,
    pub current_mileage: i64,
    pub expected_annual_mileage: i64,
}

impl RoiRequest {
    pub fn validate(&self, current_year: i32) -> Result<(), ValidationError> {
        if self.make.trim().is_empty() {
            return Err(ValidationError::Missing("make"));
        }
        if self.model.trim().is_empty() {
            return Err(ValidationError::Missing("model"));
        }
        if self.year < MIN_MODEL_YEAR || self.year > current_year {
            return Err(ValidationError::YearOutOfRange {
                year: self.year,
                min: MIN_MODEL_YEAR,
                max: current_year,
            });
        }
        if self.purchase_price <= 0 {
            return Err(ValidationError::NotPositive("purchase_price"));
        }
        if self.current_mileage < 0 {
            return Err(ValidationError::Negative("current_mileage"));
        }
        if self.expected_annual_mileage < 0 {
            return Err(ValidationError::Negative("expected_annual_mileage"));
        }
        Ok(())
    }
}

/// Projected value and total cost of ownership over 1/3/5 years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiResult {
    pub estimated_value_1y: i64,
    pub estimated_value_3y: i64,
    pub estimated_value_5y: i64,
    pub total_cost_of_ownership_1y: i64,
    pub total_cost_of_ownership_3y: i64,
    pub total_cost_of_ownership_5y: i64,
}

// --- Health ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default, deserialize_with = "lenient::text")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub timestamp: Option<String>,
}
