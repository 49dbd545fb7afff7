use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Freight,
    Hotel,
    Bpo,
}

impl Domain {
    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "freight" => Some(Self::Freight),
            "hotel" => Some(Self::Hotel),
            "bpo" => Some(Self::Bpo),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MetricFormat {
    Currency,
    Percentage,
    Number,
    Rpm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreightMetric {
    MarginPct,
    Rpm,
    GrossRevenue,
    LoadsCount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotelMetric {
    Revpar,
    Adr,
    OccupancyPct,
    /// Fallback for any other `hotel_` key.
    TotalRevenue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BpoMetric {
    CallsPerHour,
    ConnectedCalls,
    QaScorePct,
    AttendancePct,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    Freight(FreightMetric),
    Hotel(HotelMetric),
    Bpo(BpoMetric),
}

impl MetricKey {
    pub const CATALOG: [MetricKey; 11] = [
        Self::Freight(FreightMetric::MarginPct),
        Self::Freight(FreightMetric::Rpm),
        Self::Freight(FreightMetric::GrossRevenue),
        Self::Freight(FreightMetric::LoadsCount),
        Self::Hotel(HotelMetric::Revpar),
        Self::Hotel(HotelMetric::Adr),
        Self::Hotel(HotelMetric::OccupancyPct),
        Self::Bpo(BpoMetric::CallsPerHour),
        Self::Bpo(BpoMetric::ConnectedCalls),
        Self::Bpo(BpoMetric::QaScorePct),
        Self::Bpo(BpoMetric::AttendancePct),
    ];

    /// Splits on the first `_`: the prefix picks the domain, the remainder
    /// the formula. Returns `None` when the series should be all zeros
    /// without touching the store: unknown prefixes and unknown freight or
    /// call-center formulas. Unknown hotel formulas read total revenue.
    pub fn parse(raw: &str) -> Option<Self> {
        let (prefix, formula) = raw.trim().split_once('_')?;
        match Domain::from_prefix(prefix)? {
            Domain::Freight => {
                let metric = match formula {
                    "margin_pct" => FreightMetric::MarginPct,
                    "rpm" => FreightMetric::Rpm,
                    "gross_revenue" => FreightMetric::GrossRevenue,
                    "loads_count" => FreightMetric::LoadsCount,
                    _ => return None,
                };
                Some(Self::Freight(metric))
            }
            Domain::Hotel => Some(Self::Hotel(match formula {
                "revpar" => HotelMetric::Revpar,
                "adr" => HotelMetric::Adr,
                "occupancy_pct" => HotelMetric::OccupancyPct,
                _ => HotelMetric::TotalRevenue,
            })),
            Domain::Bpo => {
                let metric = match formula {
                    "calls_per_hour" => BpoMetric::CallsPerHour,
                    "connected_calls" => BpoMetric::ConnectedCalls,
                    "qa_score_pct" => BpoMetric::QaScorePct,
                    "attendance_pct" => BpoMetric::AttendancePct,
                    _ => return None,
                };
                Some(Self::Bpo(metric))
            }
        }
    }

    pub fn domain(self) -> Domain {
        match self {
            Self::Freight(_) => Domain::Freight,
            Self::Hotel(_) => Domain::Hotel,
            Self::Bpo(_) => Domain::Bpo,
        }
    }

    pub fn descriptor(self) -> MetricDescriptor {
        let (key, label, description, format, suggested) = match self {
            Self::Freight(FreightMetric::MarginPct) => (
                "freight_margin_pct",
                "Freight Margin %",
                "Net margin % across delivered loads billed each day.",
                MetricFormat::Percentage,
                Some((0.0, 0.5)),
            ),
            Self::Freight(FreightMetric::Rpm) => (
                "freight_rpm",
                "Revenue Per Mile (RPM)",
                "Billed revenue per mile on delivered loads.",
                MetricFormat::Rpm,
                Some((1.0, 5.0)),
            ),
            Self::Freight(FreightMetric::GrossRevenue) => (
                "freight_gross_revenue",
                "Freight Gross Revenue",
                "Total billed revenue for delivered loads.",
                MetricFormat::Currency,
                None,
            ),
            Self::Freight(FreightMetric::LoadsCount) => (
                "freight_loads_count",
                "# of Loads",
                "Number of delivered loads billed each day.",
                MetricFormat::Number,
                None,
            ),
            Self::Hotel(HotelMetric::Revpar) => (
                "hotel_revpar",
                "RevPAR",
                "Revenue per available room.",
                MetricFormat::Currency,
                None,
            ),
            Self::Hotel(HotelMetric::Adr) => (
                "hotel_adr",
                "ADR",
                "Average daily rate for sold rooms.",
                MetricFormat::Currency,
                None,
            ),
            Self::Hotel(HotelMetric::OccupancyPct) => (
                "hotel_occupancy_pct",
                "Occupancy %",
                "Occupancy percentage across properties.",
                MetricFormat::Percentage,
                Some((0.0, 1.0)),
            ),
            Self::Hotel(HotelMetric::TotalRevenue) => (
                "hotel_total_revenue",
                "Hotel Total Revenue",
                "Total revenue across properties.",
                MetricFormat::Currency,
                None,
            ),
            Self::Bpo(BpoMetric::CallsPerHour) => (
                "bpo_calls_per_hour",
                "Calls per Hour",
                "Handled calls per agent labor hour.",
                MetricFormat::Number,
                None,
            ),
            Self::Bpo(BpoMetric::ConnectedCalls) => (
                "bpo_connected_calls",
                "Connected Calls",
                "Number of handled calls.",
                MetricFormat::Number,
                None,
            ),
            Self::Bpo(BpoMetric::QaScorePct) => (
                "bpo_qa_score_pct",
                "QA Score %",
                "Quality assurance scores averaged across scored campaigns.",
                MetricFormat::Percentage,
                Some((0.6, 1.0)),
            ),
            Self::Bpo(BpoMetric::AttendancePct) => (
                "bpo_attendance_pct",
                "Attendance %",
                "Staffed FTE count last reported for the day.",
                MetricFormat::Percentage,
                None,
            ),
        };
        MetricDescriptor {
            key,
            label,
            description,
            domain: self.domain(),
            format,
            suggested_min: suggested.map(|(min, _)| min),
            suggested_max: suggested.map(|(_, max)| max),
            supports_comparison: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
pub struct MetricDescriptor {
    #[schema(value_type = String)]
    pub key: &'static str,
    #[schema(value_type = String)]
    pub label: &'static str,
    #[schema(value_type = String)]
    pub description: &'static str,
    pub domain: Domain,
    pub format: MetricFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_max: Option<f64>,
    pub supports_comparison: bool,
}

pub fn catalog() -> Vec<MetricDescriptor> {
    MetricKey::CATALOG
        .iter()
        .map(|metric| metric.descriptor())
        .collect()
}
