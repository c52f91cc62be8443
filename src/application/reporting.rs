//! Read-only parameter reporting
//!
//! Rows are built from the derived fields as they were persisted; nothing is
//! recomputed here.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ActivityCategory, FeasibilityRatio, OverarchingParameter, ParameterId},
    error::Result,
};

/// One exported parameter record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterReportRow {
    pub id: ParameterId,
    pub csp_activity_number: String,
    pub field_office: String,
    pub activity_category: ActivityCategory,
    pub operation_duration: u32,
    pub risk_level: u32,
    pub number_of_sites: u32,
    pub minimum_required_interval: u32,
    pub targeted_number_of_sites: u32,
    pub feasible_number_of_sites: u32,
    pub feasibility_ratio: FeasibilityRatio,
    pub adjusted_required_interval: u32,
}

impl From<&OverarchingParameter> for ParameterReportRow {
    fn from(record: &OverarchingParameter) -> Self {
        Self {
            id: record.id(),
            csp_activity_number: record.csp_activity_number().to_string(),
            field_office: record.field_office().to_string(),
            activity_category: record.activity_category(),
            operation_duration: record.operation_duration().into_inner(),
            risk_level: record.risk_level().into_inner(),
            number_of_sites: record.number_of_sites().into_inner(),
            minimum_required_interval: record.minimum_required_interval(),
            targeted_number_of_sites: record.targeted_number_of_sites(),
            feasible_number_of_sites: record.feasible_number_of_sites(),
            feasibility_ratio: record.feasibility_ratio(),
            adjusted_required_interval: record.adjusted_required_interval(),
        }
    }
}

/// Portfolio-wide totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub record_count: usize,
    pub total_sites: u64,
    pub total_targeted_per_cycle: u64,
    pub total_feasible_per_cycle: u64,
    pub portfolio_feasibility_ratio: FeasibilityRatio,
    pub records_with_shortfall: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterReport {
    pub rows: Vec<ParameterReportRow>,
    pub summary: ReportSummary,
}

impl ParameterReport {
    pub fn from_records(records: &[OverarchingParameter]) -> Self {
        let rows: Vec<ParameterReportRow> = records.iter().map(ParameterReportRow::from).collect();

        let total_sites: u64 = rows.iter().map(|r| u64::from(r.number_of_sites)).sum();
        let total_targeted_per_cycle: u64 =
            rows.iter().map(|r| u64::from(r.targeted_number_of_sites)).sum();
        let total_feasible_per_cycle: u64 =
            rows.iter().map(|r| u64::from(r.feasible_number_of_sites)).sum();
        let portfolio_feasibility_ratio = if total_targeted_per_cycle == 0 {
            FeasibilityRatio::full()
        } else {
            FeasibilityRatio::from_decimal(
                Decimal::from(total_feasible_per_cycle) / Decimal::from(total_targeted_per_cycle),
            )
        };

        let summary = ReportSummary {
            record_count: rows.len(),
            total_sites,
            total_targeted_per_cycle,
            total_feasible_per_cycle,
            portfolio_feasibility_ratio,
            records_with_shortfall: rows
                .iter()
                .filter(|r| r.feasibility_ratio.is_shortfall())
                .count(),
        };

        Self { rows, summary }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityDetails, Completeness, ParameterDraft, StoredMetrics};
    use chrono::Utc;

    fn record(draft: ParameterDraft) -> OverarchingParameter {
        let Completeness::Complete(inputs) = draft.classify().unwrap() else {
            panic!("draft should be complete");
        };
        OverarchingParameter::plan(
            ParameterId::generate(),
            ActivityDetails::parse("CSP01.A1", "Aden", ActivityCategory::Nutrition).unwrap(),
            inputs,
            Utc::now(),
        )
    }

    #[test]
    fn test_summary_totals() {
        let report = ParameterReport::from_records(&[
            record(ParameterDraft::new(6, 2, 101)),
            record(ParameterDraft::new(9, 1, 87).with_feasible_sites(9)),
            record(ParameterDraft::new(12, 3, 156).with_feasible_sites(30)),
        ]);

        assert_eq!(report.summary.record_count, 3);
        assert_eq!(report.summary.total_sites, 344);
        assert_eq!(report.summary.total_targeted_per_cycle, 34 + 10 + 39);
        assert_eq!(report.summary.total_feasible_per_cycle, 34 + 9 + 30);
        assert_eq!(report.summary.portfolio_feasibility_ratio.to_string(), "0.88");
        assert_eq!(report.summary.records_with_shortfall, 2);
    }

    #[test]
    fn test_empty_report_is_fully_feasible() {
        let report = ParameterReport::from_records(&[]);
        assert_eq!(report.summary.record_count, 0);
        assert_eq!(report.summary.portfolio_feasibility_ratio, FeasibilityRatio::full());
    }

    #[test]
    fn test_rows_use_persisted_values() {
        let fresh = record(ParameterDraft::new(6, 2, 101));
        let stale = OverarchingParameter::from_stored(
            fresh.id(),
            fresh.details().clone(),
            fresh.planning_inputs(),
            StoredMetrics {
                adjusted_required_interval: 5,
                ..fresh.stored_metrics()
            },
            fresh.created_at(),
            fresh.updated_at(),
        );

        let report = ParameterReport::from_records(&[stale]);
        assert_eq!(report.rows[0].adjusted_required_interval, 5);
    }

    #[test]
    fn test_report_exports_json() {
        let report = ParameterReport::from_records(&[record(
            ParameterDraft::new(12, 3, 156).with_feasible_sites(30),
        )]);
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(json["rows"][0]["feasibility_ratio"], "0.77");
        assert_eq!(json["rows"][0]["activity_category"], "nutrition");
        assert_eq!(json["summary"]["records_with_shortfall"], 1);
    }
}
