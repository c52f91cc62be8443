//! Canned parameter records for demos and local development
//!
//! These mirror the records the dashboard ships with before a real datastore
//! is connected. Each one omits or supplies feasible sites the way a field
//! office would on first entry.

use crate::domain::feasibility::ParameterDraft;
use crate::domain::parameters::{ActivityCategory, ParameterForm};

/// Fixture activities, in the order they are seeded
pub fn sample_parameter_forms() -> Vec<ParameterForm> {
    vec![
        ParameterForm {
            csp_activity_number: "CSP01.A1.01".to_string(),
            field_office: "Aden".to_string(),
            activity_category: ActivityCategory::GeneralFoodAssistance,
            draft: ParameterDraft::new(6, 2, 101),
        },
        ParameterForm {
            csp_activity_number: "CSP02.A3.02".to_string(),
            field_office: "Hodeidah".to_string(),
            activity_category: ActivityCategory::Nutrition,
            draft: ParameterDraft::new(9, 1, 87).with_feasible_sites(9),
        },
        ParameterForm {
            csp_activity_number: "CSP03.A5.01".to_string(),
            field_office: "Sana'a".to_string(),
            activity_category: ActivityCategory::SchoolFeeding,
            draft: ParameterDraft::new(12, 3, 156).with_feasible_sites(30),
        },
    ]
}
