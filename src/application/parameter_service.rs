//! Parameter lifecycle orchestration
//!
//! Every create and edit runs the feasibility calculator, so stored derived
//! metrics always come from the base inputs stored beside them.

use chrono::Utc;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::{
    application::parameter_store::ParameterRepository,
    domain::{
        compute_derived, ActivityDetails, Completeness, Computation, OverarchingParameter,
        ParameterDraft, ParameterForm, ParameterId, PlanningInputs,
    },
    error::{Error, Result},
    infrastructure::log_messages,
};

#[derive(Clone)]
pub struct ParameterService {
    repository: Arc<dyn ParameterRepository>,
}

impl ParameterService {
    pub fn new(repository: Arc<dyn ParameterRepository>) -> Self {
        Self { repository }
    }

    /// Live calculation for a form being edited; nothing is stored
    #[instrument(skip(self))]
    pub fn preview(&self, draft: ParameterDraft) -> Result<Computation> {
        let computation = compute_derived(draft)?;
        if !computation.is_computed() {
            info!(missing = ?draft.missing_fields(), "{}", log_messages::parameters::PREVIEW_NOT_COMPUTED);
        }
        Ok(computation)
    }

    #[instrument(skip(self, form), fields(csp_activity_number = %form.csp_activity_number))]
    pub async fn create(&self, form: ParameterForm) -> Result<OverarchingParameter> {
        let (details, inputs) = validate_form(&form)?;
        let record = OverarchingParameter::plan(ParameterId::generate(), details, inputs, Utc::now());
        let created = self.repository.create(record).await?;

        log_shortfall(&created);
        info!(id = %created.id(), "{}", log_messages::parameters::CREATED);
        Ok(created)
    }

    /// Replace a record wholesale with one recomputed from `form`
    #[instrument(skip(self, form))]
    pub async fn update(&self, id: ParameterId, form: ParameterForm) -> Result<OverarchingParameter> {
        let (details, inputs) = validate_form(&form)?;
        let existing = self.get(id).await?;
        let replacement = existing.replan(details, inputs, Utc::now());
        let updated = self.repository.update(replacement).await?;

        log_shortfall(&updated);
        info!(id = %updated.id(), "{}", log_messages::parameters::UPDATED);
        Ok(updated)
    }

    pub async fn get(&self, id: ParameterId) -> Result<OverarchingParameter> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("parameter {id}")))
    }

    pub async fn list(&self) -> Result<Vec<OverarchingParameter>> {
        self.repository.list().await
    }

    /// Remove a record; no related records are touched
    #[instrument(skip(self))]
    pub async fn delete(&self, id: ParameterId) -> Result<bool> {
        let removed = self.repository.delete(id).await?;
        if removed {
            info!(%id, "{}", log_messages::parameters::DELETED);
        } else {
            warn!(%id, "{}", log_messages::parameters::DELETE_MISSING);
        }
        Ok(removed)
    }

    /// Create each form in order
    pub async fn seed(&self, forms: Vec<ParameterForm>) -> Result<Vec<OverarchingParameter>> {
        let mut created = Vec::with_capacity(forms.len());
        for form in forms {
            created.push(self.create(form).await?);
        }
        Ok(created)
    }
}

fn validate_form(form: &ParameterForm) -> Result<(ActivityDetails, PlanningInputs)> {
    let result = form.details().and_then(|details| match form.draft.classify()? {
        Completeness::Complete(inputs) => Ok((details, inputs)),
        Completeness::Incomplete { missing } => Err(Error::IncompleteParameters { missing }),
    });
    if let Err(error) = &result {
        warn!(%error, "{}", log_messages::parameters::REJECTED);
    }
    result
}

fn log_shortfall(record: &OverarchingParameter) {
    if record.feasibility_ratio().is_shortfall() {
        warn!(
            id = %record.id(),
            ratio = %record.feasibility_ratio(),
            targeted = record.targeted_number_of_sites(),
            feasible = record.feasible_number_of_sites(),
            "{}",
            log_messages::parameters::SHORTFALL
        );
    }
}
