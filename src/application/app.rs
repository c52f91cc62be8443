use crate::application::{ParameterReport, ParameterRepository, ParameterService};
use crate::config::Settings;
use crate::domain::config_types::RepositoryBackend;
use crate::domain::fixtures::sample_parameter_forms;
use crate::infrastructure::{
    log_messages, Database, InMemoryParameterRepository, PostgresParameterRepository,
    SimulatedLatency,
};
use crate::Result;
use std::sync::Arc;
use tracing::{info, instrument};

/// Main application struct that wires settings to a repository backend
pub struct Application {
    settings: Settings,
    service: ParameterService,
}

impl Application {
    #[instrument(skip(settings), fields(backend = %settings.repository.backend))]
    pub async fn new(settings: Settings) -> Result<Self> {
        let repository: Arc<dyn ParameterRepository> = match settings.repository.backend {
            RepositoryBackend::Memory => {
                let latency = SimulatedLatency::new(
                    settings.repository.simulated_latency(),
                    settings.repository.latency_jitter(),
                );
                Arc::new(InMemoryParameterRepository::with_latency(latency))
            }
            RepositoryBackend::Postgres => {
                info!(host = %settings.database.host, "{}", log_messages::application::CONNECTING_TO_DATABASE);
                let database = Database::connect(&settings.database, &settings.database_url()).await?;
                database.migrate().await?;
                Arc::new(PostgresParameterRepository::new(database))
            }
        };
        info!("{}", log_messages::application::REPOSITORY_SELECTED);

        Ok(Self {
            service: ParameterService::new(repository),
            settings,
        })
    }

    /// Seed fixtures into an empty repository if configured, then report on
    /// every stored record
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<ParameterReport> {
        info!(
            environment = %self.settings.application.environment,
            "{}",
            log_messages::application::STARTING
        );

        let mut records = self.service.list().await?;
        if self.settings.repository.seed_fixtures {
            // Fixtures only go into an empty repository
            if records.is_empty() {
                let forms = sample_parameter_forms();
                info!(count = forms.len(), "{}", log_messages::application::SEEDING_FIXTURES);
                records = self.service.seed(forms).await?;
            } else {
                info!(existing = records.len(), "{}", log_messages::application::SEEDING_SKIPPED);
            }
        }

        let report = ParameterReport::from_records(&records);
        info!(
            records = report.summary.record_count,
            shortfalls = report.summary.records_with_shortfall,
            "{}",
            log_messages::application::REPORT_READY
        );
        info!("{}", log_messages::application::STARTED_SUCCESSFULLY);

        Ok(report)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn service(&self) -> &ParameterService {
        &self.service
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn settings(overrides: &str) -> Settings {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("test.toml"), overrides).unwrap();
        Settings::load_from(dir.path(), "test").unwrap()
    }

    #[tokio::test]
    async fn test_run_seeds_fixtures_into_memory_backend() {
        let app = Application::new(settings("")).await.unwrap();
        let report = app.run().await.unwrap();

        assert_eq!(report.summary.record_count, 3);
        assert_eq!(report.summary.records_with_shortfall, 2);
        assert_eq!(app.service().list().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_repeated_runs_do_not_duplicate_fixtures() {
        let app = Application::new(settings("")).await.unwrap();
        app.run().await.unwrap();
        let report = app.run().await.unwrap();

        assert_eq!(report.summary.record_count, 3);
        let mut numbers: Vec<_> = report
            .rows
            .iter()
            .map(|row| row.csp_activity_number.clone())
            .collect();
        numbers.sort();
        numbers.dedup();
        assert_eq!(numbers.len(), 3);
    }

    #[tokio::test]
    async fn test_seeding_skipped_when_records_exist() {
        let app = Application::new(settings("")).await.unwrap();
        let existing = sample_parameter_forms().remove(1);
        app.service().create(existing).await.unwrap();

        let report = app.run().await.unwrap();
        assert_eq!(report.summary.record_count, 1);
        assert_eq!(report.rows[0].csp_activity_number, "CSP02.A3.02");
    }

    #[tokio::test]
    async fn test_run_without_seeding_reports_nothing() {
        let app = Application::new(settings("[repository]\nseed_fixtures = false\n"))
            .await
            .unwrap();
        let report = app.run().await.unwrap();

        assert!(report.rows.is_empty());
        assert!(!app.settings().repository.seed_fixtures);
    }

    #[tokio::test]
    #[ignore = "requires database connection"]
    async fn test_application_runs_against_postgres() {
        let app = Application::new(settings(
            "[repository]\nbackend = \"postgres\"\nseed_fixtures = false\n",
        ))
        .await
        .expect("Failed to create application");
        assert!(app.run().await.is_ok());
    }
}
