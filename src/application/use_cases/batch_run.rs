use crate::application::dto::{BatchItem, BatchReport, BatchStatus, PublishOutcome};
use crate::ports::outbound::{ProgressReporter, RunLog};
use crate::shared::Result;
use chrono::Utc;
use std::future::Future;

/// Lines of the latest log returned by [`BatchRunUseCase::status`]
pub const STATUS_TAIL_LINES: usize = 20;

/// BatchRunUseCase - generates every configured project in turn and logs the run
///
/// One project's failure does not stop the others. The log is written once,
/// after the last project.
pub struct BatchRunUseCase<L, R> {
    run_log: L,
    progress_reporter: R,
}

impl<L, R> BatchRunUseCase<L, R>
where
    L: RunLog,
    R: ProgressReporter,
{
    pub fn new(run_log: L, progress_reporter: R) -> Self {
        Self {
            run_log,
            progress_reporter,
        }
    }

    /// Runs `generate` for each project, sequentially and in order
    pub async fn execute<F, Fut>(&self, projects: &[String], generate: F) -> Result<BatchReport>
    where
        F: Fn(String) -> Fut,
        Fut: Future<Output = Result<PublishOutcome>>,
    {
        let started = Utc::now();
        let mut lines = vec![format!(
            "Batch run started at {}",
            started.format("%Y-%m-%d %H:%M:%S UTC")
        )];
        let mut items = Vec::with_capacity(projects.len());

        for (idx, project) in projects.iter().enumerate() {
            self.progress_reporter.report(&format!(
                "📦 [{}/{}] Generating {}",
                idx + 1,
                projects.len(),
                project
            ));

            let result = generate(project.clone()).await;
            let item = match result {
                Ok(outcome) => {
                    lines.push(format!("{}: {}", project, outcome));
                    BatchItem {
                        project: project.clone(),
                        result: Ok(outcome.to_string()),
                    }
                }
                Err(e) => {
                    let message = e.to_string();
                    let first_line = message.lines().next().unwrap_or_default().to_string();
                    self.progress_reporter
                        .report_error(&format!("❌ {}: {}", project, first_line));
                    lines.push(format!("{}: FAILED: {}", project, first_line));
                    BatchItem {
                        project: project.clone(),
                        result: Err(message),
                    }
                }
            };
            items.push(item);
        }

        let failures = items.iter().filter(|i| i.result.is_err()).count();
        lines.push(format!(
            "Batch run finished at {}: {} succeeded, {} failed",
            Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
            items.len() - failures,
            failures
        ));

        let log_path = self.run_log.record(&lines)?;
        self.progress_reporter.report_completion(&format!(
            "Batch run complete ({} project(s), {} failed). Log: {}",
            items.len(),
            failures,
            log_path.display()
        ));

        Ok(BatchReport { items, log_path })
    }

    /// The most recent run's log tail, or a "has not run" status
    pub fn status(&self) -> Result<BatchStatus> {
        let status = match self.run_log.latest(STATUS_TAIL_LINES)? {
            Some(snapshot) => BatchStatus {
                has_run: true,
                message: format!("Last batch run log: {}", snapshot.name),
                log_file: Some(snapshot.name),
                last_run: snapshot.modified,
                last_lines: snapshot.tail,
            },
            None => BatchStatus {
                has_run: false,
                log_file: None,
                last_run: None,
                last_lines: Vec::new(),
                message: "Batch run has not run yet".to_string(),
            },
        };
        Ok(status)
    }
}
