use futures::stream::{self, StreamExt};

/// Outcome of a bulk operation whose per-item failures are isolated.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    /// One message per failed item.
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn summary(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded, self.failed)
    }
}

/// Run `op` over every item with bounded concurrency.
///
/// One item failing never aborts the rest; its error is collected into the
/// report. A concurrency of zero is treated as one.
pub async fn run_batch<T, F, Fut>(items: Vec<T>, concurrency: usize, op: F) -> BatchReport
where
    F: Fn(T) -> Fut,
    Fut: std::future::Future<Output = anyhow::Result<()>>,
{
    let mut report = BatchReport::default();

    let mut results = stream::iter(items.into_iter().map(op)).buffer_unordered(concurrency.max(1));

    while let Some(result) = results.next().await {
        match result {
            Ok(()) => report.succeeded += 1,
            Err(e) => {
                report.failed += 1;
                report.errors.push(format!("{e:#}"));
            }
        }
    }

    report
}
