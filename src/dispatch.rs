//! Sends catalog tasks to the server under test and times each round trip.
//!
//! Tasks go out strictly one at a time in catalog order so that latencies are
//! not skewed by contention between fixtures. A transport failure abandons
//! only the task it happened on.

use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use crate::catalog::TaskCatalog;
use crate::error::DispatchError;
use crate::task::Task;

/// Timing and status of one dispatched task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub task_name: String,
    /// Time from sending the request to receiving the response headers.
    pub elapsed_ms: u64,
    /// Status line, e.g. `200 OK`.
    pub server_status: String,
}

/// A task that produced no response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub task_name: String,
    pub error: DispatchError,
}

/// Per-task record of a catalog run, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchRecord {
    Completed(TestOutcome),
    Failed(DispatchFailure),
}

/// Everything a catalog run produced.
#[derive(Debug, Clone, Default)]
pub struct DispatchRun {
    pub records: Vec<DispatchRecord>,
    pub duration: Duration,
}

impl DispatchRun {
    pub fn outcomes(&self) -> impl Iterator<Item = &TestOutcome> {
        self.records.iter().filter_map(|r| match r {
            DispatchRecord::Completed(outcome) => Some(outcome),
            DispatchRecord::Failed(_) => None,
        })
    }

    pub fn failures(&self) -> impl Iterator<Item = &DispatchFailure> {
        self.records.iter().filter_map(|r| match r {
            DispatchRecord::Failed(failure) => Some(failure),
            DispatchRecord::Completed(_) => None,
        })
    }

    pub fn completed_count(&self) -> usize {
        self.outcomes().count()
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }
}

/// HTTP client bound to one endpoint.
pub struct Dispatcher {
    client: Client,
    endpoint: Url,
}

impl Dispatcher {
    /// Build a dispatcher. With `timeout` set to `None` no request timeout is
    /// configured.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, DispatchError> {
        let mut builder = reqwest::ClientBuilder::new();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| DispatchError::Request {
            message: format!("failed to create HTTP client: {e}"),
        })?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST one task and time it.
    ///
    /// The timer starts right before the request is sent and stops as soon
    /// as the response headers arrive; the body is not read. Any status,
    /// including 4xx/5xx, counts as a response.
    pub async fn dispatch(&self, task: &Task) -> Result<TestOutcome, DispatchError> {
        let body = serde_json::to_vec(task).map_err(|e| DispatchError::Serialize {
            message: e.to_string(),
        })?;

        debug!(
            target: "matmul.tester",
            task = %task.task_name,
            bytes = body.len(),
            endpoint = %self.endpoint,
            "Sending task"
        );

        let request = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        let start = Instant::now();
        let response = request
            .send()
            .await
            .map_err(|e| DispatchError::classify_reqwest(&e))?;
        let elapsed = start.elapsed();

        Ok(TestOutcome {
            task_name: task.task_name.clone(),
            elapsed_ms: elapsed.as_millis() as u64,
            server_status: response.status().to_string(),
        })
    }

    /// Dispatch every task of `catalog` in order.
    ///
    /// `on_record` is invoked after each task, so callers can report progress
    /// as it happens.
    pub async fn run_catalog<F>(&self, catalog: &TaskCatalog, mut on_record: F) -> DispatchRun
    where
        F: FnMut(usize, &DispatchRecord),
    {
        let start = Instant::now();
        let mut records = Vec::with_capacity(catalog.len());

        for (index, task) in catalog.iter().enumerate() {
            let record = match self.dispatch(task).await {
                Ok(outcome) => {
                    info!(
                        target: "matmul.tester",
                        task = %outcome.task_name,
                        elapsed_ms = outcome.elapsed_ms,
                        status = %outcome.server_status,
                        "Task completed"
                    );
                    DispatchRecord::Completed(outcome)
                },
                Err(error) => {
                    warn!(
                        target: "matmul.tester",
                        task = %task.task_name,
                        index = index,
                        category = error.category(),
                        "Task skipped: {}",
                        error
                    );
                    DispatchRecord::Failed(DispatchFailure {
                        task_name: task.task_name.clone(),
                        error,
                    })
                },
            };
            on_record(index, &record);
            records.push(record);
        }

        DispatchRun {
            records,
            duration: start.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::Matrix;

    fn task(name: &str) -> Task {
        Task::new(
            name,
            Matrix::from_rows(vec![vec![1, 2]]),
            Matrix::from_rows(vec![vec![3], vec![4]]),
        )
    }

    /// A loopback port nothing listens on.
    fn unreachable_endpoint() -> Url {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        Url::parse(&format!("http://127.0.0.1:{port}/")).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_records_status_line() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "taskName": "matrix_multiplication",
                "matrixA": [[1, 2]],
            })))
            .with_status(200)
            .with_body(r#"{"status":"ok","result":[[11]]}"#)
            .create_async()
            .await;

        let endpoint = Url::parse(&server.url()).unwrap();
        let dispatcher = Dispatcher::new(endpoint, Some(Duration::from_secs(5))).unwrap();
        let outcome = dispatcher
            .dispatch(&task("matrix_multiplication"))
            .await
            .unwrap();

        assert_eq!(outcome.task_name, "matrix_multiplication");
        assert_eq!(outcome.server_status, "200 OK");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_2xx_is_an_outcome() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(400)
            .with_body(r#"{"status":"error","message":"Unknown task"}"#)
            .create_async()
            .await;

        let dispatcher = Dispatcher::new(Url::parse(&server.url()).unwrap(), None).unwrap();
        let outcome = dispatcher.dispatch(&task("matrix_inversion")).await.unwrap();
        assert_eq!(outcome.server_status, "400 Bad Request");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_connection_error() {
        let dispatcher = Dispatcher::new(unreachable_endpoint(), None).unwrap();
        let err = dispatcher.dispatch(&task("t")).await.unwrap_err();
        assert_eq!(err.category(), "connection");
    }

    #[tokio::test]
    async fn test_run_catalog_continues_past_failures() {
        let mut catalog = TaskCatalog::new();
        for name in ["a", "b", "c"] {
            catalog.push(task(name));
        }

        let dispatcher = Dispatcher::new(unreachable_endpoint(), None).unwrap();
        let mut seen = Vec::new();
        let run = dispatcher
            .run_catalog(&catalog, |index, _| seen.push(index))
            .await;

        assert_eq!(run.completed_count(), 0);
        assert_eq!(run.failed_count(), 3);
        assert_eq!(seen, vec![0, 1, 2]);
        let names: Vec<&str> = run.failures().map(|f| f.task_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_run_catalog_preserves_order() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .expect(3)
            .create_async()
            .await;

        let mut catalog = TaskCatalog::new();
        for name in ["first", "second", "third"] {
            catalog.push(task(name));
        }

        let dispatcher = Dispatcher::new(Url::parse(&server.url()).unwrap(), None).unwrap();
        let run = dispatcher.run_catalog(&catalog, |_, _| {}).await;

        let names: Vec<&str> = run.outcomes().map(|o| o.task_name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
        assert_eq!(run.failed_count(), 0);
    }
}
