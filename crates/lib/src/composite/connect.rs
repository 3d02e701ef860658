//! Concurrent participant connection.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::{CompositeCoordinator, ConnectReport};
use crate::engine::{ConnectError, ConnectorFactory, EngineConnector};

/// Default per-participant connect budget.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(60);

/// How [`CompositeCoordinator::connect_all`] schedules connections.
#[derive(Debug, Clone)]
pub struct ConnectOptions {
  /// Maximum number of participants connecting at once.
  pub parallelism: usize,

  /// Budget for a single participant's connect call, measured once it starts.
  pub timeout: Duration,
}

impl Default for ConnectOptions {
  fn default() -> Self {
    Self {
      parallelism: num_cpus(),
      timeout: DEFAULT_CONNECT_TIMEOUT,
    }
  }
}

fn num_cpus() -> usize {
  std::thread::available_parallelism().map(|p| p.get()).unwrap_or(4)
}

type Connection<F> = <<F as ConnectorFactory>::Connector as EngineConnector>::Connection;

impl CompositeCoordinator {
  /// Connect every participant through `factory`.
  ///
  /// Each blocking connect runs on the blocking pool, at most `options.parallelism` at a time, and
  /// is abandoned after `options.timeout`. Every participant ends up in exactly one of
  /// `connected` or `failed`.
  pub async fn connect_all<F>(&self, factory: Arc<F>, options: &ConnectOptions) -> ConnectReport<Connection<F>>
  where
    F: ConnectorFactory + 'static,
    Connection<F>: Send + 'static,
  {
    info!(
      participants = self.participants.len(),
      parallelism = options.parallelism,
      "connecting participants"
    );

    let semaphore = Arc::new(Semaphore::new(options.parallelism.max(1)));
    let mut join_set = JoinSet::new();
    let mut pending = BTreeSet::new();

    for participant in &self.participants {
      let name = participant.config().name().to_string();
      pending.insert(name.clone());
      let participant = participant.clone();
      let factory = Arc::clone(&factory);
      let semaphore = Arc::clone(&semaphore);
      let timeout = options.timeout;

      join_set.spawn(async move {
        let _permit = match semaphore.acquire_owned().await {
          Ok(permit) => permit,
          Err(e) => {
            let err = ConnectError::Aborted {
              message: e.to_string(),
            };
            return (name, Err(err));
          }
        };

        let task = tokio::task::spawn_blocking(move || participant.connect(factory.as_ref()));
        let result = match tokio::time::timeout(timeout, task).await {
          Ok(Ok(result)) => result,
          Ok(Err(join_err)) => Err(ConnectError::Aborted {
            message: join_err.to_string(),
          }),
          // The blocking call keeps running; only its result is dropped.
          Err(_) => Err(ConnectError::TimedOut { after: timeout }),
        };
        (name, result)
      });
    }

    let mut report = ConnectReport::default();

    while let Some(joined) = join_set.join_next().await {
      let (name, result) = match joined {
        Ok(outcome) => outcome,
        Err(e) => {
          error!(error = %e, "connect task failed");
          continue;
        }
      };
      pending.remove(&name);

      match result {
        Ok(connection) => {
          debug!(participant = %name, "participant connected");
          report.connected.insert(name, connection);
        }
        Err(e @ ConnectError::TimedOut { .. }) => {
          warn!(participant = %name, error = %e, "participant connect failed");
          report.failed.insert(name, e);
        }
        Err(e) => {
          error!(participant = %name, error = %e, "participant connect failed");
          report.failed.insert(name, e);
        }
      }
    }

    // Tasks lost without reporting back.
    for name in pending {
      report.failed.insert(
        name,
        ConnectError::Aborted {
          message: "connect task ended without a result".to_string(),
        },
      );
    }

    info!(
      connected = report.connected.len(),
      failed = report.failed.len(),
      "participant connection complete"
    );

    report
  }
}
