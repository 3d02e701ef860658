//! Implementation of the `weave plan` command.
//!
//! Connects every participant through the dry-run engine and prints the settings each
//! connection would be established with.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use serde_json::json;

use weave_lib::composite::{CompositeCoordinator, ConnectOptions};
use weave_lib::engine::plan::{ConnectionPlan, PlanEngine};

use crate::output::{
  OutputFormat, format_duration, print_error, print_info, print_json, print_stat, print_success, symbols,
};

pub fn cmd_plan(config_path: &Path, format: OutputFormat, timeout: u64, parallelism: Option<usize>) -> Result<()> {
  let composite =
    CompositeCoordinator::load(config_path).with_context(|| format!("Failed to load config: {}", config_path.display()))?;

  let mut options = ConnectOptions {
    timeout: Duration::from_secs(timeout),
    ..ConnectOptions::default()
  };
  if let Some(parallelism) = parallelism {
    options.parallelism = parallelism;
  }

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let started = Instant::now();
  let report = rt.block_on(composite.connect_all(Arc::new(PlanEngine), &options));
  let elapsed = started.elapsed();

  if format.is_json() {
    let mut participants = serde_json::Map::new();
    for (name, plan) in &report.connected {
      participants.insert(name.clone(), json!({ "status": "connected", "plan": plan }));
    }
    for (name, err) in &report.failed {
      participants.insert(name.clone(), json!({ "status": "failed", "error": err.to_string() }));
    }
    print_json(&json!({ "participants": participants }))?;
  } else {
    if composite.participants().is_empty() {
      print_info("No participants configured.");
    }
    for participant in composite.participants() {
      let name = participant.config().name();
      if let Some(plan) = report.connected.get(name) {
        print_plan(name, plan);
      } else if let Some(err) = report.failed.get(name) {
        print_error(&format!("{}: {}", name, err));
      }
    }
    println!();
    print_info(&format!(
      "{} connected, {} failed in {}",
      report.connected.len(),
      report.failed.len(),
      format_duration(elapsed)
    ));
  }

  if !report.is_success() {
    bail!("{} participant(s) failed to connect", report.failed.len());
  }

  Ok(())
}

fn print_plan(name: &str, plan: &ConnectionPlan) {
  print_success(&format!("{} {} {}", name, symbols::ARROW, plan.project_dir.display()));
  print_stat("Distribution", &plan.distribution.to_string());
  if let Some(home) = &plan.user_home {
    print_stat("User home", &home.display().to_string());
  }
  if let Some(dir) = &plan.daemon_base_dir {
    print_stat("Daemon base dir", &dir.display().to_string());
  }
  if let Some(timeout) = &plan.daemon_idle_timeout {
    print_stat("Daemon idle timeout", &timeout.to_string());
  }
  print_stat("Search upwards", if plan.search_upwards { "yes" } else { "no" });
}
