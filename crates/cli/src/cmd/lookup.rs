//! Implementation of the `weave lookup` command.

use std::path::Path;

use anyhow::{Context, Result};

use weave_lib::composite::CompositeCoordinator;
use weave_lib::publication::ModuleCoordinate;

use crate::output::{print_info, print_stat, print_success};

pub fn cmd_lookup(config_path: &Path, coordinate: &str) -> Result<()> {
  let coordinate: ModuleCoordinate = coordinate.parse()?;
  let composite =
    CompositeCoordinator::load(config_path).with_context(|| format!("Failed to load config: {}", config_path.display()))?;

  match composite.lookup(&coordinate) {
    Some(project) => {
      print_success(&format!("{} is published by {}", coordinate, project));
      print_stat("Participant", project.build().name());
      print_stat("Project", project.path());
      print_stat("Root", &project.build().root_dir().display().to_string());
    }
    None => print_info(&format!("No participant publishes {}", coordinate)),
  }

  Ok(())
}
