use std::path::Path;

use anyhow::{Context, Result};

use weave_lib::composite::CompositeCoordinator;

use crate::output::{print_info, print_stat};

pub fn cmd_info(config_path: &Path) -> Result<()> {
  let composite =
    CompositeCoordinator::load(config_path).with_context(|| format!("Failed to load config: {}", config_path.display()))?;

  let publications = composite.publications();

  println!("Participants: {}", composite.participants().len());
  for participant in composite.participants() {
    let participant_config = participant.config();
    println!();
    print_info(participant_config.name());
    print_stat("Root", &participant_config.root_dir().display().to_string());
    if !participant.is_root() {
      print_stat("Project dir", &participant.project_dir().display().to_string());
    }
    print_stat("Distribution", &participant_config.distribution().to_string());

    for (publication, project) in publications.iter().filter(|(_, p)| p.belongs_to(participant.build())) {
      print_stat("Publishes", &format!("{} from {}", publication, project.path()));
    }
  }

  Ok(())
}
