use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use weave_lib::composite::{CompositeCoordinator, CompositeError, ConnectOptions};
use weave_lib::config;
use weave_lib::engine::plan::PlanEngine;
use weave_lib::identity::ProjectIdentity;
use weave_lib::participant::DistributionSelection;
use weave_lib::publication::ModuleCoordinate;

const CONFIG: &str = r#"
user_home = "home"
daemon_base_dir = "daemons"

[[participants]]
name = "a"
root_dir = "repoA"
distribution = "https://example.com/engine-8.5.zip"
installation = "/opt/engine"
version = "8.5"

  [[participants.publications]]
  project = ":core"
  coordinate = "com.acme:core:1.0"

  [[participants.publications]]
  project = ":api"
  coordinate = "com.acme:api:1.0"

[[participants]]
name = "b"
root_dir = "repoB"

  [[participants.publications]]
  project = ":"
  coordinate = "com.acme:app:2.0"
"#;

fn setup(config: &str) -> (TempDir, PathBuf) {
  let temp = TempDir::new().unwrap();
  fs::create_dir_all(temp.path().join("repoA/core")).unwrap();
  fs::create_dir_all(temp.path().join("repoB")).unwrap();
  let path = temp.path().join("weave.toml");
  fs::write(&path, config).unwrap();
  (temp, path)
}

fn coordinate(s: &str) -> ModuleCoordinate {
  s.parse().unwrap()
}

#[test]
fn lookup_resolves_publishing_project() {
  let (_temp, path) = setup(CONFIG);
  let composite = CompositeCoordinator::from_config(&config::load(&path).unwrap()).unwrap();
  let build_a = composite.connector("a").unwrap().build().clone();
  let build_b = composite.connector("b").unwrap().build().clone();

  assert_eq!(
    composite.lookup(&coordinate("com.acme:core:1.0")),
    Some(ProjectIdentity::new(build_a.clone(), ":core"))
  );
  assert_eq!(
    composite.lookup(&coordinate("com.acme:app:2.0")),
    Some(ProjectIdentity::new(build_b, ":"))
  );
  assert_eq!(composite.lookup(&coordinate("com.acme:missing:1.0")), None);
  assert_ne!(
    composite.lookup(&coordinate("com.acme:api:1.0")),
    Some(ProjectIdentity::new(build_a, ":core"))
  );
}

#[test]
fn collision_aborts_initialization() {
  let colliding = format!(
    "{}\n  [[participants.publications]]\n  project = \":dup\"\n  coordinate = \"com.acme:core:1.0\"\n",
    CONFIG
  );
  let (_temp, path) = setup(&colliding);

  let err = CompositeCoordinator::from_config(&config::load(&path).unwrap()).unwrap_err();
  assert!(matches!(err, CompositeError::Collision(_)));
}

#[tokio::test]
async fn connect_all_applies_per_participant_settings() {
  let (temp, path) = setup(CONFIG);
  let base = dunce::canonicalize(temp.path()).unwrap();
  let composite = CompositeCoordinator::from_config(&config::load(&path).unwrap()).unwrap();

  let report = composite
    .connect_all(Arc::new(PlanEngine), &ConnectOptions::default())
    .await;
  assert!(report.is_success());

  let a = &report.connected["a"];
  assert_eq!(
    a.distribution,
    DistributionSelection::Distribution("https://example.com/engine-8.5.zip".to_string())
  );
  assert_eq!(a.user_home, Some(base.join("home")));
  assert_eq!(a.daemon_base_dir, Some(base.join("daemons")));
  assert!(!a.search_upwards);

  let b = &report.connected["b"];
  assert_eq!(b.distribution, DistributionSelection::BuildDeclared);
  assert_eq!(b.project_dir, base.join("repoB"));
}

#[test]
fn narrowed_connector_targets_sub_project() {
  let (temp, path) = setup(CONFIG);
  let base = dunce::canonicalize(temp.path()).unwrap();
  let composite = CompositeCoordinator::from_config(&config::load(&path).unwrap()).unwrap();

  let root = composite.connector("a").unwrap();
  let core = root.with_project_directory(base.join("repoA").join("core"));

  let plan = core.connect(&PlanEngine).unwrap();
  assert!(plan.search_upwards);
  assert_eq!(plan.project_dir, base.join("repoA").join("core"));

  let root_plan = root.connect(&PlanEngine).unwrap();
  assert!(!root_plan.search_upwards);
  assert_eq!(root_plan.project_dir, base.join("repoA"));
}
