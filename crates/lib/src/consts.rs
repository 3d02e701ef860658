pub const APP_NAME: &str = "weave";

/// Default name of the composite configuration file.
pub const CONFIG_FILENAME: &str = "weave.toml";

/// Environment variable overriding the shared user-home directory.
pub const USER_HOME_ENV: &str = "WEAVE_USER_HOME";

/// Name of the per-user directory used when no user home is configured.
pub const USER_HOME_DIRNAME: &str = ".weave";
