mod info;
mod lookup;
mod plan;

pub use info::cmd_info;
pub use lookup::cmd_lookup;
pub use plan::cmd_plan;
