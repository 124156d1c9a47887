pub mod plan;
pub mod show;

pub use plan::{Action, Change, Plan, ResourceChange};
pub use show::{ensure_initialised, load_plan, load_plan_in};
