mod summary;
pub mod views;

pub use summary::{select_current_plan, sum_hours_by_category};

pub(crate) use summary::build_summary;
