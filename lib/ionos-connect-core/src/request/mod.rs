//! Request planning: path templates, query strings, bodies, and the
//! table-driven plan builder.

mod body;
mod path;
mod plan;
mod query;

pub use self::body::Payload;
pub use self::path::resolve_path;
pub use self::plan::{RequestPlan, build_plan, merge_for_update};
pub use self::query::QueryMap;
