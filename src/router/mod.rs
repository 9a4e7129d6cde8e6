//! The route table and declaration façade (spec.md §3, §4.4, §4.5, §5, §6).

mod collection;
mod facade;
mod group;

pub use collection::RouteCollection;
pub use facade::{Router, RouterConfig};
pub use group::{GroupScope, GroupStack};
