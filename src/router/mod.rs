//! Routing: the static route table and the navigation state.

mod navigation;
mod table;

pub use navigation::NavigationState;
pub use table::{normalize_path, Route, RouteTable, ROUTES};
