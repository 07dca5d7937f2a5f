//! In-process request routing
//!
//! Maps a verb and an exact path to a handler returning the response body.
//! There is no transport here; a caller feeds verb + path into `dispatch`.

pub mod table;
pub mod verb;

pub use table::{demo_routes, Action, RouteTable, SharedRouteTable};
pub use verb::HttpVerb;
