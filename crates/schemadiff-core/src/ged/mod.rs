//! Graph edit distance: preprocessing, cost model and exact search.

pub mod bound;
pub mod cost;
pub mod isolation;
pub mod mapping;
pub mod search;

pub use bound::{lower_bound, min_cost_assignment};
pub use cost::CostModel;
pub use isolation::{isolate_vertices, CompatibilityClass, IsolatedVertices};
pub use mapping::Mapping;
pub use search::{search_mappings, SearchOutcome, SearchResult, SearchStats, StopReason};
