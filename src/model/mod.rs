//! Typed records exchanged with callers
//!
//! Everything here is plain data: built once by the extraction pipeline,
//! never mutated afterwards, and serialized to camelCase JSON.

mod card;
mod category;
mod query;

pub use card::{base_name, CardDetail, CardId, CardSummary, CategorySource, EvolutionStage, Move};
pub use category::{search_token, Category};
pub use query::SearchQuery;
