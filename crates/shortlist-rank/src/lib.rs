//! Stage-2 reranking: historical association, lexical overlap, category
//! alignment and embedding similarity folded into a single score.

pub mod category;
pub mod history;
pub mod lexical;
pub mod reranker;

pub use category::{category_alignment, QueryIntent, RecordTraits};
pub use history::{normalize_query, HistoricalIndex, PreparedQuery};
pub use lexical::KeyTerms;
pub use reranker::Reranker;
