//! Vector index artifacts, flat nearest-neighbour search and the Stage-1
//! retriever that turns a query into catalog candidates.

pub mod distance;
pub mod index;
pub mod retriever;
pub mod schema;

pub use index::VectorIndex;
pub use retriever::Retriever;
