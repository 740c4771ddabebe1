//! Data models for BookWorm

pub mod author;
pub mod book;
pub mod filter;
pub mod review;

// Re-export commonly used types
pub use author::{AuthorRecord, BookRef, RawAuthorRow};
pub use book::{AuthorSummary, BookRecord, RawBookRow, ReviewRecord};
pub use filter::FilterState;
pub use review::{NewReview, SubmitRating, SubmitReview};
