//! Concrete record projections exported and deleted by the engine

pub mod account;
pub mod content;

pub use account::Account;
pub use content::{AuthorRef, ContentItem, ContentStatus};
