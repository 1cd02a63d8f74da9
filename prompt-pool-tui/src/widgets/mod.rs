//! Reusable widget components.

pub mod filter;
pub mod pagination;
pub mod status;

pub use filter::TitleBar;
pub use pagination::Pagination;
pub use status::StatusBar;
