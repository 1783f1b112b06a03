pub mod listing;
pub mod project;

pub use listing::ListingParser;
pub use project::Project;
