//! Request extractors shared by handlers.

pub mod format;
pub mod query;
pub use format::{Format, ResponseFormat, FORMAT_PARAM};
pub use query::{first_values, FirstQuery};
