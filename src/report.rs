pub mod chart;
pub mod markdown;

pub use markdown::{RepositorySection, Report};
