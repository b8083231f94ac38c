mod aggregate;
mod merge;

pub use aggregate::{split_series, total_of, unique_total_of, DailyValues, Rankings};
pub use merge::merge;
