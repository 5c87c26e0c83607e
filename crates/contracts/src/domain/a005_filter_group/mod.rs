pub mod aggregate;

pub use aggregate::{FilterGroup, FilterOption};
