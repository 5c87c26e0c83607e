pub mod aggregate;

pub use aggregate::Policy;
