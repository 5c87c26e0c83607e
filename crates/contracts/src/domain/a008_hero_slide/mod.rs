pub mod aggregate;

pub use aggregate::HeroSlide;
