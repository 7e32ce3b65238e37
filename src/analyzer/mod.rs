// Analyzer module: hardware-name resolution, laptop rating and ranking.

pub mod rater;
pub mod rating;
pub mod resolver;

pub use rater::LaptopRater;
pub use resolver::HardwareResolver;
