pub mod defaults;
pub mod resolver;

pub use resolver::resolve;
