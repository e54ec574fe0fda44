pub mod config;
pub mod features;
pub mod framework;
pub mod gateway;
pub mod gemini;
pub mod journal;
pub mod utils;
pub mod validate;

pub use framework::Error;
