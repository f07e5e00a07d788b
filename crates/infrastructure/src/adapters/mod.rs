//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

pub mod gif_classifier;
mod spark_adapter;

pub use gif_classifier::{GifClassifier, GifError};
pub use spark_adapter::SparkAdapter;
