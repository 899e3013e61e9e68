// Fraudlens - terminal fraud-detection predictor
// Library exports

pub mod cli;
pub mod config;
pub mod data;
pub mod errors;
pub mod forest;
pub mod predictor;
pub mod training;
