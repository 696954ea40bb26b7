pub mod generator;
pub mod timeseries;
