pub mod classifier;
pub mod insight;
pub mod market_status;
pub mod sentiment;

pub use classifier::{classify, StatusTier};
pub use insight::{analyze, IndicatorAnalysis};
pub use market_status::{assess_overall, IndicatorRow, OverallAssessment, RiskLevel};
pub use sentiment::SentimentLabel;
