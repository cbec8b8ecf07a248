//! Column profiling: per-type descriptive statistics.

mod classifier;
mod column;

pub use classifier::{round2, ClassifierConfig, ColumnClassifier};
pub use column::{
    BooleanStatistics, ColumnProfile, ColumnStatistics, DateStatistics, NumericStatistics,
    TextStatistics,
};
