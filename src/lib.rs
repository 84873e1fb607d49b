pub mod aggregate;
pub mod args;
pub mod compare;
pub mod engine;
pub mod error;
pub mod payload;
pub mod platform;
pub mod range;
pub mod report;
pub mod stats;
pub mod utils;

pub use aggregate::aggregate;
pub use args::Args;
pub use compare::{compare, percent_change};
pub use engine::{analyze_comparison, compare_platform};
pub use error::CompareError;
pub use payload::Payload;
pub use platform::{AggregationMode, MetricSpec, PlatformAdapter, PlatformId};
pub use range::{resolve, DateRange};
pub use stats::{assemble, AggregatedGroup, ComparisonResult, ComparisonRow, TableComparison};
