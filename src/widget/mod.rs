//! Metric widgets rendered as [`Element`] trees.
//!
//! Every widget has a `create_*` function building a fresh tree and an
//! `update_*` function that locates its sub-elements by `data-role` and
//! changes only what moved, so CSS transitions stay attached. Out-of-range
//! values are clamped to `[0, 100]` percent and a zero maximum renders as empty.

pub mod element;
pub mod format;
pub mod gauge;
pub mod level;
pub mod metric_card;
pub mod progress_bar;
pub mod sparkline;

pub use element::Element;
pub use format::{format_bytes, format_number, format_percentage, format_uptime, format_value};
pub use gauge::{GaugeOptions, create_gauge, update_gauge};
pub use level::UsageLevel;
pub use metric_card::{MetricCardData, MetricCardOptions, create_metric_card, update_metric_card};
pub use progress_bar::{ProgressBarOptions, create_progress_bar, update_progress_bar};
pub use sparkline::{SparklineOptions, create_sparkline, update_sparkline};
