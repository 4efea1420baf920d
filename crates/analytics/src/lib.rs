//! # Salesboard Analytics Engine
//!
//! This crate turns a denormalized sales table into the KPI totals and grouped
//! views of the sales dashboard, recomputed whenever the filter selection changes.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of the
//!   warehouse, the terminal or any file format. It depends only on `core-types`
//!   and `configuration` (Layer 0).
//! - **Stateless Calculation:** Filtering, view evaluation and KPI computation are
//!   pure functions of a `Dataset` and a `FilterSelection`. Nothing is cached.
//! - **Data-Driven Views:** Every view is a `ViewDescriptor` evaluated by one
//!   grouping routine. Adding a view is a catalog entry, not new code.
//!
//! ## Public API
//!
//! - `load`: Raw rows to a margin-enriched `Dataset`.
//! - `filter` / `FilterSelection` / `FilteredSubset`: Row selection.
//! - `ViewCatalog` / `ViewDescriptor` / `ViewResult`: The view catalog and its output.
//! - `KpiComputer` / `KpiReport`: The headline totals.
//! - `AggregationEngine`: Ties the above together for one dashboard refresh.
//! - `AnalyticsError`: The specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod catalog;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod metrics;
pub mod report;
pub mod view;

// Re-export the key components to create a clean, public-facing API.
pub use catalog::{ViewCatalog, ViewDescriptor};
pub use dataset::{load, Dataset, RawRecord, Universe};
pub use engine::{AggregationEngine, DashboardSnapshot};
pub use error::AnalyticsError;
pub use filter::{filter, FilterSelection, FilteredSubset};
pub use kpi::{compute_kpis, KpiComputer};
pub use metrics::derive_metrics;
pub use report::KpiReport;
pub use view::{ViewResult, ViewRow};
