pub mod charts;
pub mod cli;
#[cfg(feature = "desktop")]
mod commands;
pub mod config;
pub mod errors;
pub mod funnel;
pub mod input;
pub mod models;
pub mod report;
pub mod session;
pub mod state;
pub mod telemetry;

pub use crate::cli::run_from_env;
pub use crate::errors::{AppError, AppResult};
pub use crate::funnel::{calculate_metrics, FunnelBreakdown, STRETCH_FACTOR, WORKING_DAYS};
pub use crate::models::{CalculatorSnapshot, DerivedMetrics, Quotas, Rates};
pub use crate::state::CalculatorState;
