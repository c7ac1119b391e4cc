//! Platform-agnostic core - calendar arithmetic, scheduling and monitoring
//!
//! Everything here is pure with respect to the host: time flows in as plain
//! millisecond values and calendar fields, results flow out as plain records.

pub mod calendar;
pub mod engine;
pub mod errors;
pub mod monitor;
pub mod scheduler;

pub use calendar::{days_in_month, is_leap_year, CalendarError, CalendarInstant};
pub use engine::{
    format_time_display, format_time_display_loose, DifferenceEngine, DifferenceRecord,
    DEFAULT_START, UNIT_LABELS,
};
pub use errors::{AppError, ErrorKind, ErrorLog};
pub use monitor::{MemorySnapshot, PerformanceMonitor, PerformanceReport};
pub use scheduler::{AdaptiveScheduler, Phase, Tick, TickCallback, TickError};
