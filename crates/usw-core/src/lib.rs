//! Core types: courses, occurrences, schedule resolution, status formatting
//!
//! The engine runs in four pure steps:
//!
//! ```text
//! EventOccurrence[] ──match_courses()──▶ CourseOccurrence[]
//!                                             │
//!                                   resolve(now)
//!                                             ▼
//!                                       ScheduleState ──compose(now)──▶ String
//! ```

pub mod course;
pub mod duration;
pub mod error;
pub mod matcher;
pub mod schedule;
pub mod status;
pub mod time;
pub mod tracing;

pub use course::{CourseCatalog, CourseDefinition, CourseOccurrence, EventOccurrence};
pub use duration::{ceil_minutes, format_minutes, format_span};
pub use error::{ScheduleError, ScheduleResult};
pub use matcher::{MatchOutcome, MatchWarning, match_courses};
pub use schedule::{ScheduleState, resolve};
pub use status::{
    FINISHED_TEXT, JsonCourse, JsonStatus, SHORT_BREAK_THRESHOLD_MINUTES, break_between, compose,
    is_long_break,
};
pub use time::TimeWindow;
pub use crate::tracing::{TracingConfig, TracingError, init_tracing};
