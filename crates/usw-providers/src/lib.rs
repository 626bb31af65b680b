//! Calendar sources, iCalendar parsing and occurrence expansion.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐
//! │  Web (http)  │    │  Local file  │
//! └──────┬───────┘    └──────┬───────┘
//!        │    IcsProvider    │
//!        └─────────┬─────────┘
//!                  ▼
//!           ┌─────────────┐
//!           │  RawEvent   │
//!           └──────┬──────┘
//!                  ▼ expand_for_day()
//!           ┌─────────────┐
//!           │  RawEvent   │  (one per occurrence)
//!           └──────┬──────┘
//!                  ▼ to_occurrences()
//!         ┌─────────────────┐
//!         │ EventOccurrence │
//!         └─────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use usw_providers::{CalendarProvider, CalendarSource, IcsProvider, IcsProviderConfig};
//!
//! let provider = IcsProvider::new(vec![CalendarSource::infer(url)], IcsProviderConfig::default())?;
//! let raw = provider.fetch_events().await?;
//! let today = usw_providers::expand_for_day(&raw, &window);
//! let occurrences = usw_providers::to_occurrences(&today)?;
//! ```

pub mod error;
pub mod expand;
pub mod ics;
pub mod normalize;
pub mod provider;
pub mod raw_event;
pub mod recurrence;
pub mod source;

pub use error::{ProviderError, ProviderErrorCode, ProviderResult};
pub use expand::expand_for_day;
pub use ics::parse_ics_content;
pub use normalize::{to_occurrence, to_occurrences};
pub use provider::{BoxFuture, CalendarProvider, DEFAULT_TIMEOUT, IcsProvider, IcsProviderConfig};
pub use raw_event::{RawEvent, RawEventTime};
pub use recurrence::Recurrence;
pub use source::{CalendarSource, SourceKind};
