//! # rca-resolve
//!
//! Resolves the analysis context of a root-cause investigation screen from
//! exactly one winning initialization source: an explicit metric, an anomaly
//! event, or a saved session.
//!
//! - [`granularity`]: coarsens raw `<count>_<UNIT>` granularities
//! - [`align`]: floors and snaps timestamps in a reference time zone
//! - [`offsets`]: window offsets keyed by granularity unit
//! - [`range`]: anomaly and analysis window computation
//! - [`session`]: picks the most recent saved session for an anomaly
//! - [`resolver`]: the precedence fold producing a [`Resolution`]
//! - [`source`]: concurrent record loading ahead of resolution
//!
//! ```no_run
//! # async fn demo() {
//! use chrono::Local;
//! use rca_resolve::{FileRecordSource, ResolverSettings, RouteParams, load_inputs, resolve};
//!
//! let params = RouteParams {
//!     anomaly_id: Some("42".to_string()),
//!     ..RouteParams::default()
//! };
//! let inputs = load_inputs(&FileRecordSource::new("records"), &params).await;
//! let resolution = resolve(inputs, &Local::now(), &ResolverSettings::default());
//! if let Some(redirect) = &resolution.redirect {
//!     println!("reopen session {}", redirect.session_id);
//! }
//! # }
//! ```

pub mod align;
pub mod granularity;
pub mod offsets;
pub mod params;
pub mod range;
pub mod resolver;
pub mod session;
pub mod source;

mod error;
mod file_source;

pub use error::{BranchError, SourceError};
pub use file_source::FileRecordSource;
pub use params::{Redirect, RouteParams};
pub use resolver::{Lookup, Resolution, ResolveInputs, ResolverSettings, resolve};
pub use source::{RecordSource, load_inputs};
