//! # eventizer-sqlite-store
//!
//! SQLite storage for Eventizer surveys and responses.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use eventizer_sqlite_store::SqliteStore;
//! use eventizer_survey::{Audience, EngineConfig, load_survey_with_questions};
//!
//! let mut store = SqliteStore::open("eventizer.sqlite3")?;
//! store.insert_survey(&seed_surveys::vendor_research())?;
//!
//! let loaded = load_survey_with_questions(&store, Audience::Vendor, &EngineConfig::default())?;
//! ```
//!
//! Answers are stored as flat text, one row per (response, question). Question types are
//! stored as JSON so choice options and rating bounds survive a round trip.

mod error;
pub use error::SqliteStoreError;

mod schema;

mod store;
pub use store::SqliteStore;
