pub mod customer;
pub mod vendor;

use eventizer_survey::{LoadedSurvey, MemoryStore};

// Re-export customer feedback survey
pub use customer::customer_feedback;

// Re-export vendor research surveys
pub use vendor::{legacy_vendor_research, vendor_research};

/// Every survey Eventizer ships with.
pub fn all() -> Vec<LoadedSurvey> {
    vec![vendor_research(), customer_feedback()]
}

/// A memory store holding every shipped survey.
pub fn seeded_store() -> MemoryStore {
    all().into_iter().fold(MemoryStore::new(), MemoryStore::with_survey)
}
