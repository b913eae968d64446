//! # eventizer-dialoguer-wizard
//!
//! Fill an Eventizer survey on the command line, one question at a time.
//!
//! Visibility is resolved again after every answer, so picking a service type brings in
//! that category's follow-up questions and drops answers to the ones that no longer apply.
//!
//! ## Example
//!
//! ```rust,ignore
//! use eventizer_dialoguer_wizard::DialoguerWizard;
//! use eventizer_survey::{Audience, EngineConfig, Respondent, load_survey_with_questions, submit};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut store = seed_surveys::seeded_store();
//!     let loaded = load_survey_with_questions(&store, Audience::Vendor, &config)?;
//!
//!     let draft = DialoguerWizard::new().fill(&loaded, &config)?;
//!     let response = submit(&mut store, &loaded, &draft, &Respondent::anonymous(), &config)?;
//!     println!("Thanks! Response {} saved.", response.id);
//!     Ok(())
//! }
//! ```

mod wizard;

pub use wizard::{DialoguerWizard, WizardError};
