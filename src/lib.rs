//! Kibble Wizard: pet food questionnaire engine with progressive disclosure.

pub mod boundary;
pub mod config;
pub mod consent;
pub mod error;
pub mod intro;
pub mod press;
pub mod reveal;
pub mod routes;
pub mod store;
pub mod wizard;
