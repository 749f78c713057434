pub mod action;
pub mod alerts;
pub mod automation;
pub mod completion;
pub mod config;
pub mod dashboard;
pub mod deliverable;
pub mod error;
pub mod evidence;
pub mod indicator;
pub mod io;
pub mod paths;
pub mod program;
pub mod readiness;
pub mod record;
pub mod repository;
pub mod risk;
pub mod setup;
pub mod store;
pub mod types;
pub mod unit;
pub mod user;

pub use error::{PlanoError, Result};
