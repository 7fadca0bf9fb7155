//! Functional core of the portfolio backend.
//!
//! - [`portfolio`]: `User` / `Project` records, drafts and pure validation
//! - [`storage`]: store client contracts for the `users` and `projects` tables
//! - [`service`]: the consistency service that keeps both tables in agreement
//! - [`auth`]: credential contracts and pure token helpers

pub mod auth;
pub mod portfolio;
pub mod service;
pub mod storage;
