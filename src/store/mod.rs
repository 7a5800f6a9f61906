//! Persistence operations, one module per entity.
//!
//! Every query is parameterized. List queries take the [`Scope`] computed
//! by the authorization layer and append the company filter only when the
//! scope names one.

pub mod admins;
pub mod companies;
pub mod dashboard;
pub mod domains;
pub mod groups;
pub mod mail_logs;
pub mod mails;
