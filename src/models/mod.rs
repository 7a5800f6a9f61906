pub mod admin;
pub mod company;
pub mod domain;
pub mod group;
pub mod mail;
pub mod mail_log;

pub use admin::{AdminIdentityRow, AdminListRow, AdminRow};
pub use company::CompanyRow;
pub use domain::{DomainListRow, DomainOwnershipRow};
pub use group::GroupRow;
pub use mail::{MailListRow, MailMailboxRow};
pub use mail_log::MailLogRow;
