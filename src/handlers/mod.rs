pub mod admin;
pub mod auth;
pub mod company;
pub mod dashboard;
pub mod domain;
pub mod email;
pub mod group;
pub mod mail_log;
pub mod profile;
