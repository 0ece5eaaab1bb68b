pub mod config;
pub mod error;
pub mod flag;
pub mod health;
pub mod join;
pub mod labels;
pub mod marker;
pub mod record;
pub mod site;
