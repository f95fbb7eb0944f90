pub mod attendance;
pub mod auth;
pub mod catalog;
pub mod dashboard;
pub mod transactions;
pub mod users;
