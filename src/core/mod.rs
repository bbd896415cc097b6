pub mod aggregate;
pub mod auth;
pub mod backup;
pub mod category;
pub mod dashboard;
pub mod email;
pub mod expense;
pub mod income;
pub mod log;
pub mod optimistic;
pub mod savings;
pub mod validation;
