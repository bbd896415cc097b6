pub mod category;
pub mod expense;
pub mod frequency;
pub mod income;
pub mod savings;
pub mod user;
