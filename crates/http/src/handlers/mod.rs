pub mod health;
pub mod search;
pub mod titles;
pub mod user_search;
