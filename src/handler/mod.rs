pub mod admin_finance;
pub mod admin_orders;
pub mod auth;
pub mod catalog;
pub mod lucky_wheel;
pub mod orders;
pub mod support;
pub mod users;
pub mod wallet;
