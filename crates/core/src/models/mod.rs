pub mod cache;
pub mod notice;
pub mod session;
pub mod strategy;
pub mod trade;
