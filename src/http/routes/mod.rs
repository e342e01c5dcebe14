//! Route handlers organized by resource

pub mod board;
pub mod health;
pub mod student;
pub mod user;
