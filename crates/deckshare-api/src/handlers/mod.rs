//! Route handlers organized by domain.

pub mod access;
pub mod health;
pub mod links;
pub mod view;
