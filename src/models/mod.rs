pub mod activity;
pub mod customer;
pub mod service;
pub mod user;
pub mod vehicle;

/// A status string outside the entity's allowed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownStatus;
