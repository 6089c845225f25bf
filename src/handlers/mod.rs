pub mod auth;
pub mod customers;
pub mod dashboard;
pub mod services;
pub mod vehicles;
