// --- File: crates/reserva_scheduling/src/lib.rs ---
// Declare modules within this crate
pub mod doc;
pub mod handlers;
pub mod logic;
#[cfg(test)]
mod logic_proptest;
#[cfg(test)]
mod logic_test;
pub mod models;
pub mod routes;
pub mod service;
#[cfg(test)]
mod service_test;
pub mod validator;
