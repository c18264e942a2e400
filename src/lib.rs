//! Delivery carriers
//!
//! Integración con varios transportistas (Speedy, Econt) detrás de una
//! interfaz común, con un gestor que consulta a todos en paralelo y una
//! API HTTP encima.

pub mod clients;
pub mod config;
pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
