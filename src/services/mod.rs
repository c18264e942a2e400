//! Services module
//! 
//! Lógica de negocio que combina varios transportistas.

pub mod delivery_manager;

pub use delivery_manager::*;
