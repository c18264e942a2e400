//! Modelos del sistema
//! 
//! Tipos de dominio independientes del transportista.

pub mod delivery;

pub use delivery::*;
