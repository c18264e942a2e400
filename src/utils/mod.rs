//! Utilidades del sistema
//! 
//! Manejo de errores y validaciones compartidas por los adaptadores y los
//! controladores.

pub mod errors;
pub mod validation;

pub use errors::*;
