//! Configuración del proyecto
//! 
//! Variables de entorno del servidor y credenciales de los transportistas.

pub mod environment;

pub use environment::*;
