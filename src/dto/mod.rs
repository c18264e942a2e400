//! DTOs
//!
//! Formas de petición/respuesta: las propias de la API HTTP y las nativas
//! de cada transportista.

pub mod delivery_dto;
pub mod econt_dto;
pub mod speedy_dto;
