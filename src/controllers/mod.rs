//! Controllers - Handlers HTTP
//!
//! Los controladores sólo validan la entrada y delegan en el
//! `DeliveryManager` o en un transportista concreto.

pub mod delivery_controller;
