//! Clients - HTTP Clients for External APIs
//! 
//! Cliente base autenticado y un adaptador por transportista.

pub mod carrier_client;
pub mod econt_client;
pub mod provider;
pub mod speedy_client;

pub use econt_client::{EcontClient, ECONT_PROVIDER};
pub use provider::DeliveryProvider;
pub use speedy_client::{SpeedyClient, SPEEDY_PROVIDER};
