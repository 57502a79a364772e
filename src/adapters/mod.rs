// Adapters layer: concrete implementations of the domain ports for external systems.

pub mod account;
#[cfg(feature = "aws")]
pub mod aws;
#[cfg(feature = "aws")]
pub mod cost_explorer;
pub mod fx;
pub mod notify;
