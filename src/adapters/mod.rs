// Adapters layer: concrete implementations for external systems (http api, local storage).

pub mod http;
pub mod storage;
