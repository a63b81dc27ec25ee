pub mod crypto;
pub mod http;
pub mod serialization;
