pub mod did;
pub mod signing;
