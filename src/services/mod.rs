pub mod api_server;
pub mod auth_client;
pub mod did_publisher;
pub mod signing_client;
