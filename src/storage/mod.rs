pub mod solid_client;
