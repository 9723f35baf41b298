// Library interface, so that the binary and integration tests share the same modules

pub mod api_model;
pub mod command_line_interface;
pub mod constants;
pub mod database_api;
pub mod database_init;
pub mod error;
pub mod warp_api;
pub mod warp_endpoints;
