pub mod app_state;
pub mod http_error;
pub mod openapi;
pub mod routes;
pub mod schema;
pub mod startup;
