pub mod chat_route;
pub mod health_route;
