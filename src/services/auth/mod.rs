pub mod account_jwt;
pub mod factory;

pub use account_jwt::{TokenError, TokenService};
pub use factory::build_token_service;
