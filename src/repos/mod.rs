pub mod account_repo;
pub mod error;
#[cfg(test)]
pub mod memory;
