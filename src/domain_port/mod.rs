mod role_repo;
mod token_repo;
mod user_repo;

pub use role_repo::*;
pub use token_repo::*;
pub use user_repo::*;
