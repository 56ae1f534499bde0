mod role_repo_memory;
mod token_repo_memory;
mod user_repo_memory;

pub use role_repo_memory::*;
pub use token_repo_memory::*;
pub use user_repo_memory::*;
