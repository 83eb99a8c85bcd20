pub mod models;
pub mod repository;

pub use models::{hash_password, UserModel};
pub use repository::{InMemoryUserRepository, PostgresUserRepository, UserRepository};
