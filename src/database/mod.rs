pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod seed;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::InMemoryEmployeeRepository;
pub use postgres::PgEmployeeRepository;
pub use repository::{EmployeeRepository, RepositoryError};
pub use seed::seed_demo_employees;
