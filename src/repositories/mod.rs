pub mod refueling_repository;

pub use refueling_repository::{PgRefuelingRepository, RefuelingStore};
