pub mod app_config;
pub mod booking_repo;
pub mod database;
pub mod error;
pub mod user_repo;

pub use booking_repo::BookingRepository;
pub use database::DbClient;
pub use error::StoreError;
pub use user_repo::UserRepository;
