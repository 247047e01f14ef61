pub mod database;
pub mod importer;
pub mod repository;

pub use database::MongoDb;
pub use repository::PaymentRepository;
