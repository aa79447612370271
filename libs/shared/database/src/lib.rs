pub mod store;

pub use store::{AppointmentChanges, Database, StorageError};
