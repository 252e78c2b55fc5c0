mod connection;
mod memory;
mod mongo;
mod store;

pub use connection::{check_health, create_store};
pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use store::{id_to_string, DocumentStore};
