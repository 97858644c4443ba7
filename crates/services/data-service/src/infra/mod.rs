//! Infrastructure layer - store connections.

mod mongo;
mod sql;

pub use mongo::MongoStore;
pub use sql::{SqlConnection, SqlPool, SqlServer};
