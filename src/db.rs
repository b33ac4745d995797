use std::time::Duration;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

/// Maximum number of concurrent database sessions. Requests beyond this
/// bound queue for a connection until `ACQUIRE_TIMEOUT` elapses.
const MAX_CONNECTIONS: u32 = 5;
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(30);

pub fn create_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder()
        .max_size(MAX_CONNECTIONS)
        .connection_timeout(ACQUIRE_TIMEOUT)
        .build(manager)
        .expect("Failed to create database connection pool")
}
