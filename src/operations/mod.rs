//! Request-scoped mutation and query services
//!
//! Every operation is a stateless async call over an injected connection;
//! mutations write the entity row and its activity-log entry inside one
//! transaction.

pub mod attendance;
pub mod certificates;
pub mod dashboard;
pub mod logs;
pub mod restore;
pub mod tanah_garapan;
pub mod users;
