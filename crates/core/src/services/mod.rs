pub mod schema_service;
pub mod session_service;
pub mod sync_service;
