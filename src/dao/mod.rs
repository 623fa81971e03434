/// Database model definitions.
pub mod models;
/// Question pool adapter exposing the uniform CRUD contract.
pub mod pool;
/// Question pool storage backends and provider selection.
pub mod question_store;
/// Per-session state storage with a best-effort durable mirror.
pub mod session_store;
/// Storage abstraction layer for backend operations.
pub mod storage;
