/// Admin pool-management payloads.
pub mod admin;
/// Player-facing game loop payloads.
pub mod game;
/// Health check payloads.
pub mod health;
/// Validation helpers shared by the DTOs.
pub mod validation;
