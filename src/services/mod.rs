/// Admin service for question pool management.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Core game loop: sessions, question draws, scoring.
pub mod game_service;
/// Health check service.
pub mod health_service;
