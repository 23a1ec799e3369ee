/// OpenAPI documentation generation.
pub mod documentation;
/// Gameplay operations: joining, answering, scoring and advancing.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Public service for read-only game information.
pub mod public_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
