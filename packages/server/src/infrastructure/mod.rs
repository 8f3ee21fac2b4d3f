//! Infrastructure layer: wire DTOs and the registry implementation.

pub mod dto;
pub mod repository;
