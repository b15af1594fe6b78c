//! # Atelier Infrastructure
//!
//! Concrete implementations of the ports defined in `atelier-core`:
//! PostgreSQL repositories via SeaORM, an in-memory repository fallback,
//! and JWT + Argon2 authentication services.

pub mod auth;
pub mod database;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{DatabaseConfig, InMemoryStore, connect};
