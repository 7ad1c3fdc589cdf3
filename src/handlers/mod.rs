// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (bearer JWT required)
pub mod protected; // /employees/*
pub mod public; // /, /health, /auth/*
