// src/handlers.rs

pub mod asset;
pub mod auth;
pub mod authorization;
pub mod branch;
pub mod family_group;
pub mod farmer;
pub mod upload;
pub mod user;
