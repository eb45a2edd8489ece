// src/models.rs

pub mod asset;
pub mod auth;
pub mod branch;
pub mod family_group;
pub mod farmer;
pub mod import;
pub mod page;
pub mod user;
