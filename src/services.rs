// src/services.rs

pub mod asset_service;
pub mod auth_service;
pub mod authorization_service;
pub mod branch_service;
pub mod family_group_service;
pub mod farmer_service;
pub mod import_service;
pub mod user_service;

pub use asset_service::AssetService;
pub use auth_service::AuthService;
pub use branch_service::BranchService;
pub use family_group_service::FamilyGroupService;
pub use farmer_service::FarmerService;
pub use import_service::{ImportJobRegistry, ImportService};
pub use user_service::UserService;
