// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,
        handlers::auth::register,
        handlers::auth::validate,

        // --- Authorization ---
        handlers::authorization::check_permission,

        // --- Users ---
        handlers::user::list_users,
        handlers::user::list_all_users,
        handlers::user::get_user,
        handlers::user::create_user,
        handlers::user::update_user,

        // --- Branches ---
        handlers::branch::list_branches,
        handlers::branch::list_all_branches,
        handlers::branch::get_branch,
        handlers::branch::create_branch,
        handlers::branch::update_branch,

        // --- Farmers ---
        handlers::farmer::list_farmers,
        handlers::farmer::list_available_farmers,
        handlers::farmer::list_farmer_types,
        handlers::farmer::get_farmer,
        handlers::farmer::list_farmers_by_technician,
        handlers::farmer::list_farmers_without_technician,
        handlers::farmer::list_farmers_by_type,
        handlers::farmer::list_farmers_by_branch,
        handlers::farmer::create_farmer,
        handlers::farmer::update_farmer,

        // --- Family groups ---
        handlers::family_group::list_family_groups,
        handlers::family_group::get_family_group,
        handlers::family_group::get_group_of_member,
        handlers::family_group::get_total_area,
        handlers::family_group::list_members,
        handlers::family_group::list_lessors,
        handlers::family_group::get_cultivation,
        handlers::family_group::get_free_area,
        handlers::family_group::list_cultivations_by_technician,
        handlers::family_group::list_cultivations_by_branch,
        handlers::family_group::create_family_group,
        handlers::family_group::update_registry,
        handlers::family_group::add_member,
        handlers::family_group::remove_member,
        handlers::family_group::change_principal,
        handlers::family_group::update_cultivation,

        // --- Assets ---
        handlers::asset::list_asset_types,
        handlers::asset::list_asset_categories,
        handlers::asset::get_asset,
        handlers::asset::list_assets_by_owner,
        handlers::asset::list_available_assets_by_owner,
        handlers::asset::list_assets_by_lessee,
        handlers::asset::create_asset,
        handlers::asset::update_asset,
        handlers::asset::delete_asset,
        handlers::asset::lease_asset,
        handlers::asset::unlease_asset,

        // --- Upload ---
        handlers::upload::upload_file,
        handlers::upload::job_status,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::LoginPayload,
            models::auth::AuthResponse,
            models::auth::TokenInfo,

            // --- Users ---
            models::user::UserPayload,
            models::user::UserResponse,

            // --- Branches ---
            models::branch::Branch,
            models::branch::BranchPayload,

            // --- Farmers ---
            models::farmer::FarmerStatus,
            models::farmer::FarmerType,
            models::farmer::FarmerPayload,
            models::farmer::FarmerSummary,
            models::farmer::FamilyGroupRef,
            models::farmer::TechnicianRef,
            models::farmer::FarmerResponse,

            // --- Family groups ---
            models::family_group::FamilyGroupPayload,
            models::family_group::RegistryPayload,
            models::family_group::Cultivation,
            models::family_group::FamilyGroupResponse,
            models::family_group::FamilyGroupMembersResponse,
            models::family_group::CultivationWithFreeArea,

            // --- Assets ---
            models::asset::AssetType,
            models::asset::AssetCategory,
            models::asset::AssetPayload,
            models::asset::LeasePayload,
            models::asset::UnleasePayload,
            models::asset::AssetOwnerRef,
            models::asset::AssetResponse,

            // --- Upload ---
            models::import::RowError,
            models::import::ImportJobStatus,
            models::import::ImportJobResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Authorization", description = "Permissões de tela do frontend"),
        (name = "User", description = "Usuários (técnicos e administradores)"),
        (name = "Branch", description = "Carteiras"),
        (name = "Farmer", description = "Produtores"),
        (name = "FamilyGroup", description = "Grupos familiares e cultivo"),
        (name = "Asset", description = "Bens e arrendamentos"),
        (name = "Upload", description = "Importação de cargas CSV")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
