// src/config.rs

use anyhow::Context;
use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::services::{
    AssetService, AuthService, BranchService, FamilyGroupService, FarmerService,
    ImportJobRegistry, ImportService, UserService,
};

// Estado compartilhado da aplicação: pool de conexões e os serviços.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth: AuthService,
    pub users: UserService,
    pub branches: BranchService,
    pub farmers: FarmerService,
    pub family_groups: FamilyGroupService,
    pub assets: AssetService,
    pub imports: ImportService,
    pub bind_addr: String,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .context("A variável de ambiente DATABASE_URL precisa estar definida")?;
        let jwt_secret = std::env::var("JWT_SECRET")
            .context("A variável de ambiente JWT_SECRET precisa estar definida")?;
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(std::time::Duration::from_secs(3))
            .connect(&database_url)
            .await
            .context("Não foi possível conectar ao banco de dados")?;

        let registry = ImportJobRegistry::new();

        Ok(Self {
            auth: AuthService::new(pool.clone(), jwt_secret),
            users: UserService::new(pool.clone()),
            branches: BranchService::new(pool.clone()),
            farmers: FarmerService::new(pool.clone()),
            family_groups: FamilyGroupService::new(pool.clone()),
            assets: AssetService::new(pool.clone()),
            imports: ImportService::new(pool.clone(), registry),
            pool,
            bind_addr,
        })
    }
}
