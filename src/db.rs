// src/db.rs

pub mod asset_repo;
pub mod branch_repo;
pub mod family_group_repo;
pub mod farmer_repo;
pub mod lookup_repo;
pub mod user_repo;

pub use asset_repo::AssetRepository;
pub use branch_repo::BranchRepository;
pub use family_group_repo::FamilyGroupRepository;
pub use farmer_repo::FarmerRepository;
pub use lookup_repo::LookupRepository;
pub use user_repo::UserRepository;

/// Converte um termo de busca livre em um padrão ILIKE: cada token precisa
/// aparecer, na ordem digitada ("joao silva" -> "%joao%silva%").
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::from("%");
    for token in search.split_whitespace() {
        pattern.push_str(&token.to_lowercase());
        pattern.push('%');
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_viram_padrao_ilike() {
        assert_eq!(like_pattern("joao silva"), "%joao%silva%");
        assert_eq!(like_pattern("  123  "), "%123%");
        assert_eq!(like_pattern(""), "%");
    }
}
