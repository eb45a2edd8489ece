// src/services/authorization_service.rs

use crate::models::{auth::Role, user::User};

/// Diz se o usuário pode acessar a tela pedida pelo frontend. Itens
/// desconhecidos são sempre negados.
pub fn has_permission(user: &User, item: &str) -> bool {
    match item {
        "FamilyGroup" | "Farmer" => {
            user.has_role(Role::Technician) || user.has_role(Role::Admin)
        }
        "User" => user.has_role(Role::Admin),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(roles: Vec<Role>) -> User {
        User {
            id: 1,
            username: "teste".to_string(),
            name: "Teste".to_string(),
            password_hash: String::new(),
            roles,
            branch_id: None,
        }
    }

    #[test]
    fn tecnico_acessa_grupos_e_produtores() {
        let user = user_with(vec![Role::User, Role::Technician]);
        assert!(has_permission(&user, "FamilyGroup"));
        assert!(has_permission(&user, "Farmer"));
        assert!(!has_permission(&user, "User"));
    }

    #[test]
    fn admin_acessa_tudo() {
        let user = user_with(vec![Role::Admin]);
        assert!(has_permission(&user, "FamilyGroup"));
        assert!(has_permission(&user, "User"));
    }

    #[test]
    fn item_desconhecido_e_negado() {
        let user = user_with(vec![Role::Admin]);
        assert!(!has_permission(&user, "Dashboard"));
    }
}
