//! Modelo de User
//!
//! Este módulo contiene el struct User que mapea a la tabla users del schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Response de usuario para la API (nunca expone el hash de contraseña)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl User {
    /// Verificar si el usuario tiene rol de administrador
    pub fn is_admin(&self) -> bool {
        self.role.eq_ignore_ascii_case("admin")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user(role: &str) -> User {
        User {
            id: 1,
            full_name: "Ana Pérez".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_is_admin() {
        assert!(sample_user("admin").is_admin());
        assert!(sample_user("Admin").is_admin());
        assert!(!sample_user("customer").is_admin());
    }

    #[test]
    fn test_user_response_omite_password() {
        let response = UserResponse::from(sample_user("customer"));
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(json.contains("ana@example.com"));
    }
}
