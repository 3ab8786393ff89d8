use bcrypt::{hash, verify, DEFAULT_COST};
use sqlx::PgPool;
use validator::Validate;

use crate::dto::{ApiResponse, AuthResponse, LoginRequest, RegisterRequest};
use crate::models::UserResponse;
use crate::repositories::UserRepository;
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    repository: UserRepository,
    jwt_config: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        Self {
            repository: UserRepository::new(pool),
            jwt_config,
        }
    }

    pub async fn register(
        &self,
        request: RegisterRequest,
    ) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        // Verificar que el email no esté registrado
        if self.repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict("El email ya está registrado".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Error hashing password: {}", e)))?;

        let user = self
            .repository
            .create(&request.full_name, &request.email, &password_hash, "customer")
            .await?;

        let token = generate_token(user.id, &user.role, &self.jwt_config)?;

        Ok(ApiResponse::success_with_message(
            AuthResponse {
                token,
                user: UserResponse::from(user),
            },
            "Usuario registrado exitosamente".to_string(),
        ))
    }

    pub async fn login(
        &self,
        request: LoginRequest,
    ) -> Result<ApiResponse<AuthResponse>, AppError> {
        request.validate()?;

        // Misma respuesta para email inexistente y contraseña incorrecta
        let user = self
            .repository
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Credenciales inválidas".to_string()))?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Error verifying password: {}", e)))?;

        if !valid {
            return Err(AppError::Unauthorized("Credenciales inválidas".to_string()));
        }

        let token = generate_token(user.id, &user.role, &self.jwt_config)?;

        Ok(ApiResponse::success(AuthResponse {
            token,
            user: UserResponse::from(user),
        }))
    }

    pub async fn me(&self, user_id: i32) -> Result<ApiResponse<UserResponse>, AppError> {
        let user = self
            .repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Usuario no encontrado".to_string()))?;

        Ok(ApiResponse::success(UserResponse::from(user)))
    }
}
