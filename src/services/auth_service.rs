use crate::{database::MongoDB, models::User};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::doc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id (hex) ou email do admin
    pub email: String,
    pub roles: Vec<String>,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

// Generate JWT token
pub fn generate_jwt(sub: &str, email: &str, roles: Vec<String>) -> Result<String, String> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;
    let jti = Uuid::new_v4().to_string();

    let claims = Claims {
        sub: sub.to_string(),
        email: email.to_string(),
        roles,
        iat,
        exp,
        jti,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| format!("Failed to generate token: {}", e))
}

// Verify JWT token
pub fn verify_token(token: &str) -> Result<Claims, String> {
    let validation = Validation::new(Algorithm::HS256);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| format!("Invalid token: {}", e))
}

// Naive check, enough to reject obvious garbage before hitting the store
fn is_valid_email(email: &str) -> bool {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        _ => false,
    }
}

// User login
pub async fn login(db: &MongoDB, request: &LoginRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    let user = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| "User doesn't exist".to_string())?;

    let valid = verify(&request.password, &user.password)
        .map_err(|e| format!("Password verification error: {}", e))?;

    if !valid {
        return Err("Invalid credentials".to_string());
    }

    let user_id = user._id.ok_or("User document has no ID")?.to_hex();
    let token = generate_jwt(&user_id, &user.email, vec!["user".to_string()])?;

    Ok(AuthResponse { success: true, token })
}

// User registration
pub async fn register(db: &MongoDB, request: &RegisterRequest) -> Result<AuthResponse, String> {
    let collection = db.collection::<User>("users");

    if !is_valid_email(&request.email) {
        return Err("Please enter a valid email".to_string());
    }

    if request.password.len() < 8 {
        return Err("Please enter a strong password".to_string());
    }

    let existing = collection
        .find_one(doc! { "email": &request.email })
        .await
        .map_err(|e| format!("Database error: {}", e))?;

    if existing.is_some() {
        return Err("User already exists".to_string());
    }

    let hashed_password =
        hash(&request.password, DEFAULT_COST).map_err(|e| format!("Failed to hash password: {}", e))?;

    let new_user = User {
        _id: None,
        name: request.name.clone(),
        email: request.email.clone(),
        password: hashed_password,
        cart_data: Default::default(),
    };

    let insert_result = collection
        .insert_one(new_user)
        .await
        .map_err(|e| format!("Failed to insert user: {}", e))?;

    let user_id = insert_result
        .inserted_id
        .as_object_id()
        .ok_or("Insert did not return an ObjectId")?
        .to_hex();

    log::info!("✅ User registered: {}", request.email);

    let token = generate_jwt(&user_id, &request.email, vec!["user".to_string()])?;

    Ok(AuthResponse { success: true, token })
}

// Admin login - credentials come from environment, token carries the admin role
pub async fn admin_login(request: &LoginRequest) -> Result<AuthResponse, String> {
    let admin_email =
        std::env::var("ADMIN_EMAIL").map_err(|_| "ADMIN_EMAIL not found in environment")?;
    let admin_password =
        std::env::var("ADMIN_PASSWORD").map_err(|_| "ADMIN_PASSWORD not found in environment")?;

    if request.email != admin_email || request.password != admin_password {
        return Err("Invalid credentials".to_string());
    }

    let token = generate_jwt(&admin_email, &admin_email, vec!["admin".to_string()])?;

    log::info!("✅ Admin logged in");

    Ok(AuthResponse { success: true, token })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_round_trip() {
        let token = generate_jwt("user-123", "a@b.com", vec!["user".to_string()]).unwrap();
        let claims = verify_token(&token).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.roles, vec!["user"]);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_tampered_token_fails_closed() {
        let token = generate_jwt("user-123", "a@b.com", vec!["user".to_string()]).unwrap();
        let mut tampered = token.clone();
        tampered.pop();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });

        assert!(verify_token(&tampered).is_err());
        assert!(verify_token("not-a-jwt").is_err());
        assert!(verify_token("").is_err());
    }

    #[test]
    fn test_admin_role_in_claims() {
        let token = generate_jwt("admin@shop.com", "admin@shop.com", vec!["admin".to_string()]).unwrap();
        let claims = verify_token(&token).unwrap();

        assert!(claims.roles.iter().any(|r| r == "admin"));
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("user@example.com"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
    }

    #[test]
    fn test_bcrypt_hash_and_verify() {
        let hashed = hash("super-secret-pw", DEFAULT_COST).unwrap();
        assert!(verify("super-secret-pw", &hashed).unwrap());
        assert!(!verify("wrong-pw", &hashed).unwrap());
    }
}
