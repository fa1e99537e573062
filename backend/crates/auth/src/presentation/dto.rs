//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

// ============================================================================
// Login / Refresh / Logout
// ============================================================================

/// Login request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh request (carries the local refresh token)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Refresh response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

// ============================================================================
// WebAuthn Registration
// ============================================================================

/// Relying party description
#[derive(Debug, Clone, Serialize)]
pub struct RpDto {
    pub id: String,
    pub name: String,
}

/// User entity for registration options
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntityDto {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

/// Accepted public-key algorithm
#[derive(Debug, Clone, Serialize)]
pub struct PubKeyCredParamDto {
    pub alg: i32,
    #[serde(rename = "type")]
    pub ty: &'static str,
}

impl PubKeyCredParamDto {
    /// ES256, the only algorithm this server offers
    pub fn es256() -> Self {
        Self {
            alg: -7,
            ty: "public-key",
        }
    }
}

/// Registration ceremony options (server to client)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOptionsResponse {
    pub ceremony_id: String,
    pub challenge: String,
    pub rp: RpDto,
    pub user: UserEntityDto,
    pub pub_key_cred_params: Vec<PubKeyCredParamDto>,
    pub timeout: u64,
}

/// Inner response of a registration credential
#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationResponseDto {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
    #[serde(rename = "publicKey")]
    pub public_key: String,
}

/// Credential response (client to server, registration)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationVerifyRequest {
    pub ceremony_id: String,
    pub id: String,
    pub response: RegistrationResponseDto,
}

// ============================================================================
// WebAuthn Authentication
// ============================================================================

/// Allowed credential descriptor
#[derive(Debug, Clone, Serialize)]
pub struct AllowCredentialDto {
    #[serde(rename = "type")]
    pub ty: &'static str,
    pub id: String,
}

/// Authentication ceremony options request
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptionsRequest {
    pub user_id: String,
}

/// Authentication ceremony options (server to client)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationOptionsResponse {
    pub ceremony_id: String,
    pub challenge: String,
    pub allow_credentials: Vec<AllowCredentialDto>,
    pub timeout: u64,
}

/// Inner response of an authentication assertion
#[derive(Debug, Clone, Deserialize)]
pub struct AssertionResponseDto {
    #[serde(rename = "clientDataJSON")]
    pub client_data_json: String,
}

/// Assertion response (client to server, authentication)
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationVerifyRequest {
    pub ceremony_id: String,
    pub user_id: String,
    pub response: AssertionResponseDto,
}

/// Ceremony verification outcome
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub verified: bool,
}
