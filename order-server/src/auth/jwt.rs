//! JWT 令牌服务
//!
//! 处理 JWT 令牌的生成、验证和解析。

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT 配置
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// JWT 密钥 (应至少 32 字节)
    pub secret: String,
    /// 令牌过期时间 (分钟)
    pub expiration_minutes: i64,
    /// 令牌签发者
    pub issuer: String,
    /// 令牌受众
    pub audience: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: load_jwt_secret(),
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(1440), // 默认 24 小时
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "order-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "order-clients".to_string()),
        }
    }
}

/// 存储在令牌中的 JWT Claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 用户 ID (Subject)
    pub sub: String,
    /// 邮箱
    pub email: String,
    /// 显示名
    pub display_name: String,
    /// 角色 ("admin" | "staff")
    pub role: String,
    /// 过期时间戳
    pub exp: i64,
    /// 签发时间戳
    pub iat: i64,
    /// 签发者
    pub iss: String,
    /// 受众
    pub aud: String,
}

/// JWT 错误
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("无效令牌: {0}")]
    InvalidToken(String),

    #[error("令牌已过期")]
    ExpiredToken,

    #[error("无效签名")]
    InvalidSignature,

    #[error("令牌生成失败: {0}")]
    GenerationFailed(String),
}

/// 从环境变量加载 JWT 密钥，未设置时生成临时密钥
///
/// 临时密钥意味着所有会话在重启后失效，生产环境必须显式配置。
fn load_jwt_secret() -> String {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= 32 => secret,
        Ok(_) => {
            tracing::warn!("JWT_SECRET is shorter than 32 characters, generating temporary key");
            generate_printable_secret()
        }
        Err(_) => {
            tracing::warn!("JWT_SECRET not set, generating temporary key; sessions will not survive restarts");
            generate_printable_secret()
        }
    }
}

/// 生成可打印的随机密钥 (64 字符)
fn generate_printable_secret() -> String {
    let allowed_chars =
        "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+";

    let rng = SystemRandom::new();
    let mut key = String::with_capacity(64);
    for _ in 0..64 {
        let mut byte = [0u8; 1];
        if rng.fill(&mut byte).is_err() {
            // 随机数失败时退回固定开发密钥
            return "TallyOrderServerDevelopmentKey2024-ReplaceMe!".to_string();
        }
        let idx = (byte[0] as usize) % allowed_chars.len();
        key.push(allowed_chars.as_bytes()[idx] as char);
    }
    key
}

/// JWT 令牌服务
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    /// 使用默认配置创建新的 JWT 服务
    pub fn new() -> Self {
        Self::with_config(JwtConfig::default())
    }

    /// 使用指定配置创建新的 JWT 服务
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// 为用户生成新令牌
    pub fn generate_token(
        &self,
        user_id: &str,
        email: &str,
        display_name: &str,
        role: &str,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            display_name: display_name.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// 验证并解码令牌
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {}", e)),
            }
        })?;

        Ok(token_data.claims)
    }

    /// 从 Authorization 头提取令牌
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

impl Default for JwtService {
    fn default() -> Self {
        Self::new()
    }
}

/// 当前用户上下文 (从 JWT Claims 解析)
///
/// 由认证中间件创建，注入到请求处理函数
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// 用户 ID ("user:<id>")
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            display_name: claims.display_name,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    /// 是否管理员
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
