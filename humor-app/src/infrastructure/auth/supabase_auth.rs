use crate::application::IdentityVerifier;
use crate::domain::Viewer;
use async_trait::async_trait;
use humor_errors::AppError;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

const USER_PATH: &str = "auth/v1/user";

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: uuid::Uuid,
    email: Option<String>,
}

/// Verifies bearer tokens against the hosted auth service's user endpoint.
#[derive(Clone)]
pub struct SupabaseAuth {
    user_url: Url,
    api_key: String,
    http_client: reqwest::Client,
}

impl SupabaseAuth {
    pub fn new(base_url: &Url, api_key: &str, timeout: Duration) -> Result<Self, AppError> {
        let user_url = base_url
            .join(USER_PATH)
            .map_err(|e| AppError::Config(format!("Invalid identity URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            user_url,
            api_key: api_key.to_string(),
            http_client,
        })
    }

    pub fn user_url(&self) -> &Url {
        &self.user_url
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Timeout(format!("identity provider: {}", err))
    } else {
        AppError::Unreachable(format!("identity provider: {}", err))
    }
}

#[async_trait]
impl IdentityVerifier for SupabaseAuth {
    async fn verify(&self, token: &str) -> Result<Viewer, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::Unauthenticated("empty bearer token".to_string()));
        }

        let response = self
            .http_client
            .get(self.user_url.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Identity provider request failed: {}", e);
                transport_error(e)
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Unauthenticated(format!("token rejected ({})", status)));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Identity provider error: {} - {}", status, body);
            return Err(AppError::Unreachable(format!("identity provider returned {}", status)));
        }

        let user: SupabaseUser = response
            .json()
            .await
            .map_err(|e| AppError::Unauthenticated(format!("Failed to parse user info: {}", e)))?;

        Ok(Viewer::new(user.id, user.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_url() {
        let base = Url::parse("https://project.supabase.co/").unwrap();
        let auth = SupabaseAuth::new(&base, "anon", Duration::from_secs(1)).unwrap();
        assert_eq!(auth.user_url().as_str(), "https://project.supabase.co/auth/v1/user");
    }

    #[tokio::test]
    async fn test_blank_token_is_rejected_locally() {
        let base = Url::parse("https://project.supabase.co/").unwrap();
        let auth = SupabaseAuth::new(&base, "anon", Duration::from_secs(1)).unwrap();
        let err = auth.verify("   ").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthenticated(_)));
    }
}
