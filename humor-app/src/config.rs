use crate::application::DEFAULT_GALLERY_PAGE_SIZE;
use humor_errors::AppError;
use std::fmt::Display;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: &str = "10";

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    /// `None` runs against the in-memory store.
    pub database_url: Option<String>,
    pub supabase_url: Url,
    pub supabase_anon_key: String,
    /// Single bounded wait for each store or identity call.
    pub request_timeout: Duration,
    pub gallery_page_size: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut supabase_url = Url::parse(&required(&var, "SUPABASE_URL")?)
            .map_err(|e| AppError::Config(format!("SUPABASE_URL: {}", e)))?;
        // `Url::join` replaces the last segment unless the base ends in a slash.
        if !supabase_url.path().ends_with('/') {
            let path = format!("{}/", supabase_url.path());
            supabase_url.set_path(&path);
        }

        let request_timeout_secs: u64 = parse_or(&var, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if request_timeout_secs == 0 {
            return Err(AppError::Config("REQUEST_TIMEOUT_SECS must be positive".to_string()));
        }

        let gallery_page_size: u64 = parse_or(&var, "GALLERY_PAGE_SIZE", &DEFAULT_GALLERY_PAGE_SIZE.to_string())?;
        if gallery_page_size == 0 {
            return Err(AppError::Config("GALLERY_PAGE_SIZE must be positive".to_string()));
        }

        Ok(Self {
            bind_addr: parse_or(&var, "BIND_ADDR", DEFAULT_BIND_ADDR)?,
            database_url: var("DATABASE_URL"),
            supabase_url,
            supabase_anon_key: required(&var, "SUPABASE_ANON_KEY")?,
            request_timeout: Duration::from_secs(request_timeout_secs),
            gallery_page_size,
        })
    }
}

fn required(var: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, AppError> {
    var(key).ok_or_else(|| AppError::Config(format!("{key} must be set")))
}

fn parse_or<T>(var: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = var(key).unwrap_or_else(|| {
        tracing::info!("{key} not set, using default: {default}");
        default.to_string()
    });
    raw.parse()
        .map_err(|e| AppError::Config(format!("Invalid {key} value {raw:?}: {e}")))
}
