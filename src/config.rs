use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub endpoint: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub region: String,
}

/// Room for the text fields and multipart framing around a single file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Upload limits, in bytes.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Logo size accepted at company registration.
    pub logo_max_bytes: usize,
    /// Logo size accepted when a company replaces its logo.
    pub logo_update_max_bytes: usize,
    /// Ceiling on a whole multipart body. Oversized files below it are
    /// drained and reported as field errors.
    pub form_max_bytes: usize,
}

impl UploadConfig {
    /// Body limit for a form carrying one file of at most `file_max` bytes.
    pub fn body_limit(&self, file_max: usize) -> usize {
        self.form_max_bytes.max(file_max + FORM_OVERHEAD_BYTES)
    }
}

/// Argon2id cost parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordCost {
    pub memory_kib: u32,
    pub iterations: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    pub uploads: UploadConfig,
    pub password: PasswordCost,
    pub token_ttl_minutes: i64,
    pub public_base_url: String,
    pub admin_seed: Option<AdminSeed>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "jobboard".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "jobboard-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES", 60),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES", 60 * 24 * 14),
        };
        let storage = StorageConfig {
            endpoint: std::env::var("MINIO_ENDPOINT")?,
            bucket: std::env::var("MINIO_BUCKET").unwrap_or_else(|_| "jobboard".into()),
            access_key: std::env::var("MINIO_ACCESS_KEY")?,
            secret_key: std::env::var("MINIO_SECRET_KEY")?,
            region: std::env::var("MINIO_REGION").unwrap_or_else(|_| "us-east-1".into()),
        };
        let uploads = UploadConfig {
            logo_max_bytes: env_parse("LOGO_MAX_BYTES", 1024 * 1024),
            logo_update_max_bytes: env_parse("LOGO_UPDATE_MAX_BYTES", 100 * 1024),
            form_max_bytes: env_parse("FORM_MAX_BYTES", 8 * 1024 * 1024),
        };
        let password = PasswordCost {
            memory_kib: env_parse("ARGON2_MEMORY_KIB", 19 * 1024),
            iterations: env_parse("ARGON2_ITERATIONS", 2),
        };
        let admin_seed = match (std::env::var("ADMIN_EMAIL"), std::env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(password)) => Some(AdminSeed { email, password }),
            _ => None,
        };
        Ok(Self {
            database_url,
            jwt,
            storage,
            uploads,
            password,
            token_ttl_minutes: env_parse("TOKEN_TTL_MINUTES", 60),
            public_base_url: std::env::var("PUBLIC_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),
            admin_seed,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
