use std::env;

/// Environment configuration
/// Loads and validates environment variables
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub frontend_url: String,
    pub port: u16,
    pub smtp: SmtpConfig,
    pub uploads: UploadConfig,
}

pub struct SmtpConfig {
    pub host: String,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

pub struct UploadConfig {
    pub cloud_name: String,
    pub upload_preset: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;

        // Verification and reset links land on the front-end, which relays
        // the token back to the API.
        let frontend_url = env::var("FRONTEND_URL")
            .map_err(|_| "FRONTEND_URL must be set".to_string())?
            .trim_end_matches('/')
            .to_string();

        let port = env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| "PORT must be a valid port number".to_string())?;

        let smtp = SmtpConfig {
            host: env::var("SMTP_HOST").map_err(|_| "SMTP_HOST must be set".to_string())?,
            username: env::var("SMTP_USERNAME")
                .map_err(|_| "SMTP_USERNAME must be set".to_string())?,
            password: env::var("SMTP_PASSWORD")
                .map_err(|_| "SMTP_PASSWORD must be set".to_string())?,
            from_address: env::var("SMTP_FROM")
                .map_err(|_| "SMTP_FROM must be set".to_string())?,
        };

        let uploads = UploadConfig {
            cloud_name: env::var("CLOUDINARY_CLOUD_NAME")
                .map_err(|_| "CLOUDINARY_CLOUD_NAME must be set".to_string())?,
            upload_preset: env::var("CLOUDINARY_UPLOAD_PRESET")
                .map_err(|_| "CLOUDINARY_UPLOAD_PRESET must be set".to_string())?,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            frontend_url,
            port,
            smtp,
            uploads,
        })
    }
}
