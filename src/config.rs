#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub app_url: String,
    pub jwt_secret: String,
    pub jwt_maxage: i64,
    pub port: u16,
    // Upstream SMM provider (fulfillment is not wired in; see service/provider.rs)
    pub provider_api_url: String,
    pub provider_api_key: String,
}

impl Config {
    pub fn init() -> Config {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let jwt_secret = std::env::var("JWT_SECRET_KEY").expect("JWT_SECRET_KEY must be set");
        let jwt_maxage = std::env::var("JWT_MAXAGE").expect("JWT_MAXAGE must be set");
        let app_url = std::env::var("APP_URL").expect("APP_URL must be set");

        let provider_api_url = std::env::var("PROVIDER_API_URL")
            .unwrap_or_else(|_| "https://example-provider.com/api/v2".to_string());
        let provider_api_key = std::env::var("PROVIDER_API_KEY")
            .unwrap_or_else(|_| "".to_string());

        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8000);

        Config {
            database_url,
            app_url,
            jwt_secret,
            jwt_maxage: jwt_maxage.parse::<i64>().unwrap(),
            port,
            provider_api_url,
            provider_api_key,
        }
    }
}
