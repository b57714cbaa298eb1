use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub geoapi_url: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "pickup.db".to_string()),
            geoapi_url: env::var("GEOAPI_URL")
                .unwrap_or_else(|_| "https://json.geoapi.pt/municipios".to_string()),
        }
    }
}
