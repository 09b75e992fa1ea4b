#[derive(Debug)]
pub struct Config {
    pub bind_addr: String,
    pub public_base_url: String,
    pub db_connection_string: String,
    pub default_user_id: String,
}

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_DB_CONNECTION_STRING: &str = "sqlite://progress.sqlite?mode=rwc";
const DEFAULT_USER_ID: &str = "demo-user";

impl Config {
    pub fn load() -> Self {
        let bind_addr = std::env::var("BIND_ADDR").unwrap_or(DEFAULT_BIND_ADDR.into());
        let public_base_url =
            std::env::var("PUBLIC_BASE_URL").unwrap_or(DEFAULT_PUBLIC_BASE_URL.into());
        let db_connection_string =
            std::env::var("DB_CONNECTION_STRING").unwrap_or(DEFAULT_DB_CONNECTION_STRING.into());
        // Placeholder identity applied to GETs that carry no userId, until a
        // session layer in front of this service supplies real ones.
        let default_user_id = std::env::var("DEFAULT_USER_ID").unwrap_or(DEFAULT_USER_ID.into());
        Config {
            bind_addr,
            public_base_url,
            db_connection_string,
            default_user_id,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.bind_addr.is_empty() {
            return Err("BIND_ADDR is missing".into());
        }
        if self.db_connection_string.is_empty() {
            return Err("DB_CONNECTION_STRING is missing".into());
        }
        if self.default_user_id.trim().is_empty() {
            return Err("DEFAULT_USER_ID is missing".into());
        }
        Ok(())
    }
}
