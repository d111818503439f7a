use dotenv::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    // Operator tooling only. Must never be bundled into an app build.
    pub service_role_key: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok();

        let supabase_url = env::var("SUPABASE_URL")
            .map_err(|_| anyhow::anyhow!("SUPABASE_URL must be set"))?
            .trim_end_matches('/')
            .to_string();

        let supabase_anon_key = env::var("SUPABASE_ANON_KEY")
            .map_err(|_| anyhow::anyhow!("SUPABASE_ANON_KEY must be set"))?;

        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY").ok();

        Ok(Config {
            supabase_url,
            supabase_anon_key,
            service_role_key,
        })
    }

    pub fn service_role_key(&self) -> anyhow::Result<&str> {
        self.service_role_key.as_deref().ok_or_else(|| {
            anyhow::anyhow!("SUPABASE_SERVICE_ROLE_KEY must be set to run operator tools")
        })
    }
}
