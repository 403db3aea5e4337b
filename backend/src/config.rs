use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "artifacts/budget_model.yaml";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub frontend_dir: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let manifest_dir = lookup("CARGO_MANIFEST_DIR");
        let frontend_dir = lookup("FRONTEND_DIR").unwrap_or_else(|| match &manifest_dir {
            Some(manifest_dir) => format!("{}/../frontend/dist", manifest_dir),
            None => "/usr/src/app/frontend/dist".to_string(),
        });
        // The shipped artifact lives next to the backend manifest.
        let model_path = lookup("MODEL_PATH").unwrap_or_else(|| match &manifest_dir {
            Some(manifest_dir) => format!("{}/{}", manifest_dir, DEFAULT_MODEL_PATH),
            None => DEFAULT_MODEL_PATH.to_string(),
        });

        Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: lookup("PORT")
                .and_then(|port| port.parse().ok())
                .unwrap_or(5001),
            model_path: model_path.into(),
            frontend_dir,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
