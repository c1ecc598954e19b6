use std::env;

/// Where subscription records are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    File(std::path::PathBuf),
    Url(String),
}

impl SourceLocation {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else {
            Self::File(std::path::PathBuf::from(trimmed))
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Url(url) => url.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub source: SourceLocation,
    /// Rows revealed per "Show More" step in the subscription table.
    pub page_size: usize,
}

pub const DEFAULT_PAGE_SIZE: usize = 10;

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("VENDORLENS_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("VENDORLENS_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(7171),
            source: env::var("VENDORLENS_SOURCE")
                .map(|v| SourceLocation::parse(&v))
                .unwrap_or_else(|_| SourceLocation::File("data/subscriptions.json".into())),
            page_size: env::var("VENDORLENS_PAGE_SIZE")
                .ok()
                .and_then(|p| p.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
