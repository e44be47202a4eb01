#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deployment {
    Development,
    #[default]
    Production,
}

impl Deployment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Deployment::Development => "development",
            Deployment::Production => "production",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Some(Deployment::Development),
            "production" | "prod" => Some(Deployment::Production),
            _ => None,
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            Deployment::Development => "http://localhost:8000/api/chat",
            Deployment::Production => "https://fleetworthy-sales-api.onrender.com/api/chat",
        }
    }
}
