#[derive(Clone, Debug, PartialEq)]
pub enum Env {
    Dev,
    Staging,
    Production,
}

impl Env {
    pub fn from_env() -> Self {
        match var("ENVIRONMENT") {
            Ok(Some(env)) => Env::parse(&env),
            _ => Env::Dev,
        }
    }

    fn parse(env: &str) -> Self {
        match env {
            "dev" => Env::Dev,
            "staging" => Env::Staging,
            "production" => Env::Production,
            other => {
                tracing::warn!("Unknown environment `{other}`, falling back to dev");
                Env::Dev
            }
        }
    }
}

pub struct ServerConfig {
    pub env: Env,
    pub database_url: String,
    pub database_max_connections: usize,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_DATABASE_MAX_CONNECTIONS: usize = 10;

fn var(key: &str) -> Result<Option<String>, String> {
    match std::env::var(key) {
        Ok(env) => Ok(Some(env)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(std::env::VarError::NotUnicode(_)) => Err(format!(
            "Could not get the environment variable `{key}` due to unicode error"
        )),
    }
}

fn required_var(key: &str) -> String {
    let val = var(key);
    match val {
        Ok(val) => match val {
            Some(val) => val,
            None => {
                tracing::error!("Environment variable `{key}` is required");
                std::process::exit(1)
            }
        },
        Err(e) => {
            tracing::error!(
                "Environment variable `{key}` is required, but could not retrieve: {e}"
            );
            std::process::exit(1)
        }
    }
}

/// Reads `key` and parses it, falling back to `default` when it is absent or
/// unparsable.
fn parsed_var<T: std::str::FromStr>(key: &str, default: T) -> T {
    match var(key) {
        Ok(Some(val)) => val.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Environment variable `{key}` has invalid value `{val}`, using default");
            default
        }),
        Ok(None) => default,
        Err(e) => {
            tracing::warn!("{e}, using default");
            default
        }
    }
}

fn split_list(val: &str) -> Vec<String> {
    val.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl ServerConfig {
    pub fn new_from_env() -> Self {
        ServerConfig {
            env: Env::from_env(),
            database_url: required_var("DATABASE_URL"),
            database_max_connections: parsed_var(
                "DATABASE_MAX_CONNECTIONS",
                DEFAULT_DATABASE_MAX_CONNECTIONS,
            ),
            port: parsed_var("PORT", DEFAULT_PORT),
            cors_allowed_origins: match var("CORS_ALLOWED_ORIGINS") {
                Ok(Some(origins)) => split_list(&origins),
                _ => vec![],
            },
        }
    }
}
