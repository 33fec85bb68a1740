use std::path::Path;

use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use clap::Parser;

/// Runtime settings, read from flags or the environment.
#[derive(Debug, Clone, Parser)]
#[command(name = "todo-server", version, about = "REST API for an ordered todo list")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 8000)]
    pub port: u16,

    /// Store connection string (`sqlite://<path>`, `sqlite::memory:` or `memory://`)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://todos.db")]
    pub database_url: String,

    /// Browser origins allowed to call the API, comma separated
    #[arg(
        long,
        env = "ALLOWED_ORIGINS",
        value_delimiter = ',',
        default_value = "http://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn origin_headers(&self) -> Result<Vec<HeaderValue>, InvalidHeaderValue> {
        self.allowed_origins
            .iter()
            .map(|origin| origin.trim())
            .filter(|origin| !origin.is_empty())
            .map(HeaderValue::from_str)
            .collect()
    }
}

/// Load `.env` from the working directory or a parent. A missing file is
/// fine; a malformed one is an error, since dotenvy stops at the bad line and
/// leaves the file half-applied.
pub fn load_dotenv() -> Result<(), dotenvy::Error> {
    allow_missing(dotenvy::dotenv().map(drop))
}

/// Same as [`load_dotenv`] for an explicit file.
pub fn load_env_file(path: &Path) -> Result<(), dotenvy::Error> {
    allow_missing(dotenvy::from_path(path))
}

fn allow_missing(result: Result<(), dotenvy::Error>) -> Result<(), dotenvy::Error> {
    match result {
        Err(err) if err.not_found() => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_apply_without_flags() {
        let config = Config::try_parse_from(["todo-server"]).unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(config.listen_addr(), "127.0.0.1:8000");
        assert_eq!(config.allowed_origins, ["http://localhost:3000"]);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "todo-server",
            "--port",
            "9090",
            "--database-url",
            "memory://",
            "--allowed-origins",
            "http://a.test,http://b.test",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.database_url, "memory://");
        assert_eq!(config.allowed_origins, ["http://a.test", "http://b.test"]);
    }

    #[test]
    fn origin_headers_skip_blanks() {
        let config = Config::try_parse_from([
            "todo-server",
            "--allowed-origins",
            "http://a.test, ,http://b.test",
        ])
        .unwrap();
        let headers = config.origin_headers().unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers[1], "http://b.test");
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::try_parse_from(["todo-server", "--port", "http"]).is_err());
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_env_file(&dir.path().join(".env")).is_ok());
    }

    #[test]
    fn malformed_env_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "TODO_SERVER_TEST_PORT=9999").unwrap();
        writeln!(file, "TODO_SERVER_TEST_DATABASE_URL sqlite://prod.db").unwrap();

        let err = load_env_file(file.path()).unwrap_err();
        assert!(matches!(err, dotenvy::Error::LineParse(..)));
    }

    #[test]
    fn well_formed_env_file_is_applied() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "TODO_SERVER_TEST_ORIGINS=http://a.test").unwrap();

        load_env_file(file.path()).unwrap();
        assert_eq!(
            std::env::var("TODO_SERVER_TEST_ORIGINS").unwrap(),
            "http://a.test"
        );
    }
}
