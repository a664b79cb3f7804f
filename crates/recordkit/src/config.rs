use crate::dialect::{Dialect, DialectKind};
use serde::{Deserialize, Serialize};

/// Configuration for [`Db`](crate::Db).
///
/// Deserializable so it can live in an application config file:
///
/// ```
/// use recordkit::{DbConfig, DialectKind};
///
/// let config: DbConfig = serde_json::from_str(r#"{"dialect": "oracle", "show_sql": true}"#)?;
/// assert_eq!(config.dialect, DialectKind::Oracle);
/// assert!(config.show_sql);
/// assert!(!config.dev_mode);
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DbConfig {
    /// SQL dialect used to generate statements.
    pub dialect: DialectKind,
    /// Emit each statement as a `debug` event under the `recordkit.sql` target.
    pub show_sql: bool,
    /// Include parameter values in SQL events.
    pub dev_mode: bool,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            dialect: DialectKind::Mysql,
            show_sql: false,
            dev_mode: false,
        }
    }
}

impl DbConfig {
    /// Create a new configuration with defaults (MySQL, no SQL logging).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Enable or disable SQL logging.
    pub fn show_sql(mut self, enabled: bool) -> Self {
        self.show_sql = enabled;
        self
    }

    /// Enable or disable development mode. Development mode also turns on SQL logging.
    pub fn dev_mode(mut self, enabled: bool) -> Self {
        self.dev_mode = enabled;
        if enabled {
            self.show_sql = true;
        }
        self
    }

    pub fn dialect(&self) -> &'static dyn Dialect {
        self.dialect.dialect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = DbConfig::new();
        assert_eq!(c.dialect, DialectKind::Mysql);
        assert!(!c.show_sql);
        assert!(!c.dev_mode);
        assert_eq!(c.dialect().name(), "MySQL");
    }

    #[test]
    fn builder() {
        let c = DbConfig::new()
            .with_dialect(DialectKind::Sqlite3)
            .dev_mode(true);
        assert!(c.show_sql);
        assert!(c.dev_mode);
        assert_eq!(c.dialect().name(), "SQLite");

        let c = c.show_sql(false);
        assert!(!c.show_sql);
    }

    #[test]
    fn deserialize_partial() {
        let c: DbConfig = serde_json::from_str(r#"{"dialect": "sqlite"}"#).unwrap();
        assert_eq!(c.dialect, DialectKind::Sqlite3);
        assert!(!c.show_sql);

        assert!(serde_json::from_str::<DbConfig>(r#"{"dialect": "db2"}"#).is_err());
    }
}
