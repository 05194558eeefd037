/// Configuration management for the taskcat tools
///
/// Connection parameters are read from the environment. Nothing that
/// identifies a server or carries a credential has a default: a missing
/// `DATABASE_URL` or `MONGODB_URI` fails startup instead of silently
/// connecting somewhere.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: PostgreSQL connection string (required by the relational tools)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `MONGODB_URI`: MongoDB connection string (required by the cats tool)
/// - `MONGODB_DATABASE`: Database holding the cats collection (required)
/// - `MONGODB_COLLECTION`: Collection name (default: cats)
/// - `SEED_USERS`, `SEED_USERS_WITH_TASKS`, `SEED_TASKS_PER_USER`: Seeding volume
/// - `RUST_LOG`: Log level (default: warn)
///
/// # Example
///
/// ```no_run
/// use taskcat_shared::config::DatabaseSettings;
///
/// # fn example() -> anyhow::Result<()> {
/// let settings = DatabaseSettings::from_env()?;
/// println!("Pool size: {}", settings.max_connections);
/// # Ok(())
/// # }
/// ```

use crate::db::pool::DatabaseConfig;
use std::env;
use std::str::FromStr;

/// Relational store settings
#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in pool
    pub max_connections: u32,
}

/// Document store settings
#[derive(Debug, Clone)]
pub struct MongoSettings {
    /// MongoDB connection string
    pub uri: String,

    /// Database name
    pub database: String,

    /// Collection holding cat documents
    pub collection: String,
}

/// How much fake data the seeder inserts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedSettings {
    /// Number of users to create
    pub users: usize,

    /// How many of those users receive tasks
    pub users_with_tasks: usize,

    /// Tasks created per user that receives tasks
    pub tasks_per_user: usize,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            users: 15,
            users_with_tasks: 10,
            tasks_per_user: 10,
        }
    }
}

/// Loads `.env` if present (for development)
fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn required<F>(lookup: &F, key: &str) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(anyhow::anyhow!("{} environment variable is required", key)),
    }
}

fn parsed_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", key, raw, e)),
        None => Ok(default),
    }
}

impl DatabaseSettings {
    /// Loads relational settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or
    /// `DATABASE_MAX_CONNECTIONS` is not a number.
    pub fn from_env() -> anyhow::Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads relational settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = required(&lookup, "DATABASE_URL")?;
        let max_connections = parsed_or(&lookup, "DATABASE_MAX_CONNECTIONS", 5u32)?;

        if max_connections == 0 {
            anyhow::bail!("DATABASE_MAX_CONNECTIONS must be at least 1");
        }

        Ok(Self {
            url,
            max_connections,
        })
    }

    /// Builds the pool configuration for these settings
    ///
    /// A CLI is a single sequential client, so no idle connections are kept warm.
    pub fn pool_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: 0,
            ..Default::default()
        }
    }
}

impl MongoSettings {
    /// Loads document store settings from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if `MONGODB_URI` or `MONGODB_DATABASE` is missing.
    pub fn from_env() -> anyhow::Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads document store settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let uri = required(&lookup, "MONGODB_URI")?;
        let database = required(&lookup, "MONGODB_DATABASE")?;
        let collection = lookup("MONGODB_COLLECTION")
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "cats".to_string());

        Ok(Self {
            uri,
            database,
            collection,
        })
    }
}

impl SeedSettings {
    /// Loads seeding volume from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        load_dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads seeding volume through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let users = parsed_or(&lookup, "SEED_USERS", defaults.users)?;
        let users_with_tasks =
            parsed_or(&lookup, "SEED_USERS_WITH_TASKS", defaults.users_with_tasks)?;
        let tasks_per_user = parsed_or(&lookup, "SEED_TASKS_PER_USER", defaults.tasks_per_user)?;

        if users_with_tasks > users {
            anyhow::bail!(
                "SEED_USERS_WITH_TASKS ({}) cannot exceed SEED_USERS ({})",
                users_with_tasks,
                users
            );
        }

        Ok(Self {
            users,
            users_with_tasks,
            tasks_per_user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_database_url_is_required() {
        let err = DatabaseSettings::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_database_settings_defaults() {
        let settings =
            DatabaseSettings::from_lookup(lookup_from(&[("DATABASE_URL", "postgresql://h/db")]))
                .unwrap();
        assert_eq!(settings.url, "postgresql://h/db");
        assert_eq!(settings.max_connections, 5);

        let pool = settings.pool_config();
        assert_eq!(pool.url, "postgresql://h/db");
        assert_eq!(pool.max_connections, 5);
        assert_eq!(pool.min_connections, 0);
    }

    #[test]
    fn test_database_settings_rejects_bad_pool_size() {
        let err = DatabaseSettings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://h/db"),
            ("DATABASE_MAX_CONNECTIONS", "many"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("DATABASE_MAX_CONNECTIONS"));

        let err = DatabaseSettings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgresql://h/db"),
            ("DATABASE_MAX_CONNECTIONS", "0"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_mongo_settings_require_uri_and_database() {
        let err = MongoSettings::from_lookup(lookup_from(&[("MONGODB_DATABASE", "goit")]))
            .unwrap_err();
        assert!(err.to_string().contains("MONGODB_URI"));

        let err = MongoSettings::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://h")]))
            .unwrap_err();
        assert!(err.to_string().contains("MONGODB_DATABASE"));

        let empty = MongoSettings::from_lookup(lookup_from(&[
            ("MONGODB_URI", "  "),
            ("MONGODB_DATABASE", "goit"),
        ]));
        assert!(empty.is_err());
    }

    #[test]
    fn test_mongo_collection_defaults_to_cats() {
        let settings = MongoSettings::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://h"),
            ("MONGODB_DATABASE", "goit"),
        ]))
        .unwrap();
        assert_eq!(settings.collection, "cats");

        let settings = MongoSettings::from_lookup(lookup_from(&[
            ("MONGODB_URI", "mongodb://h"),
            ("MONGODB_DATABASE", "goit"),
            ("MONGODB_COLLECTION", "kittens"),
        ]))
        .unwrap();
        assert_eq!(settings.collection, "kittens");
    }

    #[test]
    fn test_seed_settings() {
        assert_eq!(
            SeedSettings::from_lookup(lookup_from(&[])).unwrap(),
            SeedSettings::default()
        );

        let settings = SeedSettings::from_lookup(lookup_from(&[
            ("SEED_USERS", "3"),
            ("SEED_USERS_WITH_TASKS", "2"),
            ("SEED_TASKS_PER_USER", "4"),
        ]))
        .unwrap();
        assert_eq!(settings.users, 3);
        assert_eq!(settings.users_with_tasks, 2);
        assert_eq!(settings.tasks_per_user, 4);

        let err = SeedSettings::from_lookup(lookup_from(&[
            ("SEED_USERS", "1"),
            ("SEED_USERS_WITH_TASKS", "2"),
        ]))
        .unwrap_err();
        assert!(err.to_string().contains("cannot exceed"));
    }
}
