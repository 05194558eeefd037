/// Database layer for the relational tools
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool shared by every operation
/// - `migrations`: Database creation and the embedded schema migration
///
/// # Example
///
/// ```no_run
/// use taskcat_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
