use std::path::PathBuf;

/// Source file used when nothing else is configured.
pub const DEFAULT_DATA_PATH: &str = "cleaned_data.csv";
/// Env var naming the source file.
pub const DATA_PATH_VAR: &str = "RETAIL_DASHBOARD_DATA";
/// Env var capping the rows shown in the data table (0 = no cap).
pub const TABLE_ROWS_VAR: &str = "RETAIL_DASHBOARD_TABLE_ROWS";
pub const DEFAULT_TABLE_ROWS: usize = 1000;

/// Startup settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    /// Maximum rows rendered in the data table; `None` renders all of them.
    pub table_row_limit: Option<usize>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            table_row_limit: Some(DEFAULT_TABLE_ROWS),
        }
    }
}

impl DashboardConfig {
    /// Read settings from the command line and the environment. Call
    /// `dotenvy::dotenv()` first if a `.env` file should be honoured.
    ///
    /// Precedence for the data path: first CLI argument, then
    /// `RETAIL_DASHBOARD_DATA`, then `cleaned_data.csv`.
    pub fn from_env() -> Self {
        Self::resolve(
            std::env::args().nth(1),
            std::env::var(DATA_PATH_VAR).ok(),
            std::env::var(TABLE_ROWS_VAR).ok(),
        )
    }

    fn resolve(arg: Option<String>, env_path: Option<String>, env_rows: Option<String>) -> Self {
        let data_path = arg
            .or(env_path)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        let table_row_limit = match env_rows.as_deref().map(str::trim) {
            None => Some(DEFAULT_TABLE_ROWS),
            Some(raw) => match raw.parse::<usize>() {
                Ok(0) => None,
                Ok(n) => Some(n),
                Err(_) => {
                    log::warn!("{TABLE_ROWS_VAR}='{raw}' is not a row count, using {DEFAULT_TABLE_ROWS}");
                    Some(DEFAULT_TABLE_ROWS)
                }
            },
        };

        DashboardConfig {
            data_path,
            table_row_limit,
        }
    }
}
