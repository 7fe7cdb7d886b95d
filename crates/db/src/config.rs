/// Default upper bound on records returned by one paginated read.
pub const DEFAULT_TOTAL_QUERY_LIMIT: usize = 100_000;

/// State database configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateConfig {
    /// Whether rich (selector) queries are available.
    pub rich_query: bool,
    /// Cap applied to every page; also the page size used when the caller
    /// passes a non-positive one.
    pub total_query_limit: usize,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            rich_query: true,
            total_query_limit: DEFAULT_TOTAL_QUERY_LIMIT,
        }
    }
}

impl StateConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default  |
    /// |---------------------------|----------|
    /// | `STATE_RICH_QUERY`        | `true`   |
    /// | `STATE_TOTAL_QUERY_LIMIT` | `100000` |
    pub fn from_env() -> Self {
        let rich_query: bool = std::env::var("STATE_RICH_QUERY")
            .unwrap_or_else(|_| "true".into())
            .parse()
            .expect("STATE_RICH_QUERY must be 'true' or 'false'");

        let total_query_limit: usize = std::env::var("STATE_TOTAL_QUERY_LIMIT")
            .unwrap_or_else(|_| DEFAULT_TOTAL_QUERY_LIMIT.to_string())
            .parse()
            .expect("STATE_TOTAL_QUERY_LIMIT must be a valid usize");

        assert!(
            total_query_limit > 0,
            "STATE_TOTAL_QUERY_LIMIT must be greater than zero"
        );

        Self {
            rich_query,
            total_query_limit,
        }
    }

    /// Effective number of records for a requested page size.
    pub fn page_bound(&self, page_size: i32) -> usize {
        match usize::try_from(page_size) {
            Ok(n) if n > 0 => n.min(self.total_query_limit),
            _ => self.total_query_limit,
        }
    }
}
