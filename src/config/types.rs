use serde::Deserialize;

/// Main configuration structure for Feed-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default, rename = "source")]
    pub sources: Vec<SourceConfig>,
}

/// Termination policy for the collection loop
#[derive(Debug, Clone, Deserialize)]
pub struct CollectionConfig {
    /// Consecutive iterations without growth of the visible item count
    /// after which the feed is considered exhausted
    #[serde(rename = "stall-threshold", default = "default_stall_threshold")]
    pub stall_threshold: u32,

    /// Budget used when the request carries a target count
    #[serde(default = "BudgetConfig::targeted")]
    pub targeted: BudgetConfig,

    /// Budget used when the whole feed has to be collected
    #[serde(default = "BudgetConfig::exhaustive")]
    pub exhaustive: BudgetConfig,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            stall_threshold: default_stall_threshold(),
            targeted: BudgetConfig::targeted(),
            exhaustive: BudgetConfig::exhaustive(),
        }
    }
}

fn default_stall_threshold() -> u32 {
    2
}

/// Upper bounds on the work a single run may perform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct BudgetConfig {
    /// Maximum number of scroll/pagination steps
    #[serde(rename = "max-advances")]
    pub max_advances: u32,

    /// Wall-clock limit for the run (seconds)
    #[serde(rename = "time-budget-secs")]
    pub time_budget_secs: u64,
}

impl BudgetConfig {
    pub fn targeted() -> Self {
        Self {
            max_advances: 20,
            time_budget_secs: 60,
        }
    }

    pub fn exhaustive() -> Self {
        Self {
            max_advances: 40,
            time_budget_secs: 180,
        }
    }
}

/// HTTP client settings shared by all network sources
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_user_agent() -> String {
    format!("feed-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory that receives one CSV file per run
    #[serde(default = "default_output_directory")]
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

fn default_output_directory() -> String {
    "static".to_string()
}

/// HTTP front-end configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:10000".to_string()
}

/// Kind of feed a source reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// Paginated JSON search endpoint
    HttpJson,
    /// Local JSON fixture replayed page by page
    File,
}

/// A registered data source
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Identifier used in requests (e.g., "supplier_directory")
    pub id: String,

    /// Human-readable summary shown in source listings
    #[serde(default)]
    pub description: String,

    pub kind: SourceKind,

    /// Search endpoint for `http-json` sources
    pub endpoint: Option<String>,

    /// Fixture path for `file` sources
    pub path: Option<String>,

    #[serde(rename = "query-param", default = "default_query_param")]
    pub query_param: String,

    #[serde(rename = "page-param", default = "default_page_param")]
    pub page_param: String,

    #[serde(rename = "first-page", default = "default_first_page")]
    pub first_page: u32,

    /// Field holding the item array; the payload itself is the array if unset
    #[serde(rename = "items-field")]
    pub items_field: Option<String>,

    /// Payload field used as the raw item handle; position is used if unset
    #[serde(rename = "handle-field")]
    pub handle_field: Option<String>,

    /// Output columns, in order
    pub columns: Vec<String>,

    /// Columns that form the identity key for deduplication
    #[serde(rename = "key-fields")]
    pub key_fields: Vec<String>,

    /// Settle delay after each advance (milliseconds)
    #[serde(rename = "advance-delay-ms", default)]
    pub advance_delay_ms: u64,
}

fn default_query_param() -> String {
    "q".to_string()
}

fn default_page_param() -> String {
    "page".to_string()
}

fn default_first_page() -> u32 {
    1
}
