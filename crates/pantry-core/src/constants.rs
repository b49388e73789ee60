/// Pantry — centralized constants.
/// Model names, endpoints and setting bounds live here.

// ─── Models ───────────────────────────────────────────────────────────────────

pub mod models {
    pub const MISTRAL_LARGE2: &str = "mistral-large2";
    pub const LLAMA3_1_70B: &str = "llama3.1-70b";
    pub const SNOWFLAKE_ARCTIC: &str = "snowflake-arctic";

    /// Models the chef may be switched to from the settings panel.
    pub const SUPPORTED_MODELS: &[&str] = &[MISTRAL_LARGE2, LLAMA3_1_70B, SNOWFLAKE_ARCTIC];
}

// ─── API Endpoints ────────────────────────────────────────────────────────────

pub mod endpoints {
    pub const STATEMENTS_PATH: &str = "/api/v2/statements";

    /// `{db}`, `{schema}` and `{service}` are substituted URL-encoded.
    pub const SEARCH_QUERY_PATH: &str =
        "/api/v2/databases/{db}/schemas/{schema}/cortex-search-services/{service}:query";
}

// ─── Default Settings ─────────────────────────────────────────────────────────

pub mod defaults {
    pub const DATABASE: &str = "cortex_search";
    pub const SCHEMA: &str = "public";
    pub const TOKEN_ENV: &str = "SNOWFLAKE_TOKEN";
    pub const TOKEN_TYPE: &str = "PROGRAMMATIC_ACCESS_TOKEN";
    pub const CONTEXT_CHUNK_COUNT: u8 = 5;
    pub const CHAT_MEMORY_LENGTH: u8 = 5;
    pub const REQUEST_TIMEOUT_SECS: u64 = 60;
    pub const DEFAULT_MODEL: &str = super::models::MISTRAL_LARGE2;
}

// ─── Limits ───────────────────────────────────────────────────────────────────

pub mod limits {
    /// Inclusive bounds shared by the context chunk count and chat memory length.
    pub const MIN_WINDOW: u8 = 1;
    pub const MAX_WINDOW: u8 = 10;
}
