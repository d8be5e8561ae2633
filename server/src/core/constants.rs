// =============================================================================
// GenAI Event Names
// =============================================================================

/// Per-call inference summary event
pub const EVENT_INFERENCE_DETAILS: &str = "gen_ai.inference.details";

/// Post-hoc evaluation by a judge
pub const EVENT_EVALUATION_RESULT: &str = "gen_ai.evaluation.result";

/// Log attribute carrying the event name
pub const EVENT_NAME_ATTR: &str = "event.name";

// =============================================================================
// GenAI Attribute Keys
// =============================================================================

pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";
pub const GEN_AI_SYSTEM: &str = "gen_ai.system";
pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";
pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";
pub const GEN_AI_REQUEST_TEMPERATURE: &str = "gen_ai.request.temperature";
pub const GEN_AI_REQUEST_TOP_P: &str = "gen_ai.request.top_p";
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";
pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";
pub const GEN_AI_INPUT_MESSAGES: &str = "gen_ai.input.messages";
pub const GEN_AI_OUTPUT_MESSAGES: &str = "gen_ai.output.messages";

// Evaluation attributes (only read for gen_ai.evaluation.result)
pub const GEN_AI_EVALUATION_NAME: &str = "gen_ai.evaluation.name";
pub const GEN_AI_EVALUATION_LABEL: &str = "gen_ai.evaluation.label";
pub const GEN_AI_EVALUATION_SCORE: &str = "gen_ai.evaluation.score";
pub const GEN_AI_EVALUATION_EXPLANATION: &str = "gen_ai.evaluation.explanation";

// =============================================================================
// Platform Overlay Attribute Keys
// =============================================================================

pub const BROKLE_CACHE_HIT: &str = "brokle.cache_hit";
pub const BROKLE_BATCH_MODE: &str = "brokle.batch_mode";
pub const BROKLE_USER_ID: &str = "brokle.user_id";
pub const BROKLE_SESSION_ID: &str = "brokle.session_id";

// =============================================================================
// Standard Semantic Convention Keys
// =============================================================================

pub const SERVICE_NAME: &str = "service.name";
pub const SESSION_ID: &str = "session.id";
pub const USER_ID: &str = "user.id";

// =============================================================================
// Archival Defaults
// =============================================================================

/// Content type for uploaded Parquet archives
pub const PARQUET_CONTENT_TYPE: &str = "application/x-parquet";

/// Compression codec recorded in blob references
pub const ARCHIVE_COMPRESSION: &str = "zstd";

/// Default archive compression level (zstd scale, clamped to 1..=22)
pub const DEFAULT_ARCHIVE_COMPRESSION_LEVEL: i32 = 3;
