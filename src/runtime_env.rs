//! Peripheral message shapes that flow over pooled connections.
//!
//! These are not interpreted by the pool or the executor -- serialization and transport are out
//! of scope (SPEC_FULL.md §1) -- so they carry no (de)serialization derive. They exist here only
//! to document the shape of traffic a caller typically routes through [`crate::pool::Pool`].

pub struct GetOrCreateRuntimeEnvRequest {
    pub serialized_runtime_env: String,
    pub runtime_env_config: RuntimeEnvConfig,
    pub job_id: Vec<u8>,
    pub source_process: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvStatus {
    Ok,
    Failed,
}

pub struct GetOrCreateRuntimeEnvReply {
    pub status: RuntimeEnvStatus,
    pub error_message: String,
    pub serialized_runtime_env_context: String,
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeEnvConfig {
    pub setup_timeout_seconds: i64,
    pub eager_install: bool,
}

pub struct DeleteRuntimeEnvIfPossibleRequest {
    pub serialized_runtime_env: String,
    pub source_process: String,
}

pub struct DeleteRuntimeEnvIfPossibleReply {
    pub status: RuntimeEnvStatus,
    pub error_message: String,
}

pub struct GetRuntimeEnvsInfoRequest {
    pub limit: Option<i64>,
}

pub struct GetRuntimeEnvsInfoReply {
    pub states: Vec<RuntimeEnvState>,
    pub total: i64,
}

pub struct RuntimeEnvState {
    pub serialized_runtime_env: String,
    pub ref_cnt: u64,
}
