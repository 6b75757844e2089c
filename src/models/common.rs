use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 失败响应中的错误信息
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiError {
    #[schema(example = "PRIZE_EXHAUSTED")]
    pub code: String,
    pub message: String,
}
