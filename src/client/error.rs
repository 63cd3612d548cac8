// ==========================================
// 车行后台管理系统 - 远端服务客户端错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 远端服务客户端错误类型
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("请求发送失败: {0}")]
    HttpError(String),

    #[error("远端返回非成功状态: HTTP {0}")]
    BadStatus(u16),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    #[error("远端拒绝建档: {0}")]
    Rejected(String),

    #[error("记录不满足建档契约: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        ClientError::HttpError(err.to_string())
    }
}

/// Result 类型别名
pub type ClientResult<T> = Result<T, ClientError>;
