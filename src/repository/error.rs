// ==========================================
// 食品成本核算系统 - 仓储层错误类型
// ==========================================
// 职责: 定义 CSV 档案仓储的错误类型
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    // ===== 档案记录错误 =====
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    // ===== 文件访问错误 =====
    #[error("IO 错误: {0}")]
    Io(String),

    #[error("CSV 解析失败: {0}")]
    Csv(String),

    #[error("文件锁获取失败: {0}")]
    LockError(String),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        RepositoryError::Io(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for RepositoryError {
    fn from(err: csv::Error) -> Self {
        RepositoryError::Csv(err.to_string())
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
