// ==========================================
// 食品成本核算系统 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型, 转换仓储/导出错误为用户可读的错误消息
// 说明: InvalidInput 的消息直接展示在前端表单上, 与界面文案保持一致
// ==========================================

use crate::export::error::ExportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 业务校验错误
    // ==========================================
    /// 输入校验失败（消息原样展示到界面, 不加前缀）
    #[error("{0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("存储错误: {0}")]
    StorageError(String),

    #[error("序列化失败: {0}")]
    SerializationError(String),

    // ==========================================
    // 配置 / 导出错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("报表导出失败: {0}")]
    ExportError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// 目的: 将仓储层的技术错误转换为用户可读的业务错误
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::Io(msg) => ApiError::StorageError(format!("文件读写失败: {}", msg)),
            RepositoryError::Csv(msg) => ApiError::StorageError(format!("CSV 解析失败: {}", msg)),
            RepositoryError::LockError(msg) => {
                ApiError::StorageError(format!("文件锁获取失败: {}", msg))
            }
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ExportError 转换
// ==========================================
impl From<ExportError> for ApiError {
    fn from(err: ExportError) -> Self {
        ApiError::ExportError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

// ==========================================
// 输入校验辅助函数
// 消息与原界面文案逐字一致, 供各 API 复用
// ==========================================

/// 必填字段校验（任一字段去空白后为空即拒绝）
///
/// # 参数
/// - fields: 待校验的原始输入
/// - message: 界面文案（原料页与核算页文案不同）
pub fn validate_required_fields(fields: &[&str], message: &str) -> ApiResult<()> {
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ApiError::InvalidInput(message.to_string()));
    }
    Ok(())
}

/// 解析原料数值三元组 (price, grams, grams_needed)
///
/// 零值与负值按存储策略放行, 只拒绝无法解析的输入
pub fn parse_numeric_fields(
    price: &str,
    grams: &str,
    grams_needed: &str,
) -> ApiResult<(f64, f64, f64)> {
    let parse = |raw: &str| raw.trim().parse::<f64>();
    match (parse(price), parse(grams), parse(grams_needed)) {
        (Ok(p), Ok(g), Ok(n)) => Ok((p, g, n)),
        _ => Err(ApiError::InvalidInput(
            "Price, Grams, and Grams Needed must be valid numbers".to_string(),
        )),
    }
}

/// 解析毛利率
///
/// 空输入回退默认值; 无法解析或负值拒绝（零毛利合法, 售价等于成本）
pub fn parse_margin_percent(raw: &str, default_percent: f64) -> ApiResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(default_percent);
    }

    let margin = trimmed.parse::<f64>().map_err(|_| {
        ApiError::InvalidInput("Margin percentage must be a valid number".to_string())
    })?;
    if margin < 0.0 {
        return Err(ApiError::InvalidInput(
            "Margin percentage must be positive".to_string(),
        ));
    }
    Ok(margin)
}
