// ==========================================
// 食品成本核算系统 - 配置管理器
// ==========================================
// 职责: 应用设置加载、查询、覆写管理
// 存储: 数据目录下 settings.json
// ==========================================

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

use crate::engine::costing::DEFAULT_MARGIN_PERCENT;
use crate::export::DEFAULT_REPORT_FILE_NAME;

/// 设置文件名
pub const SETTINGS_FILE_NAME: &str = "settings.json";

// ==========================================
// Settings - 应用设置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// 核算界面预填的默认毛利率 (%)
    #[serde(default = "default_margin_percent")]
    pub default_margin_percent: f64,

    /// 成本报表默认文件名
    #[serde(default = "default_export_file_name")]
    pub export_file_name: String,
}

fn default_margin_percent() -> f64 {
    DEFAULT_MARGIN_PERCENT
}

fn default_export_file_name() -> String {
    DEFAULT_REPORT_FILE_NAME.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_margin_percent: default_margin_percent(),
            export_file_name: default_export_file_name(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    settings_path: PathBuf,
    // 内存缓存, 避免每次读盘
    cached: Mutex<Settings>,
}

impl ConfigManager {
    /// 加载设置
    ///
    /// 文件缺失时使用默认设置（首次覆写时落盘）;
    /// 文件损坏时告警并回退默认设置, 不中断启动
    pub fn new(data_dir: &Path) -> Self {
        let settings_path = data_dir.join(SETTINGS_FILE_NAME);
        let settings = Self::load_or_default(&settings_path);

        Self {
            settings_path,
            cached: Mutex::new(settings),
        }
    }

    fn load_or_default(path: &Path) -> Settings {
        match std::fs::read_to_string(path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "设置文件格式错误, 使用默认设置"
                );
                Settings::default()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Settings::default(),
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "设置文件读取失败, 使用默认设置"
                );
                Settings::default()
            }
        }
    }

    /// 当前设置快照
    pub fn get_settings(&self) -> Result<Settings, Box<dyn Error>> {
        let cached = self
            .cached
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;
        Ok(cached.clone())
    }

    /// 覆写设置并落盘
    ///
    /// 取值校验由调用方负责, 此处只负责持久化
    pub fn update_settings(&self, settings: Settings) -> Result<Settings, Box<dyn Error>> {
        let mut cached = self
            .cached
            .lock()
            .map_err(|e| format!("锁获取失败: {}", e))?;

        let json = serde_json::to_string_pretty(&settings)?;
        if let Some(parent) = self.settings_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.settings_path, json)?;

        *cached = settings.clone();
        info!(path = %self.settings_path.display(), "设置已更新");
        Ok(settings)
    }

    /// 设置文件路径
    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }
}
