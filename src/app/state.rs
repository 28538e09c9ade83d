// ==========================================
// 食品成本核算系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::api::{CalculatorApi, DashboardApi, IngredientApi, RecipeApi};
use crate::config::config_manager::ConfigManager;
use crate::repository::{IngredientRepository, RecipeRepository};

/// 应用状态
///
/// 包含所有API实例和共享资源
/// 在Tauri应用中作为全局状态管理
pub struct AppState {
    /// 数据目录
    pub data_dir: PathBuf,

    /// 原料API
    pub ingredient_api: Arc<IngredientApi>,

    /// 配方API
    pub recipe_api: Arc<RecipeApi>,

    /// 核算API
    pub calculator_api: Arc<CalculatorApi>,

    /// 仪表盘API
    pub dashboard_api: Arc<DashboardApi>,

    /// 配置管理器
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的AppState实例
    ///
    /// # 参数
    /// - data_dir: 数据目录（两份档案 + settings.json 所在目录）
    ///
    /// # 说明
    /// 该方法会：
    /// 1. 初始化两份档案仓储（缺失时建表头文件）
    /// 2. 加载应用设置
    /// 3. 创建所有API实例
    pub fn new(data_dir: &Path) -> Result<Self, String> {
        tracing::info!("初始化AppState, 数据目录: {}", data_dir.display());

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let ingredient_repo = Arc::new(
            IngredientRepository::new(data_dir)
                .map_err(|e| format!("无法创建IngredientRepository: {}", e))?,
        );
        let recipe_repo = Arc::new(
            RecipeRepository::new(data_dir)
                .map_err(|e| format!("无法创建RecipeRepository: {}", e))?,
        );

        // 配置管理器（缺失/损坏回退默认设置, 不阻塞启动）
        let config_manager = Arc::new(ConfigManager::new(data_dir));

        // ==========================================
        // 初始化API层
        // ==========================================
        let ingredient_api = Arc::new(IngredientApi::new(ingredient_repo.clone()));
        let recipe_api = Arc::new(RecipeApi::new(recipe_repo.clone()));
        let calculator_api = Arc::new(CalculatorApi::new(
            ingredient_repo.clone(),
            recipe_repo.clone(),
            config_manager.clone(),
        ));
        let dashboard_api = Arc::new(DashboardApi::new(
            ingredient_repo,
            recipe_repo,
            data_dir,
        ));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            ingredient_api,
            recipe_api,
            calculator_api,
            dashboard_api,
            config_manager,
        })
    }
}

/// 获取默认数据目录
///
/// 解析顺序:
/// 1. 环境变量 FOOD_COSTING_DATA_DIR（调试/测试/CI 显式指定）
/// 2. 用户数据目录下 food-costing（Debug 构建用 food-costing-dev, 避免污染生产数据）
/// 3. 兜底当前目录 ./food_costing_data
pub fn get_default_data_dir() -> PathBuf {
    if let Ok(path) = std::env::var("FOOD_COSTING_DATA_DIR") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    // 使用用户数据目录, 避免开发期档案文件变化触发 `tauri dev` 的文件监控重启
    if let Some(data_dir) = dirs::data_dir() {
        #[cfg(debug_assertions)]
        let path = data_dir.join("food-costing-dev");

        #[cfg(not(debug_assertions))]
        let path = data_dir.join("food-costing");

        std::fs::create_dir_all(&path).ok();
        return path;
    }

    PathBuf::from("./food_costing_data")
}
