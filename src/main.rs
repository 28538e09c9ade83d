// ==========================================
// 食品成本核算系统 - Tauri 主入口
// ==========================================
// 技术栈: Tauri + Rust + CSV 档案
// ==========================================

// 禁止控制台窗口 (Windows)
#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

#[cfg(feature = "tauri-app")]
fn main() {
    use food_costing::app::tauri_commands::*;
    use food_costing::app::{get_default_data_dir, AppState};

    // 初始化日志系统
    food_costing::logging::init();
    food_costing::perf::init_from_env();

    tracing::info!("==================================================");
    tracing::info!("{}", food_costing::APP_NAME);
    tracing::info!("系统版本: {}", food_costing::VERSION);
    tracing::info!("==================================================");

    // 获取数据目录
    let data_dir = get_default_data_dir();
    tracing::info!("使用数据目录: {}", data_dir.display());

    // 创建AppState
    let app_state = match AppState::new(&data_dir) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("AppState初始化失败: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("启动Tauri应用...");

    // 启动Tauri应用
    tauri::Builder::default()
        .manage(app_state)
        .invoke_handler(tauri::generate_handler![
            // ==========================================
            // 原料相关命令 (5个)
            // ==========================================
            list_ingredients,
            search_ingredients,
            add_ingredient,
            update_ingredient,
            delete_ingredient,
            // ==========================================
            // 配方相关命令 (3个)
            // ==========================================
            list_recipes,
            search_recipes,
            delete_recipe,
            // ==========================================
            // 核算相关命令 (3个)
            // ==========================================
            calculate_recipe_cost,
            save_recipe_costing,
            export_costing_report,
            // ==========================================
            // 仪表盘 / 关于页命令 (2个)
            // ==========================================
            get_dashboard_summary,
            get_app_info,
            // ==========================================
            // 设置相关命令 (2个)
            // ==========================================
            get_settings,
            update_settings,
        ])
        .run(tauri::generate_context!())
        .expect("启动Tauri应用失败");

    tracing::info!("Tauri应用已退出");
}

#[cfg(not(feature = "tauri-app"))]
fn main() {
    use food_costing::app::get_default_data_dir;

    food_costing::logging::init();

    println!("==================================================");
    println!("{}", food_costing::APP_NAME);
    println!("系统版本: {}", food_costing::VERSION);
    println!("==================================================");
    println!();
    println!("此可执行文件需要启用 tauri-app 特性");
    println!("使用: cargo run --features tauri-app");
    println!();
    println!("或者使用库模式:");
    println!("use food_costing::app::AppState;");
    println!();
    println!("默认数据目录: {}", get_default_data_dir().display());
}
