// ==========================================
// 食品成本核算系统 - Tauri 命令（按域拆分）
// ==========================================
// 职责: Tauri 命令定义,连接前端与后端 API
// ==========================================

#![cfg(feature = "tauri-app")]

mod calculator;
mod common;
mod config;
mod dashboard;
mod ingredient;
mod recipe;

pub use calculator::*;
pub use config::*;
pub use dashboard::*;
pub use ingredient::*;
pub use recipe::*;
