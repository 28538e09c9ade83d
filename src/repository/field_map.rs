// ==========================================
// 食品成本核算系统 - 字段映射
// ==========================================
// 职责: 漂移表头 → 标准字段映射 + 宽松类型转换
// 说明: 历史档案可能被手工编辑过, 读路径按
//       已知别名 → 大小写无关子串 → 默认值 三级回退
// ==========================================

use std::collections::HashMap;

/// 在行数据中定位一个逻辑字段的取值
///
/// 回退顺序:
/// 1. 按别名精确匹配表头
/// 2. 大小写无关的子串匹配（别名含于表头, 或表头含于别名）
/// 3. None（由调用方决定默认值）
pub fn find_field<'a>(row: &'a HashMap<String, String>, aliases: &[&str]) -> Option<&'a str> {
    // 精确匹配
    for alias in aliases {
        if let Some(v) = row.get(*alias) {
            return Some(v.as_str());
        }
    }

    // 模糊匹配: 大小写无关子串
    for alias in aliases {
        let alias_lower = alias.to_lowercase();
        for (header, v) in row {
            let header_lower = header.to_lowercase();
            if header_lower.contains(&alias_lower) || alias_lower.contains(&header_lower) {
                return Some(v.as_str());
            }
        }
    }

    None
}

/// 提取文本字段, 缺失时返回空字符串
pub fn get_string(row: &HashMap<String, String>, aliases: &[&str]) -> String {
    find_field(row, aliases).unwrap_or("").to_string()
}

/// 提取数值字段, 缺失或无法解析时返回 0.0
///
/// 解析失败会输出 warn 日志, 不中断读取（档案读取为宽松口径）
pub fn get_f64(row: &HashMap<String, String>, aliases: &[&str]) -> f64 {
    let raw = match find_field(row, aliases) {
        Some(v) => v.trim(),
        None => return 0.0,
    };
    if raw.is_empty() {
        return 0.0;
    }

    match raw.parse::<f64>() {
        Ok(v) => v,
        Err(_) => {
            tracing::warn!(
                field = aliases[0],
                raw_value = raw,
                "数值字段无法解析, 按 0.0 处理"
            );
            0.0
        }
    }
}
