// ==========================================
// 食品成本核算系统 - CSV 档案读写
// ==========================================
// 职责: 档案文件的底层读写 + 表头版本管理
// 说明: 档案有两代表头:
//       - 旧版(v1): 原工具格式, 无 Record ID / 时间戳列
//       - 当前(v2): Record ID 开头, 末尾带审计时间列
//       旧版文件在仓储打开时一次性迁移; 无法识别的表头按
//       字段映射宽松读取, 在下一次写入时统一重写为当前表头
// 红线: 所有整文件写入先落临时文件再原子改名, 避免半写档案
// ==========================================

use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::Instant;

use crate::repository::error::{RepositoryError, RepositoryResult};

// ==========================================
// TableSchema - 档案表结构定义
// ==========================================

/// 一张 CSV 档案表的结构定义
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    /// 实体名（错误与日志用）
    pub entity: &'static str,
    /// 当前(v2)表头
    pub headers: &'static [&'static str],
    /// 旧版(v1)表头（原工具写出的格式）
    pub legacy_headers: &'static [&'static str],
}

/// 表头版本判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaVersion {
    /// 当前表头（含 Record ID 列）
    Current,
    /// 旧版表头（与 v1 完全一致）
    Legacy,
    /// 无法识别的表头（按字段映射宽松读取）
    Unknown,
}

// ==========================================
// 文件初始化与表头检查
// ==========================================

/// 确保档案文件存在; 不存在时按当前表头创建空档案
pub fn ensure_file(path: &Path, schema: &TableSchema) -> RepositoryResult<()> {
    if path.exists() {
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    let mut writer = WriterBuilder::new().from_writer(file);
    writer.write_record(schema.headers)?;
    writer.flush()?;

    tracing::info!(
        entity = schema.entity,
        path = %path.display(),
        "档案文件不存在, 已按当前表头创建"
    );
    Ok(())
}

/// 读取档案表头（文件缺失或空文件返回 None）
pub fn read_header(path: &Path) -> RepositoryResult<Option<Vec<String>>> {
    if !path.exists() {
        return Ok(None);
    }

    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    // 空文件的表头记录为空, 统一按无表头处理
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
        Ok(None)
    } else {
        Ok(Some(headers))
    }
}

/// 判定表头版本
pub fn detect_schema(header: &[String], schema: &TableSchema) -> SchemaVersion {
    let normalized: Vec<&str> = header.iter().map(|h| h.trim()).collect();

    // Record ID 列是当前表头的标志
    if normalized.contains(&schema.headers[0]) {
        return SchemaVersion::Current;
    }

    // 旧版: 与 v1 表头集合完全一致
    if normalized.len() == schema.legacy_headers.len()
        && schema.legacy_headers.iter().all(|h| normalized.contains(h))
    {
        return SchemaVersion::Legacy;
    }

    SchemaVersion::Unknown
}

/// 读取档案当前的表头版本
///
/// 文件缺失或表头为空按 Unknown 处理: 追加前必须先写入当前表头,
/// 否则首条记录会被后续读取当成表头吞掉
pub fn schema_version(path: &Path, schema: &TableSchema) -> RepositoryResult<SchemaVersion> {
    match read_header(path)? {
        Some(header) => Ok(detect_schema(&header, schema)),
        None => Ok(SchemaVersion::Unknown),
    }
}

// ==========================================
// 行级读写
// ==========================================

/// 读取全部数据行（表头 → 值 的映射; 跳过完全空白的行）
///
/// 文件缺失返回空列表, 读档不因缺文件报错
pub fn read_rows(path: &Path) -> RepositoryResult<Vec<HashMap<String, String>>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let started = Instant::now();
    let file = File::open(path)?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // 允许行长度不一致
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let mut row_map = HashMap::new();

        for (col_idx, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col_idx) {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }

        // 跳过完全空白的行
        if row_map.values().all(|v| v.is_empty()) {
            continue;
        }

        rows.push(row_map);
    }

    crate::perf::note_file_op("read", path, started.elapsed());
    Ok(rows)
}

/// 整文件重写（先写临时文件, 再原子改名覆盖）
pub fn write_rows(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> RepositoryResult<()> {
    let started = Instant::now();

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = match path.file_name() {
        Some(name) => {
            let mut tmp_name = name.to_os_string();
            tmp_name.push(".tmp");
            path.with_file_name(tmp_name)
        }
        None => {
            return Err(RepositoryError::Io(format!(
                "无效的档案路径: {}",
                path.display()
            )))
        }
    };

    {
        let file = File::create(&tmp_path)?;
        let mut writer = WriterBuilder::new().from_writer(file);
        writer.write_record(headers)?;
        for row in rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }

    std::fs::rename(&tmp_path, path)?;

    crate::perf::note_file_op("write", path, started.elapsed());
    Ok(())
}

/// 在档案末尾追加一行（要求文件已是当前表头）
pub fn append_row(path: &Path, row: &[String]) -> RepositoryResult<()> {
    let started = Instant::now();

    let file = OpenOptions::new().append(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(row)?;
    writer.flush()?;

    crate::perf::note_file_op("write", path, started.elapsed());
    Ok(())
}

// ==========================================
// 表头迁移
// ==========================================

/// 将档案按当前表头整体重写
///
/// map_row 负责把任意版本的行映射为当前表头顺序的值列表
/// （缺失的 Record ID / 时间戳在映射中补全）
///
/// 返回迁移的行数
pub fn rewrite_as_current<F>(
    path: &Path,
    schema: &TableSchema,
    map_row: F,
) -> RepositoryResult<usize>
where
    F: Fn(&HashMap<String, String>) -> Vec<String>,
{
    let rows = read_rows(path)?;
    let mapped: Vec<Vec<String>> = rows.iter().map(&map_row).collect();
    write_rows(path, schema.headers, &mapped)?;

    tracing::info!(
        entity = schema.entity,
        path = %path.display(),
        migrated_rows = mapped.len(),
        "档案已按当前表头重写"
    );
    Ok(mapped.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const TEST_SCHEMA: TableSchema = TableSchema {
        entity: "Ingredient",
        headers: &["Record ID", "Ingredient Name", "Price"],
        legacy_headers: &["Ingredient Name", "Price"],
    };

    #[test]
    fn test_ensure_file_creates_header_only_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingredients.csv");

        ensure_file(&path, &TEST_SCHEMA).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.trim(), "Record ID,Ingredient Name,Price");
        assert!(read_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn test_read_rows_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.csv");

        assert!(read_rows(&path).unwrap().is_empty());
    }

    #[test]
    fn test_write_and_read_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingredients.csv");

        write_rows(
            &path,
            TEST_SCHEMA.headers,
            &[vec!["id-1".to_string(), "Flour".to_string(), "2.5".to_string()]],
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("Ingredient Name"), Some(&"Flour".to_string()));
        assert_eq!(rows[0].get("Price"), Some(&"2.5".to_string()));

        // 临时文件不应残留
        assert!(!dir.path().join("ingredients.csv.tmp").exists());
    }

    #[test]
    fn test_read_rows_skips_blank_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingredients.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Record ID,Ingredient Name,Price").unwrap();
        writeln!(file, "id-1,Flour,2.5").unwrap();
        writeln!(file, ",,").unwrap();
        writeln!(file, "id-2,Sugar,3.0").unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_detect_schema_versions() {
        let current: Vec<String> = TEST_SCHEMA.headers.iter().map(|s| s.to_string()).collect();
        let legacy: Vec<String> = TEST_SCHEMA
            .legacy_headers
            .iter()
            .map(|s| s.to_string())
            .collect();
        let unknown = vec!["Name".to_string(), "Cost".to_string()];

        assert_eq!(detect_schema(&current, &TEST_SCHEMA), SchemaVersion::Current);
        assert_eq!(detect_schema(&legacy, &TEST_SCHEMA), SchemaVersion::Legacy);
        assert_eq!(detect_schema(&unknown, &TEST_SCHEMA), SchemaVersion::Unknown);
    }

    #[test]
    fn test_schema_version_missing_or_empty_file_is_unknown() {
        let dir = TempDir::new().unwrap();

        let missing = dir.path().join("missing.csv");
        assert_eq!(
            schema_version(&missing, &TEST_SCHEMA).unwrap(),
            SchemaVersion::Unknown
        );

        // 零字节文件同样没有表头, 直接追加会让首条记录被当成表头
        let empty = dir.path().join("empty.csv");
        File::create(&empty).unwrap();
        assert_eq!(
            schema_version(&empty, &TEST_SCHEMA).unwrap(),
            SchemaVersion::Unknown
        );
    }

    #[test]
    fn test_append_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingredients.csv");
        ensure_file(&path, &TEST_SCHEMA).unwrap();

        append_row(
            &path,
            &["id-1".to_string(), "Flour".to_string(), "2.5".to_string()],
        )
        .unwrap();
        append_row(
            &path,
            &["id-2".to_string(), "Sugar".to_string(), "3.0".to_string()],
        )
        .unwrap();

        let rows = read_rows(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("Record ID"), Some(&"id-2".to_string()));
    }

    #[test]
    fn test_rewrite_as_current_migrates_legacy_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ingredients.csv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Ingredient Name,Price").unwrap();
        writeln!(file, "Flour,2.5").unwrap();
        drop(file);

        let migrated = rewrite_as_current(&path, &TEST_SCHEMA, |row| {
            vec![
                "generated-id".to_string(),
                row.get("Ingredient Name").cloned().unwrap_or_default(),
                row.get("Price").cloned().unwrap_or_default(),
            ]
        })
        .unwrap();

        assert_eq!(migrated, 1);
        assert_eq!(
            schema_version(&path, &TEST_SCHEMA).unwrap(),
            SchemaVersion::Current
        );
        let rows = read_rows(&path).unwrap();
        assert_eq!(rows[0].get("Record ID"), Some(&"generated-id".to_string()));
    }
}
