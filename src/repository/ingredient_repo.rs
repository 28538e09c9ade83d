// ==========================================
// 食品成本核算系统 - 原料档案仓储
// ==========================================
// 职责: 管理 ingredients.csv (原料档案)
// 说明: 档案按整文件读 + 整文件重写维护, 新增走追加;
//       记录一律按 Record ID 定位, 不使用列表位置
// ==========================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::ingredient::Ingredient;
use crate::repository::csv_io::{self, SchemaVersion, TableSchema};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::field_map;

/// 原料档案文件名
pub const INGREDIENTS_FILE_NAME: &str = "ingredients.csv";

/// 原料档案表结构（当前表头 + 原工具旧版表头）
const SCHEMA: TableSchema = TableSchema {
    entity: "Ingredient",
    headers: &[
        "Record ID",
        "Ingredient Name",
        "Price",
        "Grams",
        "Price per Gram",
        "Grams Needed",
        "Cost per Recipe",
        "Created At",
        "Updated At",
    ],
    legacy_headers: &[
        "Ingredient Name",
        "Price",
        "Grams",
        "Price per Gram",
        "Grams Needed in Recipe",
        "Cost per Recipe",
    ],
};

pub struct IngredientRepository {
    file_path: PathBuf,
    // 同一进程内串行化文件访问
    file_lock: Mutex<()>,
}

impl IngredientRepository {
    /// 打开原料档案
    ///
    /// 文件缺失时按当前表头创建; 旧版(v1)表头在此处一次性迁移
    pub fn new(data_dir: &Path) -> RepositoryResult<Self> {
        let file_path = data_dir.join(INGREDIENTS_FILE_NAME);
        csv_io::ensure_file(&file_path, &SCHEMA)?;

        if csv_io::schema_version(&file_path, &SCHEMA)? == SchemaVersion::Legacy {
            csv_io::rewrite_as_current(&file_path, &SCHEMA, row_to_current)?;
        }

        Ok(Self {
            file_path,
            file_lock: Mutex::new(()),
        })
    }

    /// 档案文件路径
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> RepositoryResult<std::sync::MutexGuard<'_, ()>> {
        self.file_lock
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 新增原料（追加写入）
    ///
    /// 派生字段在实体构造时重算, 调用方传入的派生值一律忽略
    pub fn add(
        &self,
        name: String,
        price: f64,
        grams: f64,
        grams_needed: f64,
    ) -> RepositoryResult<Ingredient> {
        let _guard = self.lock()?;
        let ingredient = Ingredient::new(name, price, grams, grams_needed);

        // 无法识别的表头先统一重写为当前表头, 再追加
        if csv_io::schema_version(&self.file_path, &SCHEMA)? != SchemaVersion::Current {
            csv_io::rewrite_as_current(&self.file_path, &SCHEMA, row_to_current)?;
        }
        csv_io::append_row(&self.file_path, &to_row(&ingredient))?;
        Ok(ingredient)
    }

    /// 读取全部原料（保持档案内顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Ingredient>> {
        let _guard = self.lock()?;
        self.read_entities()
    }

    /// 按记录ID查找
    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<Ingredient>> {
        let _guard = self.lock()?;
        Ok(self
            .read_entities()?
            .into_iter()
            .find(|i| i.record_id == record_id))
    }

    /// 按名称精确查找（大小写敏感, 重名时返回第一条）
    ///
    /// 保存配方时用于判断计算行是否需要补录入档
    pub fn find_by_exact_name(&self, name: &str) -> RepositoryResult<Option<Ingredient>> {
        let _guard = self.lock()?;
        Ok(self.read_entities()?.into_iter().find(|i| i.name == name))
    }

    /// 按记录ID更新原始字段并重算派生字段（整文件重写）
    pub fn update(
        &self,
        record_id: &str,
        name: String,
        price: f64,
        grams: f64,
        grams_needed: f64,
    ) -> RepositoryResult<Ingredient> {
        let _guard = self.lock()?;
        let mut entities = self.read_entities()?;

        let target = entities
            .iter_mut()
            .find(|i| i.record_id == record_id)
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "Ingredient".to_string(),
                id: record_id.to_string(),
            })?;

        target.apply_update(name, price, grams, grams_needed);
        let updated = target.clone();

        self.write_entities(&entities)?;
        Ok(updated)
    }

    /// 按记录ID删除（整文件重写）
    ///
    /// 未命中任何记录时返回 NotFound, 档案保持不变
    pub fn delete(&self, record_id: &str) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut entities = self.read_entities()?;

        let before = entities.len();
        entities.retain(|i| i.record_id != record_id);
        if entities.len() == before {
            return Err(RepositoryError::NotFound {
                entity: "Ingredient".to_string(),
                id: record_id.to_string(),
            });
        }

        self.write_entities(&entities)
    }

    /// 名称模糊检索（大小写无关子串; 空查询返回全部）
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Ingredient>> {
        let entities = self.list_all()?;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(entities);
        }

        Ok(entities
            .into_iter()
            .filter(|i| i.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// 档案记录总数
    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(self.list_all()?.len())
    }

    fn read_entities(&self) -> RepositoryResult<Vec<Ingredient>> {
        let rows = csv_io::read_rows(&self.file_path)?;
        Ok(rows.iter().map(row_to_ingredient).collect())
    }

    fn write_entities(&self, entities: &[Ingredient]) -> RepositoryResult<()> {
        let rows: Vec<Vec<String>> = entities.iter().map(to_row).collect();
        csv_io::write_rows(&self.file_path, SCHEMA.headers, &rows)
    }
}

// ==========================================
// 行映射
// ==========================================

/// 行数据 → 原料实体（任意版本表头, 按字段映射宽松读取）
fn row_to_ingredient(row: &HashMap<String, String>) -> Ingredient {
    Ingredient {
        record_id: field_map::get_string(row, &["Record ID"]),
        name: field_map::get_string(row, &["Ingredient Name", "Name"]),
        price: field_map::get_f64(row, &["Price"]),
        grams: field_map::get_f64(row, &["Grams"]),
        grams_needed: field_map::get_f64(row, &["Grams Needed", "Grams Needed in Recipe"]),
        price_per_gram: field_map::get_f64(row, &["Price per Gram"]),
        cost_per_recipe: field_map::get_f64(row, &["Cost per Recipe"]),
        created_at: field_map::get_string(row, &["Created At"]),
        updated_at: field_map::get_string(row, &["Updated At"]),
    }
}

/// 任意版本的行 → 当前表头顺序的值列表
///
/// 迁移口径: 缺失的 Record ID / 时间戳补全, 派生字段统一重算
fn row_to_current(row: &HashMap<String, String>) -> Vec<String> {
    let mut ingredient = row_to_ingredient(row);

    if ingredient.record_id.trim().is_empty() {
        ingredient.record_id = Uuid::new_v4().to_string();
    }
    let now = chrono::Local::now()
        .format("%Y-%m-%d %H:%M:%S")
        .to_string();
    if ingredient.created_at.trim().is_empty() {
        ingredient.created_at = now.clone();
    }
    if ingredient.updated_at.trim().is_empty() {
        ingredient.updated_at = now;
    }
    ingredient.recompute_derived();

    to_row(&ingredient)
}

/// 原料实体 → 当前表头顺序的值列表
fn to_row(ingredient: &Ingredient) -> Vec<String> {
    vec![
        ingredient.record_id.clone(),
        ingredient.name.clone(),
        ingredient.price.to_string(),
        ingredient.grams.to_string(),
        ingredient.price_per_gram.to_string(),
        ingredient.grams_needed.to_string(),
        ingredient.cost_per_recipe.to_string(),
        ingredient.created_at.clone(),
        ingredient.updated_at.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TempDir, IngredientRepository) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo =
            IngredientRepository::new(dir.path()).expect("Failed to create test repository");
        (dir, repo)
    }

    #[test]
    fn test_add_and_list() {
        let (_dir, repo) = setup_test_repo();

        let added = repo
            .add("Flour".to_string(), 2.50, 1000.0, 250.0)
            .expect("Failed to add");

        assert_eq!(added.price_per_gram, 0.0025);
        assert_eq!(added.cost_per_recipe, 0.63);

        let all = repo.list_all().expect("Failed to list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record_id, added.record_id);
        assert_eq!(all[0].name, "Flour");
    }

    #[test]
    fn test_add_accepts_zero_grams() {
        let (_dir, repo) = setup_test_repo();

        let added = repo
            .add("Water".to_string(), 1.0, 0.0, 50.0)
            .expect("Failed to add");

        assert_eq!(added.price_per_gram, 0.0);
        assert_eq!(added.cost_per_recipe, 0.0);
        assert_eq!(repo.count().expect("Failed to count"), 1);
    }

    #[test]
    fn test_update_recomputes_derived() {
        let (_dir, repo) = setup_test_repo();
        let added = repo
            .add("Sugar".to_string(), 3.00, 1000.0, 100.0)
            .expect("Failed to add");

        let updated = repo
            .update(&added.record_id, "Sugar".to_string(), 4.00, 500.0, 100.0)
            .expect("Failed to update");

        assert_eq!(updated.price_per_gram, 0.008);
        assert_eq!(updated.cost_per_recipe, 0.8);
        assert_eq!(updated.created_at, added.created_at);

        let reread = repo
            .find_by_id(&added.record_id)
            .expect("Failed to find")
            .expect("Record missing");
        assert_eq!(reread.price, 4.00);
        assert_eq!(reread.price_per_gram, 0.008);
    }

    #[test]
    fn test_update_unknown_id_not_found() {
        let (_dir, repo) = setup_test_repo();
        repo.add("Sugar".to_string(), 3.00, 1000.0, 100.0)
            .expect("Failed to add");

        let result = repo.update("no-such-id", "X".to_string(), 1.0, 1.0, 1.0);
        assert!(matches!(
            result,
            Err(RepositoryError::NotFound { .. })
        ));
    }

    #[test]
    fn test_delete_unknown_id_leaves_file_unchanged() {
        let (_dir, repo) = setup_test_repo();
        repo.add("Flour".to_string(), 2.50, 1000.0, 250.0)
            .expect("Failed to add");
        let before = std::fs::read_to_string(repo.file_path()).expect("Failed to read file");

        let result = repo.delete("no-such-id");

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        let after = std::fs::read_to_string(repo.file_path()).expect("Failed to read file");
        assert_eq!(before, after);
    }

    #[test]
    fn test_delete_by_id() {
        let (_dir, repo) = setup_test_repo();
        let a = repo
            .add("Flour".to_string(), 2.50, 1000.0, 250.0)
            .expect("Failed to add");
        let b = repo
            .add("Sugar".to_string(), 3.00, 1000.0, 100.0)
            .expect("Failed to add");

        repo.delete(&a.record_id).expect("Failed to delete");

        let all = repo.list_all().expect("Failed to list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record_id, b.record_id);
    }

    #[test]
    fn test_search_case_insensitive_and_empty_query() {
        let (_dir, repo) = setup_test_repo();
        repo.add("Flour".to_string(), 2.50, 1000.0, 250.0)
            .expect("Failed to add");
        repo.add("Brown Sugar".to_string(), 4.00, 500.0, 100.0)
            .expect("Failed to add");
        repo.add("Eggs".to_string(), 4.50, 600.0, 120.0)
            .expect("Failed to add");

        let hits = repo.search("sug").expect("Failed to search");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Brown Sugar");

        let all = repo.search("   ").expect("Failed to search");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_duplicate_names_allowed() {
        let (_dir, repo) = setup_test_repo();
        repo.add("Flour".to_string(), 2.50, 1000.0, 250.0)
            .expect("Failed to add");
        repo.add("Flour".to_string(), 3.00, 1000.0, 250.0)
            .expect("Failed to add");

        let all = repo.list_all().expect("Failed to list");
        assert_eq!(all.len(), 2);

        // 精确查找返回第一条
        let first = repo
            .find_by_exact_name("Flour")
            .expect("Failed to find")
            .expect("Record missing");
        assert_eq!(first.price, 2.50);
    }

    #[test]
    fn test_find_by_exact_name_is_case_sensitive() {
        let (_dir, repo) = setup_test_repo();
        repo.add("Flour".to_string(), 2.50, 1000.0, 250.0)
            .expect("Failed to add");

        assert!(repo
            .find_by_exact_name("flour")
            .expect("Failed to find")
            .is_none());
    }

    #[test]
    fn test_legacy_file_migrated_on_open() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(INGREDIENTS_FILE_NAME);
        let mut file = std::fs::File::create(&path).expect("Failed to create file");
        writeln!(
            file,
            "Ingredient Name,Price,Grams,Price per Gram,Grams Needed in Recipe,Cost per Recipe"
        )
        .expect("write");
        writeln!(file, "Flour,2.5,1000,0.0025,250,0.63").expect("write");
        writeln!(file, "Sugar,3.0,1000,0.003,100,0.3").expect("write");
        drop(file);

        let repo = IngredientRepository::new(dir.path()).expect("Failed to open repository");
        let all = repo.list_all().expect("Failed to list");

        assert_eq!(all.len(), 2);
        assert!(!all[0].record_id.is_empty());
        assert_ne!(all[0].record_id, all[1].record_id);
        assert_eq!(all[0].name, "Flour");
        // 旧版 "Grams Needed in Recipe" 列迁移到 "Grams Needed"
        assert_eq!(all[0].grams_needed, 250.0);
        assert_eq!(all[0].price_per_gram, 0.0025);
        assert!(!all[0].created_at.is_empty());

        // 迁移后表头应为当前版本
        let header = std::fs::read_to_string(&path).expect("Failed to read file");
        assert!(header.starts_with("Record ID,"));
    }
}
