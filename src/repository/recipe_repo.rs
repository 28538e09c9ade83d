// ==========================================
// 食品成本核算系统 - 配方档案仓储
// ==========================================
// 职责: 管理 recipes.csv (配方成本快照档案)
// 说明: 配方保存的是计算时点的成本快照, 原料后续变动
//       不回写已保存配方; 记录按 Record ID 定位
// ==========================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use crate::domain::costing::CostingBreakdown;
use crate::domain::recipe::Recipe;
use crate::repository::csv_io::{self, SchemaVersion, TableSchema};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::field_map;

/// 配方档案文件名
pub const RECIPES_FILE_NAME: &str = "recipes.csv";

/// 配方档案表结构（当前表头 + 原工具旧版表头）
const SCHEMA: TableSchema = TableSchema {
    entity: "Recipe",
    headers: &[
        "Record ID",
        "Recipe Name",
        "Ingredient Cost",
        "Misc Cost",
        "Labor Cost",
        "Total Cost",
        "Margin Percent",
        "Selling Price",
        "Profit",
        "Ingredients Used",
        "Created At",
    ],
    legacy_headers: &[
        "Recipe Name",
        "Total Ingredient Cost",
        "Miscellaneous Cost (50%)",
        "Labor Cost (45%)",
        "Total Cost",
        "Suggested Selling Price",
        "Profit",
        "Ingredients Used",
    ],
};

pub struct RecipeRepository {
    file_path: PathBuf,
    // 同一进程内串行化文件访问
    file_lock: Mutex<()>,
}

impl RecipeRepository {
    /// 打开配方档案
    ///
    /// 文件缺失时按当前表头创建; 旧版(v1)表头在此处一次性迁移
    pub fn new(data_dir: &Path) -> RepositoryResult<Self> {
        let file_path = data_dir.join(RECIPES_FILE_NAME);
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

    /// 保存配方成本快照（追加写入）
    ///
    /// ingredients_used: 逗号拼接的原料名清单（自由文本, 仅供展示）
    pub fn add(
        &self,
        name: String,
        breakdown: &CostingBreakdown,
        ingredients_used: String,
    ) -> RepositoryResult<Recipe> {
        let _guard = self.lock()?;
        let recipe = Recipe::new(name, breakdown, ingredients_used);

        // 无法识别的表头先统一重写为当前表头, 再追加
        if csv_io::schema_version(&self.file_path, &SCHEMA)? != SchemaVersion::Current {
            csv_io::rewrite_as_current(&self.file_path, &SCHEMA, row_to_current)?;
        }
        csv_io::append_row(&self.file_path, &to_row(&recipe))?;
        Ok(recipe)
    }

    /// 读取全部配方（保持档案内顺序）
    pub fn list_all(&self) -> RepositoryResult<Vec<Recipe>> {
        let _guard = self.lock()?;
        self.read_entities()
    }

    /// 按记录ID查找
    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<Recipe>> {
        let _guard = self.lock()?;
        Ok(self
            .read_entities()?
            .into_iter()
            .find(|r| r.record_id == record_id))
    }

    /// 按记录ID删除（整文件重写）
    ///
    /// 未命中任何记录时返回 NotFound, 档案保持不变
    pub fn delete(&self, record_id: &str) -> RepositoryResult<()> {
        let _guard = self.lock()?;
        let mut entities = self.read_entities()?;

        let before = entities.len();
        entities.retain(|r| r.record_id != record_id);
        if entities.len() == before {
            return Err(RepositoryError::NotFound {
                entity: "Recipe".to_string(),
                id: record_id.to_string(),
            });
        }

        self.write_entities(&entities)
    }

    /// 名称模糊检索（大小写无关子串; 空查询返回全部）
    pub fn search(&self, query: &str) -> RepositoryResult<Vec<Recipe>> {
        let entities = self.list_all()?;

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(entities);
        }

        Ok(entities
            .into_iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .collect())
    }

    /// 档案记录总数
    pub fn count(&self) -> RepositoryResult<usize> {
        Ok(self.list_all()?.len())
    }

    fn read_entities(&self) -> RepositoryResult<Vec<Recipe>> {
        let rows = csv_io::read_rows(&self.file_path)?;
        Ok(rows.iter().map(row_to_recipe).collect())
    }

    fn write_entities(&self, entities: &[Recipe]) -> RepositoryResult<()> {
        let rows: Vec<Vec<String>> = entities.iter().map(to_row).collect();
        csv_io::write_rows(&self.file_path, SCHEMA.headers, &rows)
    }
}

// ==========================================
// 行映射
// ==========================================

/// 行数据 → 配方实体（任意版本表头, 按字段映射宽松读取）
fn row_to_recipe(row: &HashMap<String, String>) -> Recipe {
    Recipe {
        record_id: field_map::get_string(row, &["Record ID"]),
        name: field_map::get_string(row, &["Recipe Name", "Name"]),
        ingredient_cost: field_map::get_f64(row, &["Ingredient Cost", "Total Ingredient Cost"]),
        misc_cost: field_map::get_f64(row, &["Misc Cost", "Miscellaneous Cost (50%)"]),
        labor_cost: field_map::get_f64(row, &["Labor Cost", "Labor Cost (45%)"]),
        total_cost: field_map::get_f64(row, &["Total Cost"]),
        margin_percent: field_map::get_f64(row, &["Margin Percent", "Margin Percentage"]),
        selling_price: field_map::get_f64(row, &["Selling Price", "Suggested Selling Price"]),
        profit: field_map::get_f64(row, &["Profit"]),
        ingredients_used: field_map::get_string(row, &["Ingredients Used"]),
        created_at: field_map::get_string(row, &["Created At"]),
    }
}

/// 任意版本的行 → 当前表头顺序的值列表
///
/// 迁移口径: 缺失的 Record ID / 时间戳补全, 成本快照原样保留;
/// 旧版没有毛利率列, 按 售价/总成本 反推, 总成本为 0 时取默认毛利率
fn row_to_current(row: &HashMap<String, String>) -> Vec<String> {
    let mut recipe = row_to_recipe(row);

    if recipe.record_id.trim().is_empty() {
        recipe.record_id = Uuid::new_v4().to_string();
    }
    if recipe.created_at.trim().is_empty() {
        recipe.created_at = chrono::Local::now()
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
    }
    if recipe.margin_percent <= 0.0 {
        recipe.margin_percent = if recipe.total_cost > 0.0 {
            crate::engine::costing::round2(
                (recipe.selling_price / recipe.total_cost - 1.0) * 100.0,
            )
        } else {
            crate::engine::costing::DEFAULT_MARGIN_PERCENT
        };
    }

    to_row(&recipe)
}

/// 配方实体 → 当前表头顺序的值列表
fn to_row(recipe: &Recipe) -> Vec<String> {
    vec![
        recipe.record_id.clone(),
        recipe.name.clone(),
        recipe.ingredient_cost.to_string(),
        recipe.misc_cost.to_string(),
        recipe.labor_cost.to_string(),
        recipe.total_cost.to_string(),
        recipe.margin_percent.to_string(),
        recipe.selling_price.to_string(),
        recipe.profit.to_string(),
        recipe.ingredients_used.clone(),
        recipe.created_at.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn setup_test_repo() -> (TempDir, RecipeRepository) {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let repo = RecipeRepository::new(dir.path()).expect("Failed to create test repository");
        (dir, repo)
    }

    fn sample_breakdown() -> CostingBreakdown {
        CostingBreakdown {
            ingredient_cost: 100.0,
            misc_cost: 50.0,
            labor_cost: 45.0,
            total_cost: 195.0,
            margin_percent: 150.0,
            selling_price: 487.50,
            profit: 292.50,
        }
    }

    #[test]
    fn test_add_and_list() {
        let (_dir, repo) = setup_test_repo();

        let added = repo
            .add(
                "Chocolate Cake".to_string(),
                &sample_breakdown(),
                "Flour, Sugar".to_string(),
            )
            .expect("Failed to add");

        assert!(!added.record_id.is_empty());
        assert_eq!(added.total_cost, 195.0);

        let all = repo.list_all().expect("Failed to list");
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].record_id, added.record_id);
        assert_eq!(all[0].selling_price, 487.50);
    }

    #[test]
    fn test_snapshot_is_immutable_after_save() {
        let (_dir, repo) = setup_test_repo();
        let added = repo
            .add(
                "Chocolate Cake".to_string(),
                &sample_breakdown(),
                "Flour, Sugar".to_string(),
            )
            .expect("Failed to add");

        // 再次读取得到同一份快照
        let reread = repo
            .find_by_id(&added.record_id)
            .expect("Failed to find")
            .expect("Record missing");
        assert_eq!(reread.costing_snapshot(), sample_breakdown());
    }

    #[test]
    fn test_delete_unknown_id_not_found() {
        let (_dir, repo) = setup_test_repo();
        repo.add(
            "Chocolate Cake".to_string(),
            &sample_breakdown(),
            "Flour, Sugar".to_string(),
        )
        .expect("Failed to add");
        let before = std::fs::read_to_string(repo.file_path()).expect("Failed to read file");

        let result = repo.delete("no-such-id");

        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
        let after = std::fs::read_to_string(repo.file_path()).expect("Failed to read file");
        assert_eq!(before, after);
    }

    #[test]
    fn test_search_matches_substring() {
        let (_dir, repo) = setup_test_repo();
        repo.add(
            "Chocolate Cake".to_string(),
            &sample_breakdown(),
            "Flour, Sugar".to_string(),
        )
        .expect("Failed to add");
        repo.add(
            "Carrot Cake".to_string(),
            &sample_breakdown(),
            "Carrots".to_string(),
        )
        .expect("Failed to add");
        repo.add(
            "Lemonade".to_string(),
            &sample_breakdown(),
            "Lemons".to_string(),
        )
        .expect("Failed to add");

        let hits = repo.search("cake").expect("Failed to search");
        assert_eq!(hits.len(), 2);

        let all = repo.search("").expect("Failed to search");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_legacy_file_migrated_on_open() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(RECIPES_FILE_NAME);
        let mut file = std::fs::File::create(&path).expect("Failed to create file");
        writeln!(
            file,
            "Recipe Name,Total Ingredient Cost,Miscellaneous Cost (50%),Labor Cost (45%),Total Cost,Suggested Selling Price,Profit,Ingredients Used"
        )
        .expect("write");
        writeln!(
            file,
            "Chocolate Cake,100,50,45,195,487.5,292.5,\"Flour, Sugar, Eggs\""
        )
        .expect("write");
        drop(file);

        let repo = RecipeRepository::new(dir.path()).expect("Failed to open repository");
        let all = repo.list_all().expect("Failed to list");

        assert_eq!(all.len(), 1);
        assert!(!all[0].record_id.is_empty());
        assert_eq!(all[0].name, "Chocolate Cake");
        assert_eq!(all[0].ingredient_cost, 100.0);
        assert_eq!(all[0].selling_price, 487.5);
        // 旧版没有毛利率列: 487.5 / 195 = 2.5 倍, 反推为 150%
        assert_eq!(all[0].margin_percent, 150.0);
        assert!(!all[0].created_at.is_empty());

        // 旧版自由文本的 "Ingredients Used" 列原样保留
        assert_eq!(all[0].ingredients_used, "Flour, Sugar, Eggs");

        let header = std::fs::read_to_string(&path).expect("Failed to read file");
        assert!(header.starts_with("Record ID,"));
        assert!(header.contains("Margin Percent,"));
        assert!(header.contains("Ingredients Used,"));
    }

    #[test]
    fn test_legacy_row_with_zero_total_gets_default_margin() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join(RECIPES_FILE_NAME);
        let mut file = std::fs::File::create(&path).expect("Failed to create file");
        writeln!(
            file,
            "Recipe Name,Total Ingredient Cost,Miscellaneous Cost (50%),Labor Cost (45%),Total Cost,Suggested Selling Price,Profit,Ingredients Used"
        )
        .expect("write");
        writeln!(file, "Empty Recipe,0,0,0,0,0,0,").expect("write");
        drop(file);

        let repo = RecipeRepository::new(dir.path()).expect("Failed to open repository");
        let all = repo.list_all().expect("Failed to list");

        assert_eq!(all.len(), 1);
        assert_eq!(
            all[0].margin_percent,
            crate::engine::costing::DEFAULT_MARGIN_PERCENT
        );
    }
}
