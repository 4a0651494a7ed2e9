//! FormState：表单构建核心状态与双向同步入口

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;

use crate::model::build::build_tree;
use crate::model::edit::{self, FieldPatch};
use crate::model::position;
use crate::model::project::project;
use crate::model::schema::{DataSchema, PresentationSchema};
use crate::model::tree::{ComponentType, TreeNode};
use crate::utils::json::{
    data_schema_to_pretty, parse_data_schema, parse_presentation_schema, presentation_to_pretty,
};

#[derive(Error, Debug)]
pub enum FormError {
    #[error("位置无效: {0}")]
    InvalidPosition(String),
    #[error("键重复: {0}")]
    DuplicateKey(String),
    #[error("节点不存在: {0}")]
    NodeNotFound(String),
    #[error("Schema解析失败: {0}")]
    SchemaParse(#[from] serde_json::Error),
}

/// 表单构建状态：树是唯一事实来源，两个Schema随每次成功变更整体重投影
///
/// 每次变更都在私有副本上进行，只有完整成功才发布新状态；
/// 失败时上一份已知良好的树与Schema原样保留。
#[derive(Debug, Clone, PartialEq)]
pub struct FormState {
    pub tree: TreeNode,
    pub data_schema: DataSchema,
    pub ui_schema: PresentationSchema,
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

impl FormState {
    /// 空表单：仅含合成根
    pub fn new() -> Self {
        let tree = TreeNode::root();
        let (data_schema, ui_schema) = project(&tree);
        Self {
            tree,
            data_schema,
            ui_schema,
        }
    }

    /// 发布新树并重投影两个Schema（仅在变更完整成功后调用）
    fn commit(&mut self, tree: TreeNode) {
        let (data_schema, ui_schema) = project(&tree);
        self.tree = tree;
        self.data_schema = data_schema;
        self.ui_schema = ui_schema;
    }

    /// 在选中节点下追加新字段，键为 <父键>-<当前毫秒时间戳>，返回新键
    pub fn add_field(
        &mut self,
        parent_key: &str,
        component: ComponentType,
    ) -> Result<String, FormError> {
        self.add_field_with_stamp(parent_key, component, now_millis())
    }

    /// 指定键戳的追加入口（确定性调用方用）
    pub fn add_field_with_stamp(
        &mut self,
        parent_key: &str,
        component: ComponentType,
        stamp: u64,
    ) -> Result<String, FormError> {
        let tree = edit::add_field(&self.tree, parent_key, component, stamp)?;
        let key = format!("{parent_key}-{stamp}");
        tracing::info!("新增字段: {} ({})", key, component.display_name());
        self.commit(tree);
        Ok(key)
    }

    /// 用补丁更新单字段的标题/required/展示文案/校验
    pub fn edit_field(&mut self, key: &str, patch: &FieldPatch) -> Result<(), FormError> {
        let tree = edit::update_field(&self.tree, key, patch)?;
        self.commit(tree);
        Ok(())
    }

    /// 重命名字段键；全树唯一性不满足时拒绝
    pub fn rename_field_key(&mut self, key: &str, new_key: &str) -> Result<(), FormError> {
        let tree = edit::rename_key(&self.tree, key, new_key)?;
        tracing::info!("重命名字段键: {} -> {}", key, new_key);
        self.commit(tree);
        Ok(())
    }

    /// 拖拽移动：按位置删除、按落点插入、清除占位，整体成功才发布
    pub fn move_field(
        &mut self,
        drag_position: &[usize],
        drop_position: &[usize],
        drop_offset: i64,
    ) -> Result<(), FormError> {
        let tree = position::move_node(&self.tree, drag_position, drop_position, drop_offset)?;
        tracing::info!(
            "移动字段: {:?} -> {:?} (偏移{})",
            drag_position,
            drop_position,
            drop_offset
        );
        self.commit(tree);
        Ok(())
    }

    /// 按位置删除字段（及其整个子树）
    pub fn delete_field(&mut self, position: &[usize]) -> Result<(), FormError> {
        let (tree, removed) = position::remove_at(&self.tree, position)?;
        tracing::info!("删除字段: {}", removed.key);
        self.commit(tree);
        Ok(())
    }

    /// 直接编辑数据Schema原文：重建树，再重投影展示Schema保持一致
    pub fn update_data_schema(&mut self, json_text: &str) -> Result<(), FormError> {
        let schema = parse_data_schema(json_text).map_err(|e| {
            tracing::warn!("数据Schema原文解析失败: {}", e);
            e
        })?;
        let tree = build_tree(&schema, &self.ui_schema);
        let (_, ui_schema) = project(&tree);
        self.tree = tree;
        self.data_schema = schema;
        self.ui_schema = ui_schema;
        Ok(())
    }

    /// 直接编辑展示Schema原文：重建树，再重投影数据Schema保持一致
    pub fn update_ui_schema(&mut self, json_text: &str) -> Result<(), FormError> {
        let ui_schema = parse_presentation_schema(json_text).map_err(|e| {
            tracing::warn!("展示Schema原文解析失败: {}", e);
            e
        })?;
        let tree = build_tree(&self.data_schema, &ui_schema);
        let (data_schema, _) = project(&tree);
        self.tree = tree;
        self.data_schema = data_schema;
        self.ui_schema = ui_schema;
        Ok(())
    }

    /// 数据Schema的格式化原文（JSON编辑面板）
    pub fn data_schema_pretty(&self) -> Result<String, FormError> {
        data_schema_to_pretty(&self.data_schema)
    }

    /// 展示Schema的格式化原文（JSON编辑面板）
    pub fn ui_schema_pretty(&self) -> Result<String, FormError> {
        presentation_to_pretty(&self.ui_schema)
    }
}

/// 当前UNIX毫秒时间戳（新字段键戳）
fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
