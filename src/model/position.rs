//! 位置代数：以子索引路径寻址的删除、插入与移动
//!
//! 删除采用"占位后清除"两阶段协议：删除阶段在原槽位留下同形占位符，
//! 使同一逻辑操作内先前算出的同级索引继续有效；移动完成后统一清除。

use crate::model::data_core::FormError;
use crate::model::tree::TreeNode;

/// 移动占位符的标记键
pub const PLACEHOLDER_KEY: &str = "moved";

/// 落点：相对目标索引的三种放置方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropLocation {
    /// 紧邻目标索引之前
    Before,
    /// 紧邻目标索引之后
    After,
    /// 作为目标节点的新首子节点（仅由显式"落到节点上"产生）
    Into,
}

impl DropLocation {
    /// 由上报的拖放偏移与目标末位索引推导落点
    pub fn from_offset(drop_offset: i64, target_index: usize) -> Self {
        let target = target_index as i64;
        if drop_offset < target {
            Self::Before
        } else if drop_offset > target {
            Self::After
        } else {
            Self::Into
        }
    }
}

fn placeholder() -> TreeNode {
    TreeNode {
        key: PLACEHOLDER_KEY.to_string(),
        title: "undefined".to_string(),
        ..Default::default()
    }
}

/// 沿前缀索引逐级下降到同级列表；任一段越界即InvalidPosition
fn descend_mut<'a>(
    mut children: &'a mut Vec<TreeNode>,
    prefix: &[usize],
) -> Result<&'a mut Vec<TreeNode>, FormError> {
    for &index in prefix {
        if index >= children.len() {
            return Err(FormError::InvalidPosition(format!(
                "路径段越界: {} (同级共{}个)",
                index,
                children.len()
            )));
        }
        children = &mut children[index].children;
    }
    Ok(children)
}

/// 摘除position处的节点并在原槽位留下占位符，返回被摘除的节点
pub fn delete_at(root: &mut TreeNode, position: &[usize]) -> Result<TreeNode, FormError> {
    let Some((&last, prefix)) = position.split_last() else {
        return Err(FormError::InvalidPosition("位置为空".to_string()));
    };
    let siblings = descend_mut(&mut root.children, prefix)?;
    if last >= siblings.len() {
        return Err(FormError::InvalidPosition(format!(
            "末位索引越界: {:?}",
            position
        )));
    }
    Ok(std::mem::replace(&mut siblings[last], placeholder()))
}

/// 将node按location放置到position指向的目标旁/内
pub fn insert_at(
    root: &mut TreeNode,
    position: &[usize],
    location: DropLocation,
    node: TreeNode,
) -> Result<(), FormError> {
    let Some((&last, prefix)) = position.split_last() else {
        return Err(FormError::InvalidPosition("位置为空".to_string()));
    };
    let siblings = descend_mut(&mut root.children, prefix)?;
    if last >= siblings.len() {
        return Err(FormError::InvalidPosition(format!(
            "末位索引越界: {:?}",
            position
        )));
    }
    match location {
        DropLocation::Before => siblings.insert(last, node),
        DropLocation::After => siblings.insert(last + 1, node),
        DropLocation::Into => siblings[last].children.insert(0, node),
    }
    Ok(())
}

/// 单趟递归清除所有深度上的占位节点
pub fn purge_placeholders(node: &mut TreeNode) {
    node.children.retain(|c| c.key != PLACEHOLDER_KEY);
    for child in &mut node.children {
        purge_placeholders(child);
    }
}

/// 拖拽移动：删除(留占位) → 按占位树解析落点插入 → 清除占位
///
/// 在工作副本上执行，任何一步失败都不发布，原树保持不变。
/// 拖到自身/拖到自身后代不做校验，调用方（树控件）负责拦截这类落点。
pub fn move_node(
    root: &TreeNode,
    drag_position: &[usize],
    drop_position: &[usize],
    drop_offset: i64,
) -> Result<TreeNode, FormError> {
    let Some(&target_index) = drop_position.last() else {
        return Err(FormError::InvalidPosition("落点位置为空".to_string()));
    };
    let location = DropLocation::from_offset(drop_offset, target_index);

    let mut working = root.clone();
    let dragged = delete_at(&mut working, drag_position)?;
    insert_at(&mut working, drop_position, location, dragged)?;
    purge_placeholders(&mut working);
    Ok(working)
}

/// 删除position处的节点（删除+清除占位），返回(新树, 被删节点)
pub fn remove_at(
    root: &TreeNode,
    position: &[usize],
) -> Result<(TreeNode, TreeNode), FormError> {
    let mut working = root.clone();
    let removed = delete_at(&mut working, position)?;
    purge_placeholders(&mut working);
    Ok((working, removed))
}
