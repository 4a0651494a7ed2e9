//! 字段编辑操作：按键定位、构造替换树并整树返回
//!
//! 所有操作都不就地修改共享状态：在副本上变更、成功后整树返回，
//! 便于调用方对比新旧树决定刷新范围。

use crate::model::data_core::FormError;
use crate::model::tree::{ComponentType, FieldValidation, TreeNode};

/// 单字段补丁：标题/required/展示文案/校验整体替换
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    pub title: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub help: Option<String>,
    pub validation: Option<FieldValidation>,
}

/// 重命名字段键；唯一性为全树约束而非同级约束
///
/// 新键已存在于目标之外的任何位置时拒绝并返回DuplicateKey，原树不变。
/// 重命名为自身视为无操作成功。
pub fn rename_key(root: &TreeNode, target_key: &str, new_key: &str) -> Result<TreeNode, FormError> {
    if new_key != target_key && root.key_exists(new_key) {
        return Err(FormError::DuplicateKey(new_key.to_string()));
    }
    let mut working = root.clone();
    let Some(node) = working.find_by_key_mut(target_key) else {
        return Err(FormError::NodeNotFound(target_key.to_string()));
    };
    node.key = new_key.to_string();
    Ok(working)
}

/// 用补丁替换目标节点的可编辑属性；键不存在时返回NodeNotFound
pub fn update_field(
    root: &TreeNode,
    target_key: &str,
    patch: &FieldPatch,
) -> Result<TreeNode, FormError> {
    let mut working = root.clone();
    let Some(node) = working.find_by_key_mut(target_key) else {
        return Err(FormError::NodeNotFound(target_key.to_string()));
    };
    node.title = patch.title.clone();
    node.required = patch.required;
    node.placeholder = patch.placeholder.clone();
    node.description = patch.description.clone();
    node.help = patch.help.clone();
    node.validation = patch.validation.clone();
    Ok(working)
}

/// 在父节点末尾追加新字段，键为 <父键>-<stamp>
pub fn add_field(
    root: &TreeNode,
    parent_key: &str,
    component: ComponentType,
    stamp: u64,
) -> Result<TreeNode, FormError> {
    let key = format!("{parent_key}-{stamp}");
    if root.key_exists(&key) {
        return Err(FormError::DuplicateKey(key));
    }
    let mut working = root.clone();
    let Some(parent) = working.find_by_key_mut(parent_key) else {
        return Err(FormError::NodeNotFound(parent_key.to_string()));
    };
    parent.children.push(TreeNode::new_field(key, component));
    Ok(working)
}

/// 键唯一性检查的世代计数器
///
/// 键入去抖的显式建模：每次键入领取一个单调递增的序号，
/// 只有仍是最新序号的检查结果才会被采纳，过期结果整体作废。
#[derive(Debug, Default)]
pub struct KeyCheckSequencer {
    latest: u64,
}

impl KeyCheckSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 领取新序号；旧序号随即全部过期
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    /// 过期序号返回None（结果不采纳）；最新序号返回唯一性判定
    pub fn check(
        &self,
        seq: u64,
        root: &TreeNode,
        target_key: &str,
        candidate: &str,
    ) -> Option<Result<(), FormError>> {
        if seq != self.latest {
            return None;
        }
        if candidate != target_key && root.key_exists(candidate) {
            Some(Err(FormError::DuplicateKey(candidate.to_string())))
        } else {
            Some(Ok(()))
        }
    }
}
