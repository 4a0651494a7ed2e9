//! 表单定义构建核心库
//!
//! 维护字段树、数据Schema与展示Schema三种表示的双向同步：
//! 正向投影（树 → 两个Schema）、反向重建（两个Schema → 树）、
//! 基于索引路径的位置代数与单字段编辑。
//! 单线程同步执行；所有变更在副本上进行，完整成功后才发布。

pub mod model;
pub mod utils;

// 重新导出主要类型
pub use model::build::build_tree;
pub use model::data_core::{FormError, FormState};
pub use model::edit::{FieldPatch, KeyCheckSequencer};
pub use model::position::{
    delete_at, insert_at, move_node, purge_placeholders, remove_at, DropLocation, PLACEHOLDER_KEY,
};
pub use model::project::project;
pub use model::schema::{
    DataSchema, FieldSchema, PresentationField, PresentationSchema, UiOptions,
};
pub use model::tree::{ComponentType, FieldValidation, TreeNode, ROOT_KEY};
