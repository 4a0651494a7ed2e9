//! 正向投影：树 → (数据Schema, 展示Schema)
//!
//! 前序遍历根的子树；容器节点对字段发现透明，因此视觉上的嵌套分组
//! 全部落入同一层顶层properties（nestedForm除外，投影为空properties的object）。
//! 投影是纯函数：同一棵树重复投影得到逐字节一致的结果。

use indexmap::IndexMap;
use serde_json::json;

use crate::model::schema::{
    DataSchema, FieldSchema, PresentationField, PresentationSchema, UiOptions,
};
use crate::model::tree::{ComponentType, TreeNode};

/// select/checkbox的固定占位选项表
pub const OPTION_LIST: [&str; 3] = ["option1", "option2", "option3"];

/// 由字段树生成两个Schema
pub fn project(root: &TreeNode) -> (DataSchema, PresentationSchema) {
    let mut data = DataSchema::empty();
    let mut ui = PresentationSchema::new();
    visit(root, &mut data, &mut ui);
    (data, ui)
}

fn visit(node: &TreeNode, data: &mut DataSchema, ui: &mut PresentationSchema) {
    if let Some(component) = node.component_type {
        data.properties
            .insert(node.key.clone(), field_schema(node, component));
        if node_required(node) {
            data.required.push(node.key.clone());
        }
        ui.insert(node.key.clone(), presentation_field(node, component));
    }
    // 无论当前节点是否产出字段都继续下钻
    for child in &node.children {
        visit(child, data, ui);
    }
}

/// required以validation.required为准，兼容旧版节点级required标志
fn node_required(node: &TreeNode) -> bool {
    node.validation.as_ref().map(|v| v.required).unwrap_or(false) || node.required
}

fn field_schema(node: &TreeNode, component: ComponentType) -> FieldSchema {
    let mut field = FieldSchema {
        field_type: component.data_type().to_string(),
        title: Some(node.title.clone()),
        description: node.description.clone(),
        ..Default::default()
    };
    let validation = node.validation.as_ref();
    match component {
        ComponentType::Input => {
            field.min_length = validation.and_then(|v| parse_integer(v.min_length.as_deref()));
            field.max_length = validation.and_then(|v| parse_integer(v.max_length.as_deref()));
            field.pattern = validation
                .and_then(|v| v.pattern.clone())
                .filter(|p| !p.is_empty());
        }
        ComponentType::NumberInput => {
            field.minimum = validation.and_then(|v| parse_number(v.minimum.as_deref()));
            field.maximum = validation.and_then(|v| parse_number(v.maximum.as_deref()));
        }
        ComponentType::Select => {
            field.enum_values = Some(option_list());
        }
        ComponentType::Checkbox => {
            field.items = Some(Box::new(FieldSchema {
                field_type: "string".to_string(),
                enum_values: Some(option_list()),
                ..Default::default()
            }));
        }
        ComponentType::DatePicker => {
            field.format = Some("date".to_string());
        }
        ComponentType::Switch | ComponentType::Textarea => {}
        ComponentType::Slider => {
            // 固定边界，任何validation取值都不覆盖
            field.minimum = Some(0.0);
            field.maximum = Some(100.0);
        }
        ComponentType::Upload => {
            field.format = Some("binary".to_string());
        }
        ComponentType::NestedForm => {
            field.properties = Some(IndexMap::new());
        }
    }
    field
}

fn option_list() -> Vec<String> {
    OPTION_LIST.iter().map(|s| s.to_string()).collect()
}

/// 数值校验项以文本编辑，每次投影时转数值；无法解析按缺省处理
fn parse_integer(text: Option<&str>) -> Option<u64> {
    text.and_then(|t| t.trim().parse().ok())
}

fn parse_number(text: Option<&str>) -> Option<f64> {
    text.and_then(|t| t.trim().parse().ok())
}

/// 所有组件共用的基础选项
fn base_options() -> UiOptions {
    let mut style = IndexMap::new();
    style.insert("width".to_string(), json!("100%"));
    UiOptions {
        size: Some("large".to_string()),
        allow_clear: Some(true),
        style: Some(style),
        ..Default::default()
    }
}

fn presentation_field(node: &TreeNode, component: ComponentType) -> PresentationField {
    let mut options = base_options();
    // 节点占位文案优先，否则用组件默认提示
    let placeholder = || {
        node.placeholder
            .clone()
            .filter(|p| !p.is_empty())
            .or_else(|| component.placeholder_prompt().map(str::to_string))
    };
    match component {
        ComponentType::Input | ComponentType::NumberInput | ComponentType::Select => {
            options.placeholder = placeholder();
            // 这三类组件始终携带help/description，未填写时为空串
            options.help = Some(node.help.clone().unwrap_or_default());
            options.description = Some(node.description.clone().unwrap_or_default());
        }
        ComponentType::Checkbox => {
            options.inline = Some(true);
        }
        ComponentType::DatePicker => {
            options.placeholder = placeholder();
        }
        ComponentType::Switch => {}
        ComponentType::Slider => {
            if let Some(style) = options.style.as_mut() {
                style.insert("padding".to_string(), json!("15px 0"));
            }
        }
        ComponentType::Upload => {
            options.file_preview = Some(true);
            options.accept = Some("image/*,.pdf".to_string());
        }
        ComponentType::Textarea => {
            options.rows = Some(4);
            options.placeholder = placeholder();
            if let Some(style) = options.style.as_mut() {
                style.insert("minHeight".to_string(), json!("100px"));
                style.insert("resize".to_string(), json!("vertical"));
            }
        }
        ComponentType::NestedForm => {
            options.label = Some(false);
        }
    }
    PresentationField {
        widget: component.widget().map(str::to_string),
        options: Some(options),
    }
}
