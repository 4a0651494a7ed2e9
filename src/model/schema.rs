//! Schema边界形状：数据Schema与展示Schema的序列化契约

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 数据Schema的固定顶层标题
pub const FORM_TITLE: &str = "Dynamic Form";

/// 数据Schema：JSON-Schema风格的结构描述，properties保持插入/文档顺序
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataSchema {
    #[serde(rename = "type", default)]
    pub schema_type: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub properties: IndexMap<String, FieldSchema>,
    #[serde(default)]
    pub required: Vec<String>,
}

impl DataSchema {
    /// 空表单Schema
    pub fn empty() -> Self {
        Self {
            schema_type: "object".to_string(),
            title: FORM_TITLE.to_string(),
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }
}

/// 单字段的Schema描述；缺省项不序列化
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldSchema {
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<FieldSchema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<f64>,
    #[serde(rename = "minLength", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(rename = "maxLength", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// 嵌套对象属性；nestedForm正向投影为空表
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, FieldSchema>>,
}

/// 展示Schema：字段键 → widget与显示选项
pub type PresentationSchema = IndexMap<String, PresentationField>;

/// 单字段的展示描述
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationField {
    #[serde(rename = "ui:widget", skip_serializing_if = "Option::is_none")]
    pub widget: Option<String>,
    #[serde(rename = "ui:options", skip_serializing_if = "Option::is_none")]
    pub options: Option<UiOptions>,
}

/// 固定的展示选项袋；style为开放的键值表
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_clear: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<IndexMap<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_preview: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<bool>,
}
