//! JSON边界辅助：两个Schema对象在原文形态下的解析与格式化

use crate::model::data_core::FormError;
use crate::model::schema::{DataSchema, PresentationSchema};

/// 解析数据Schema原文；非法JSON返回SchemaParse
pub fn parse_data_schema(text: &str) -> Result<DataSchema, FormError> {
    Ok(serde_json::from_str(text)?)
}

/// 解析展示Schema原文；未知键一律忽略
pub fn parse_presentation_schema(text: &str) -> Result<PresentationSchema, FormError> {
    Ok(serde_json::from_str(text)?)
}

/// 数据Schema格式化输出（编辑面板的Prettify）
pub fn data_schema_to_pretty(schema: &DataSchema) -> Result<String, FormError> {
    Ok(serde_json::to_string_pretty(schema)?)
}

/// 展示Schema格式化输出
pub fn presentation_to_pretty(ui_schema: &PresentationSchema) -> Result<String, FormError> {
    Ok(serde_json::to_string_pretty(ui_schema)?)
}
