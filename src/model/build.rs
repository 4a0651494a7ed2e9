//! 反向重建：(数据Schema, 展示Schema) → 字段树
//!
//! 对无nestedForm的扁平表单，本模块是正向投影的精确左逆：
//! 投影自身产生的默认值（组件占位提示、空串help/description）在回建时
//! 归一为缺省，使 build(project(t)) == t 成立。
//! 与正向的摊平相反，Schema中的嵌套properties会重建为子节点（已知不对称）。

use crate::model::schema::{DataSchema, FieldSchema, PresentationField, PresentationSchema};
use crate::model::tree::{ComponentType, FieldValidation, TreeNode};

/// 按properties存储顺序重建字段树；空Schema得到裸默认根（空表单）
pub fn build_tree(schema: &DataSchema, ui_schema: &PresentationSchema) -> TreeNode {
    let mut root = TreeNode::root();
    root.children = schema
        .properties
        .iter()
        .map(|(key, field)| build_field(key, field, &schema.required, ui_schema))
        .collect();
    root
}

fn build_field(
    key: &str,
    field: &FieldSchema,
    required: &[String],
    ui_schema: &PresentationSchema,
) -> TreeNode {
    let presentation = ui_schema.get(key);
    let component = component_for(field, presentation);
    let options = presentation.and_then(|p| p.options.as_ref());

    let mut node = TreeNode {
        key: key.to_string(),
        // Schema未带标题时退回字段键
        title: field
            .title
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| key.to_string()),
        component_type: Some(component),
        required: required.iter().any(|k| k == key),
        placeholder: non_empty(options.and_then(|o| o.placeholder.clone()))
            .filter(|p| Some(p.as_str()) != component.placeholder_prompt()),
        description: non_empty(options.and_then(|o| o.description.clone())),
        help: non_empty(options.and_then(|o| o.help.clone())),
        validation: restore_validation(field, component),
        children: Vec::new(),
    };
    if let Some(children) = &field.properties {
        node.children = children
            .iter()
            .map(|(child_key, child)| build_field(child_key, child, required, ui_schema))
            .collect();
    }
    node
}

/// 组件判定优先级：ui:widget映射表优先，未知标签回落到类型推断
fn component_for(field: &FieldSchema, presentation: Option<&PresentationField>) -> ComponentType {
    if let Some(component) = presentation
        .and_then(|p| p.widget.as_deref())
        .and_then(ComponentType::from_widget)
    {
        return component;
    }
    infer_from_field(field)
}

fn infer_from_field(field: &FieldSchema) -> ComponentType {
    match field.field_type.as_str() {
        "string" if field.format.as_deref() == Some("date") => ComponentType::DatePicker,
        "number" => ComponentType::NumberInput,
        "boolean" => ComponentType::Switch,
        "array" => {
            if field
                .items
                .as_ref()
                .map(|items| items.field_type == "object")
                .unwrap_or(false)
            {
                ComponentType::NestedForm
            } else {
                ComponentType::Select
            }
        }
        "object" => ComponentType::NestedForm,
        _ => ComponentType::Input,
    }
}

/// 仅恢复与直通方向对应的约束；固定表组件(select/checkbox/slider)不回写
fn restore_validation(field: &FieldSchema, component: ComponentType) -> Option<FieldValidation> {
    let mut validation = FieldValidation::default();
    match component {
        ComponentType::Input => {
            validation.min_length = field.min_length.map(|v| v.to_string());
            validation.max_length = field.max_length.map(|v| v.to_string());
            validation.pattern = field.pattern.clone();
        }
        ComponentType::NumberInput => {
            validation.minimum = field.minimum.map(format_number);
            validation.maximum = field.maximum.map(format_number);
        }
        _ => {}
    }
    if validation == FieldValidation::default() {
        None
    } else {
        Some(validation)
    }
}

/// 整数值回写为不带小数点的文本，与用户键入形式一致
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::project::project;
    use crate::model::schema::PresentationSchema;
    use crate::model::tree::FieldValidation;

    fn parse_schema(text: &str) -> DataSchema {
        serde_json::from_str(text).expect("测试Schema应能解析")
    }

    #[test]
    fn test_build_number_field_from_schema() {
        let schema = parse_schema(
            r#"{"type":"object","title":"Dynamic Form",
               "properties":{"age":{"type":"number"}},"required":["age"]}"#,
        );
        let tree = build_tree(&schema, &PresentationSchema::new());

        assert_eq!(tree.key, "0");
        assert_eq!(tree.children.len(), 1);
        let age = &tree.children[0];
        assert_eq!(age.key, "age");
        assert_eq!(age.component_type, Some(ComponentType::NumberInput));
        assert!(age.required, "required表成员应置位");
        assert_eq!(age.title, "age", "缺标题时退回字段键");
    }

    #[test]
    fn test_empty_schema_yields_default_root() {
        let schema = parse_schema(r#"{"type":"object","title":"Dynamic Form","properties":{}}"#);
        let tree = build_tree(&schema, &PresentationSchema::new());
        assert_eq!(tree, TreeNode::root(), "空Schema应得到裸默认根");
    }

    #[test]
    fn test_widget_takes_precedence_over_type() {
        let schema = parse_schema(
            r#"{"type":"object","title":"t",
               "properties":{"note":{"type":"string"},"photo":{"type":"string"}}}"#,
        );
        let ui: PresentationSchema = serde_json::from_str(
            r#"{"note":{"ui:widget":"textarea"},"photo":{"ui:widget":"file"}}"#,
        )
        .unwrap();
        let tree = build_tree(&schema, &ui);
        assert_eq!(
            tree.children[0].component_type,
            Some(ComponentType::Textarea)
        );
        assert_eq!(tree.children[1].component_type, Some(ComponentType::Upload));
    }

    #[test]
    fn test_unknown_widget_falls_back_to_inference() {
        let schema = parse_schema(
            r#"{"type":"object","title":"t","properties":{"pwd":{"type":"string"}}}"#,
        );
        let ui: PresentationSchema =
            serde_json::from_str(r#"{"pwd":{"ui:widget":"password"}}"#).unwrap();
        let tree = build_tree(&schema, &ui);
        assert_eq!(tree.children[0].component_type, Some(ComponentType::Input));
    }

    #[test]
    fn test_type_inference_table() {
        let schema = parse_schema(
            r#"{"type":"object","title":"t","properties":{
                "birthday":{"type":"string","format":"date"},
                "active":{"type":"boolean"},
                "tags":{"type":"array","items":{"type":"string"}},
                "rows":{"type":"array","items":{"type":"object"}},
                "profile":{"type":"object"},
                "name":{"type":"string"},
                "odd":{"type":"unknown"}
            }}"#,
        );
        let tree = build_tree(&schema, &PresentationSchema::new());
        let components: Vec<Option<ComponentType>> =
            tree.children.iter().map(|c| c.component_type).collect();
        assert_eq!(
            components,
            vec![
                Some(ComponentType::DatePicker),
                Some(ComponentType::Switch),
                Some(ComponentType::Select),
                Some(ComponentType::NestedForm),
                Some(ComponentType::NestedForm),
                Some(ComponentType::Input),
                Some(ComponentType::Input),
            ]
        );
    }

    #[test]
    fn test_nested_properties_become_children() {
        let schema = parse_schema(
            r#"{"type":"object","title":"t","properties":{
                "address":{"type":"object","properties":{
                    "city":{"type":"string"},
                    "zip":{"type":"number"}
                }}
            },"required":["city"]}"#,
        );
        let tree = build_tree(&schema, &PresentationSchema::new());
        let address = &tree.children[0];
        assert_eq!(address.component_type, Some(ComponentType::NestedForm));
        assert_eq!(address.children.len(), 2);
        assert_eq!(address.children[0].key, "city");
        assert!(address.children[0].required, "required表对嵌套层同样生效");
        assert_eq!(
            address.children[1].component_type,
            Some(ComponentType::NumberInput)
        );
    }

    #[test]
    fn test_options_flow_back_to_node() {
        let schema = parse_schema(
            r#"{"type":"object","title":"t","properties":{"u":{"type":"string"}}}"#,
        );
        let ui: PresentationSchema = serde_json::from_str(
            r#"{"u":{"ui:options":{
                "placeholder":"请输入用户名","help":"3-20个字符","description":"登录用户名"
            }}}"#,
        )
        .unwrap();
        let tree = build_tree(&schema, &ui);
        let node = &tree.children[0];
        assert_eq!(node.placeholder.as_deref(), Some("请输入用户名"));
        assert_eq!(node.help.as_deref(), Some("3-20个字符"));
        assert_eq!(node.description.as_deref(), Some("登录用户名"));
    }

    #[test]
    fn test_projector_defaults_normalized_to_absent() {
        // 投影自身产生的默认提示与空串不应回写到节点
        let root = {
            let mut root = TreeNode::root();
            root.children
                .push(TreeNode::new_field("plain", ComponentType::Input));
            root
        };
        let (data, ui) = project(&root);
        let rebuilt = build_tree(&data, &ui);
        let node = &rebuilt.children[0];
        assert_eq!(node.placeholder, None, "默认提示不应变成节点文案");
        assert_eq!(node.help, None);
        assert_eq!(node.description, None);
    }

    #[test]
    fn test_round_trip_flat_form() {
        // 覆盖全部非嵌套组件的扁平表单：build(project(t)) == t
        let mut name = TreeNode::new_field("name", ComponentType::Input);
        name.placeholder = Some("请输入姓名".into());
        name.help = Some("一句话介绍".into());
        name.validation = Some(FieldValidation {
            min_length: Some("2".into()),
            max_length: Some("30".into()),
            pattern: Some("^\\S+$".into()),
            ..Default::default()
        });
        let mut age = TreeNode::new_field("age", ComponentType::NumberInput);
        age.required = true;
        age.validation = Some(FieldValidation {
            minimum: Some("0".into()),
            maximum: Some("150".into()),
            ..Default::default()
        });
        let mut bio = TreeNode::new_field("bio", ComponentType::Textarea);
        bio.placeholder = Some("自我介绍".into());

        let mut root = TreeNode::root();
        root.children = vec![
            name,
            age,
            TreeNode::new_field("gender", ComponentType::Select),
            TreeNode::new_field("hobbies", ComponentType::Checkbox),
            TreeNode::new_field("birthday", ComponentType::DatePicker),
            TreeNode::new_field("active", ComponentType::Switch),
            TreeNode::new_field("score", ComponentType::Slider),
            TreeNode::new_field("avatar", ComponentType::Upload),
            bio,
        ];

        let (data, ui) = project(&root);
        let rebuilt = build_tree(&data, &ui);
        assert_eq!(rebuilt, root, "扁平表单应精确往返");

        // 重建树再投影得到的Schema也应逐字节一致
        let (data_again, ui_again) = project(&rebuilt);
        assert_eq!(
            serde_json::to_string(&data_again).unwrap(),
            serde_json::to_string(&data).unwrap()
        );
        assert_eq!(
            serde_json::to_string(&ui_again).unwrap(),
            serde_json::to_string(&ui).unwrap()
        );
    }
}
