//! 树模型：表单字段森林的规范表示，两个Schema均由它派生

use serde::{Deserialize, Serialize};

/// 合成根节点的固定键
pub const ROOT_KEY: &str = "0";

/// 组件类型（封闭集合）：正反两个投影方向共用的单一映射表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ComponentType {
    #[serde(rename = "input")]
    Input,
    #[serde(rename = "number-input")]
    NumberInput,
    #[serde(rename = "select")]
    Select,
    #[serde(rename = "checkbox")]
    Checkbox,
    #[serde(rename = "date-picker")]
    DatePicker,
    #[serde(rename = "switch")]
    Switch,
    #[serde(rename = "slider")]
    Slider,
    #[serde(rename = "upload")]
    Upload,
    #[serde(rename = "textarea")]
    Textarea,
    #[serde(rename = "nestedForm")]
    NestedForm,
}

impl ComponentType {
    /// 组件 → 数据Schema的type值
    pub fn data_type(self) -> &'static str {
        match self {
            Self::Input | Self::Select | Self::DatePicker | Self::Upload | Self::Textarea => {
                "string"
            }
            Self::NumberInput | Self::Slider => "number",
            Self::Checkbox => "array",
            Self::Switch => "boolean",
            Self::NestedForm => "object",
        }
    }

    /// 组件 → 展示Schema的ui:widget标签（无专用widget的组件返回None）
    pub fn widget(self) -> Option<&'static str> {
        match self {
            Self::Select => Some("select"),
            Self::Checkbox => Some("checkboxes"),
            Self::DatePicker => Some("date"),
            Self::Slider => Some("range"),
            Self::Upload => Some("file"),
            Self::Textarea => Some("textarea"),
            _ => None,
        }
    }

    /// ui:widget标签 → 组件（反向重建的第一优先级；未知标签返回None）
    pub fn from_widget(widget: &str) -> Option<Self> {
        match widget {
            "select" => Some(Self::Select),
            "checkboxes" => Some(Self::Checkbox),
            "date" => Some(Self::DatePicker),
            "range" => Some(Self::Slider),
            "file" => Some(Self::Upload),
            "textarea" => Some(Self::Textarea),
            _ => None,
        }
    }

    /// 组件默认占位提示文案
    pub fn placeholder_prompt(self) -> Option<&'static str> {
        match self {
            Self::Input | Self::Textarea => Some("Enter text..."),
            Self::NumberInput => Some("Enter number..."),
            Self::Select => Some("Select option..."),
            Self::DatePicker => Some("Select date..."),
            _ => None,
        }
    }

    /// 组件显示名，作为新增字段的默认标题
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Input => "Input",
            Self::NumberInput => "Number Input",
            Self::Select => "Select",
            Self::Checkbox => "Checkbox",
            Self::DatePicker => "DatePicker",
            Self::Switch => "Switch",
            Self::Slider => "Slider",
            Self::Upload => "Upload",
            Self::Textarea => "TextArea",
            Self::NestedForm => "NestedForm",
        }
    }
}

/// 字段校验记录：数值项保存用户键入的文本，投影时统一转数值
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldValidation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<String>,
    /// 自定义校验器文本：原样保存，核心层不执行
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_validator: Option<String>,
    pub required: bool,
}

/// 字段树节点；children顺序即Schema属性顺序
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TreeNode {
    /// 全树唯一键（编辑时强制，而非仅同级唯一）
    pub key: String,
    pub title: String,
    /// None表示纯结构容器节点（如合成根），不参与Schema投影
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_type: Option<ComponentType>,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// 合成根节点：持有整个森林，自身永不成为Schema字段
    pub fn root() -> Self {
        Self {
            key: ROOT_KEY.to_string(),
            title: "Root".to_string(),
            ..Default::default()
        }
    }

    /// 新字段节点：标题取组件显示名，required默认关闭
    pub fn new_field(key: impl Into<String>, component: ComponentType) -> Self {
        Self {
            key: key.into(),
            title: component.display_name().to_string(),
            component_type: Some(component),
            ..Default::default()
        }
    }

    /// 按键查找节点（含自身，深度优先）
    pub fn find_by_key(&self, key: &str) -> Option<&TreeNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_key(key))
    }

    pub fn find_by_key_mut(&mut self, key: &str) -> Option<&mut TreeNode> {
        if self.key == key {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_by_key_mut(key))
    }

    /// 键是否已存在于全树
    pub fn key_exists(&self, key: &str) -> bool {
        self.find_by_key(key).is_some()
    }

    /// 收集全树键，前序顺序（唯一性检查用）
    pub fn collect_keys<'a>(&'a self, out: &mut Vec<&'a str>) {
        out.push(&self.key);
        for child in &self.children {
            child.collect_keys(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_defaults() {
        let root = TreeNode::root();
        assert_eq!(root.key, "0");
        assert_eq!(root.title, "Root");
        assert!(root.component_type.is_none(), "根节点不应有组件类型");
        assert!(!root.required);
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_component_type_serde_tags() {
        assert_eq!(
            serde_json::to_value(ComponentType::NumberInput).unwrap(),
            json!("number-input")
        );
        assert_eq!(
            serde_json::to_value(ComponentType::DatePicker).unwrap(),
            json!("date-picker")
        );
        assert_eq!(
            serde_json::to_value(ComponentType::NestedForm).unwrap(),
            json!("nestedForm")
        );

        let parsed: ComponentType = serde_json::from_value(json!("slider")).unwrap();
        assert_eq!(parsed, ComponentType::Slider);
    }

    #[test]
    fn test_widget_mapping_round_trip() {
        // 有widget标签的组件，标签应能映射回自身
        for component in [
            ComponentType::Select,
            ComponentType::Checkbox,
            ComponentType::DatePicker,
            ComponentType::Slider,
            ComponentType::Upload,
            ComponentType::Textarea,
        ] {
            let widget = component.widget().expect("该组件应有widget标签");
            assert_eq!(ComponentType::from_widget(widget), Some(component));
        }
        assert_eq!(ComponentType::from_widget("password"), None);
    }

    #[test]
    fn test_find_by_key_nested() {
        let mut root = TreeNode::root();
        let mut group = TreeNode {
            key: "group".into(),
            title: "分组".into(),
            ..Default::default()
        };
        group
            .children
            .push(TreeNode::new_field("group-1", ComponentType::Input));
        root.children.push(group);
        root.children
            .push(TreeNode::new_field("0-2", ComponentType::Switch));

        assert!(root.find_by_key("group-1").is_some(), "应找到深层节点");
        assert_eq!(root.find_by_key("0-2").unwrap().title, "Switch");
        assert!(root.find_by_key("missing").is_none());
        assert!(root.key_exists("group"));
    }

    #[test]
    fn test_collect_keys_preorder() {
        let mut root = TreeNode::root();
        let mut a = TreeNode::new_field("a", ComponentType::Input);
        a.children
            .push(TreeNode::new_field("a-1", ComponentType::Input));
        root.children.push(a);
        root.children
            .push(TreeNode::new_field("b", ComponentType::Select));

        let mut keys = Vec::new();
        root.collect_keys(&mut keys);
        assert_eq!(keys, vec!["0", "a", "a-1", "b"], "应为前序顺序");
    }

    #[test]
    fn test_tree_node_serde_shape() {
        let node = TreeNode::new_field("0-42", ComponentType::NumberInput);
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["key"], json!("0-42"));
        assert_eq!(value["componentType"], json!("number-input"));
        // 空children不序列化
        assert!(value.get("children").is_none());

        let back: TreeNode = serde_json::from_value(value).unwrap();
        assert_eq!(back, node, "序列化往返应无损");
    }
}
