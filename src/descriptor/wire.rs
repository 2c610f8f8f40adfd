//! JSON descriptor documents.
//!
//! Only literal properties survive the trip through JSON: computed properties
//! and explicit `custom` components have to be attached in code afterwards.

use serde::Deserialize;
use serde_json::Value;

use super::field::{FieldDescriptor, FieldType, ListProps};
use super::props::{ColSpan, ItemProps, Props, RowProps};
use crate::error::ComposeError;
use crate::path::NamePath;
use crate::prop::Prop;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorDoc {
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    hidden: bool,
    #[serde(default)]
    col: Option<ColSpan>,
    #[serde(default)]
    item_props: ItemProps,
    #[serde(default)]
    input_props: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListDoc {
    #[serde(default)]
    name: NamePath,
    #[serde(default)]
    items: Vec<DescriptorDoc>,
    #[serde(default)]
    row_props: Option<RowProps>,
}

impl DescriptorDoc {
    fn into_descriptor(self) -> Result<FieldDescriptor, ComposeError> {
        let field_type = match self.field_type.as_str() {
            "list" => {
                let list: ListDoc = match self.input_props {
                    None | Some(Value::Null) => ListDoc::default(),
                    Some(value) => serde_json::from_value(value)?,
                };
                let items = list
                    .items
                    .into_iter()
                    .map(DescriptorDoc::into_descriptor)
                    .collect::<Result<Vec<_>, _>>()?;
                FieldType::List {
                    input: Prop::Literal(ListProps {
                        name: list.name,
                        items,
                        row_props: list.row_props,
                        ..ListProps::default()
                    }),
                }
            }
            tag => {
                let input: Props = match self.input_props {
                    None | Some(Value::Null) => Props::new(),
                    Some(value) => serde_json::from_value(value)?,
                };
                match tag {
                    "custom" => FieldType::Custom {
                        component: None,
                        input: input.into(),
                    },
                    "hidden" => FieldType::Hidden {
                        input: input.into(),
                    },
                    _ => FieldType::Widget {
                        tag: tag.into(),
                        input: input.into(),
                    },
                }
            }
        };

        Ok(FieldDescriptor::new(field_type)
            .with_hidden(self.hidden)
            .with_col(self.col)
            .with_item(self.item_props))
    }
}

impl FieldDescriptor {
    /// Build a descriptor from one JSON object
    /// (`{ type, hidden?, col?, itemProps?, inputProps? }`).
    pub fn from_json(doc: &Value) -> Result<Self, ComposeError> {
        DescriptorDoc::deserialize(doc)?.into_descriptor()
    }
}

/// Parse a JSON array of descriptors.
pub fn descriptors_from_json(text: &str) -> Result<Vec<FieldDescriptor>, ComposeError> {
    let docs: Vec<DescriptorDoc> = serde_json::from_str(text)?;
    docs.into_iter().map(DescriptorDoc::into_descriptor).collect()
}

/// Like [`descriptors_from_json`], for an already-parsed document.
pub fn descriptors_from_value(doc: &Value) -> Result<Vec<FieldDescriptor>, ComposeError> {
    Vec::<DescriptorDoc>::deserialize(doc)?
        .into_iter()
        .map(DescriptorDoc::into_descriptor)
        .collect()
}
