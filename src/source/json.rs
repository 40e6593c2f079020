//! JSON documents as pager items.
//!
//! A file holds a JSON array. Every element becomes one child of the root:
//! scalars and plain objects are one-row leaves, while an object carrying an
//! `items` array becomes a nested [`Panel`] that paginates those items itself.
//! A `title` on such an object gives the panel a row of its own.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::engine::{Component, PaginationNode, Panel, Template, TextRow};
use crate::error::{PagerError, Result};

/// Key holding a panel's nested items.
pub const ITEMS_KEY: &str = "items";

/// Key holding a panel's title row.
pub const TITLE_KEY: &str = "title";

/// Label given to panels without a title.
const UNTITLED: &str = "(items)";

/// Parse a JSON document into the list of top-level items.
///
/// An array yields its elements; any other value is a single item.
pub fn parse_items(content: &str) -> Result<Vec<Value>> {
    match serde_json::from_str(content)? {
        Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

/// Render a leaf value as one line of text.
///
/// Strings are shown without quotes; everything else as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Builds components from JSON values.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonTemplate;

impl JsonTemplate {
    fn panel(&self, title: Option<&Value>, items: &[Value]) -> Panel<Value> {
        let node = PaginationNode::from_items(items.to_vec())
            .with_template(Arc::new(*self))
            .with_own_row(title.is_some());
        let label = title.map(render_value).unwrap_or_else(|| UNTITLED.to_string());
        Panel::new(label, node)
    }
}

#[async_trait]
impl Template<Value> for JsonTemplate {
    async fn instantiate(&self, item: &Value) -> Result<Box<dyn Component>> {
        match item {
            Value::Object(map) => match map.get(ITEMS_KEY) {
                Some(Value::Array(items)) => Ok(Box::new(self.panel(map.get(TITLE_KEY), items))),
                Some(other) => Err(PagerError::Construction(format!(
                    "'{ITEMS_KEY}' must be an array, found {other}"
                ))),
                None => Ok(Box::new(TextRow(render_value(item)))),
            },
            Value::Array(items) => Ok(Box::new(self.panel(None, items))),
            scalar => Ok(Box::new(TextRow(render_value(scalar)))),
        }
    }
}
