//! Domain types representing budget categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

pub const DEFAULT_ICON: &str = "📌";
pub const DEFAULT_COLOR: &str = "#95A5A6";
const UNKNOWN_ICON: &str = "❓";
const UNKNOWN_NAME: &str = "Sin categoría";

/// Stable category identifier. Built-ins use readable slugs, custom entries
/// get a time-ordered suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub String);

impl CategoryId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn generate_main() -> Self {
        Self(format!("custom-{}", Uuid::now_v7().simple()))
    }

    pub(crate) fn generate_sub() -> Self {
        Self(format!("sub-{}", Uuid::now_v7().simple()))
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Borrowed view over the two icon representations a category can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryIcon<'a> {
    Glyph(&'a str),
    /// Embedded image reference, usually a data URL.
    Image(&'a str),
}

/// Groups transactions for reporting. `parent_id == None` marks a main category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
    pub color: String,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default)]
    pub is_image: bool,
    #[serde(default)]
    pub parent_id: Option<CategoryId>,
    #[serde(default)]
    pub limit: Option<f64>,
}

impl Category {
    /// Builds a custom main category with a fresh identifier.
    pub fn main(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            id: CategoryId::generate_main(),
            name: name.into(),
            icon: DEFAULT_ICON.into(),
            color: DEFAULT_COLOR.into(),
            kind,
            is_default: false,
            is_image: false,
            parent_id: None,
            limit: None,
        }
    }

    /// Builds a subcategory that inherits icon, colour and type from `parent`,
    /// so the type-matches-parent rule holds by construction.
    pub fn sub_of(parent: &Category, name: impl Into<String>) -> Self {
        Self {
            id: CategoryId::generate_sub(),
            name: name.into(),
            icon: parent.icon.clone(),
            color: parent.color.clone(),
            kind: parent.kind,
            is_default: false,
            is_image: parent.is_image,
            parent_id: Some(parent.id.clone()),
            limit: None,
        }
    }

    pub(crate) fn builtin(
        id: &str,
        name: &str,
        icon: &str,
        color: &str,
        kind: EntryKind,
    ) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
            icon: icon.into(),
            color: color.into(),
            kind,
            is_default: true,
            is_image: false,
            parent_id: None,
            limit: None,
        }
    }

    /// Placeholder returned when a lookup misses.
    pub fn unknown(id: &CategoryId) -> Self {
        Self {
            id: id.clone(),
            name: UNKNOWN_NAME.into(),
            icon: UNKNOWN_ICON.into(),
            color: DEFAULT_COLOR.into(),
            kind: EntryKind::Expense,
            is_default: false,
            is_image: false,
            parent_id: None,
            limit: None,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>, is_image: bool) -> Self {
        self.icon = icon.into();
        self.is_image = is_image;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn is_main(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn icon(&self) -> CategoryIcon<'_> {
        if self.is_image {
            CategoryIcon::Image(&self.icon)
        } else {
            CategoryIcon::Glyph(&self.icon)
        }
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        let glyph = match self.icon() {
            CategoryIcon::Glyph(glyph) => glyph,
            CategoryIcon::Image(_) => "🖼",
        };
        format!("{} {} ({})", glyph, self.name, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subcategory_inherits_parent_presentation_and_kind() {
        let parent = Category::main("Mascotas", EntryKind::Expense)
            .with_icon("🐶", false)
            .with_color("#123456");
        let child = Category::sub_of(&parent, "Veterinario");

        assert_eq!(child.kind, EntryKind::Expense);
        assert_eq!(child.icon, "🐶");
        assert_eq!(child.color, "#123456");
        assert_eq!(child.parent_id.as_ref(), Some(&parent.id));
        assert!(child.id.as_str().starts_with("sub-"));
        assert!(!child.is_main());
    }

    #[test]
    fn deserializes_original_record_shape() {
        let json = r##"{
            "id": "custom-1700000000000",
            "name": "Mascotas",
            "icon": "data:image/png;base64,AAAA",
            "color": "#95A5A6",
            "type": "expense",
            "isDefault": false,
            "isImage": true,
            "parentId": null,
            "limit": 25000
        }"##;
        let category: Category = serde_json::from_str(json).unwrap();
        assert_eq!(category.id.as_str(), "custom-1700000000000");
        assert_eq!(category.limit, Some(25000.0));
        assert!(matches!(category.icon(), CategoryIcon::Image(_)));
        assert!(category.is_main());
    }

    #[test]
    fn missing_optional_fields_default() {
        let json = r##"{"id":"sub-1","name":"Pan","icon":"🍔","color":"#FF6B6B","type":"expense","parentId":"comida"}"##;
        let category: Category = serde_json::from_str(json).unwrap();
        assert!(!category.is_default);
        assert_eq!(category.limit, None);
        assert_eq!(category.parent_id, Some(CategoryId::new("comida")));
    }
}
