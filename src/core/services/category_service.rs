//! Business logic helpers for category management.

use crate::core::book::BudgetBook;
use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::category::{DEFAULT_COLOR, DEFAULT_ICON};
use crate::domain::{Category, CategoryId, EntryKind};
use crate::errors::BudgetError;

/// Form data for a new main category.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub name: String,
    pub kind: EntryKind,
    pub icon: String,
    pub color: String,
    pub is_image: bool,
}

impl NewCategory {
    pub fn new(name: impl Into<String>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            icon: DEFAULT_ICON.into(),
            color: DEFAULT_COLOR.into(),
            is_image: false,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn with_image(mut self, reference: impl Into<String>) -> Self {
        self.icon = reference.into();
        self.is_image = true;
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }
}

/// Provides validated operations for [`Category`] entities.
pub struct CategoryService;

impl CategoryService {
    /// Adds a main category with a fresh identifier.
    pub fn add_main(book: &mut BudgetBook, draft: NewCategory) -> ServiceResult<CategoryId> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Category name is required".into()));
        }
        let category = Category::main(name, draft.kind)
            .with_icon(draft.icon, draft.is_image)
            .with_color(draft.color);
        let id = book.registry.add_main(category)?;
        tracing::info!(category = %id, "main category added");
        Ok(id)
    }

    /// Adds a subcategory that inherits presentation and type from its parent.
    pub fn add_subcategory(
        book: &mut BudgetBook,
        parent: &CategoryId,
        name: &str,
    ) -> ServiceResult<CategoryId> {
        if name.trim().is_empty() {
            return Err(ServiceError::Invalid("Subcategory name is required".into()));
        }
        let id = book.registry.add_subcategory(parent, name)?;
        tracing::info!(category = %id, parent = %parent, "subcategory added");
        Ok(id)
    }

    /// Removes a custom category after verifying nothing depends on it.
    pub fn remove(book: &mut BudgetBook, id: &CategoryId) -> ServiceResult<Category> {
        if book.transactions.references(id) {
            let err = BudgetError::CategoryInUse {
                id: id.to_string(),
                reason: "has linked transactions".into(),
            };
            tracing::warn!(category = %id, "refusing to delete category: {err}");
            return Err(err.into());
        }
        book.registry.remove(id).map_err(|err| {
            tracing::warn!(category = %id, "refusing to delete category: {err}");
            ServiceError::from(err)
        })
    }

    /// Sets the monthly cap of a main category.
    pub fn set_limit(book: &mut BudgetBook, id: &CategoryId, limit: f64) -> ServiceResult<()> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(ServiceError::Invalid(
                "Limit must be a non-negative number".into(),
            ));
        }
        book.registry.set_limit(id, limit)?;
        tracing::info!(category = %id, limit, "monthly limit set");
        Ok(())
    }

    pub fn clear_limit(book: &mut BudgetBook, id: &CategoryId) -> ServiceResult<()> {
        book.registry.clear_limit(id)?;
        tracing::info!(category = %id, "monthly limit cleared");
        Ok(())
    }

    /// Returns a snapshot of all categories.
    pub fn list(book: &BudgetBook) -> Vec<Category> {
        book.registry.all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_main_rejects_blank_names() {
        let mut book = BudgetBook::new();
        let err = CategoryService::add_main(&mut book, NewCategory::new("   ", EntryKind::Expense))
            .expect_err("blank name fails");
        assert!(
            matches!(err, ServiceError::Invalid(ref message) if message.contains("required")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn remove_blocks_parent_with_children() {
        let mut book = BudgetBook::new();
        let parent =
            CategoryService::add_main(&mut book, NewCategory::new("Mascotas", EntryKind::Expense))
                .unwrap();
        CategoryService::add_subcategory(&mut book, &parent, "Veterinario").unwrap();

        let err = CategoryService::remove(&mut book, &parent).expect_err("has child");
        assert!(
            matches!(err, ServiceError::Core(BudgetError::CategoryInUse { ref reason, .. }) if reason.contains("subcategories")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn image_icons_are_kept_on_the_record() {
        let mut book = BudgetBook::new();
        let id = CategoryService::add_main(
            &mut book,
            NewCategory::new("Viajes", EntryKind::Expense).with_image("data:image/png;base64,AA"),
        )
        .unwrap();
        let category = book.registry.get(&id).unwrap();
        assert!(category.is_image);
        assert!(!category.is_default);
    }
}
