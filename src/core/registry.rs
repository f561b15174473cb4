//! Category registry: immutable built-ins, user-defined categories, and a
//! sparse overlay of per-category overrides for the built-ins.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::core::defaults::{self, builtin_categories};
use crate::domain::{Category, CategoryId, EntryKind};
use crate::errors::{BudgetError, Result};

/// Fields a user may change on a built-in category without copying it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryOverride {
    pub limit: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryRegistry {
    custom: Vec<Category>,
    overrides: BTreeMap<CategoryId, CategoryOverride>,
}

impl CategoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Built-ins (with overrides applied) followed by custom categories.
    pub fn all(&self) -> Vec<Category> {
        builtin_categories()
            .iter()
            .map(|category| self.apply_override(category))
            .chain(self.custom.iter().cloned())
            .collect()
    }

    pub fn custom(&self) -> &[Category] {
        &self.custom
    }

    pub fn overrides(&self) -> &BTreeMap<CategoryId, CategoryOverride> {
        &self.overrides
    }

    pub fn get(&self, id: &CategoryId) -> Option<Category> {
        if let Some(builtin) = defaults::builtin(id) {
            return Some(self.apply_override(builtin));
        }
        self.custom.iter().find(|category| &category.id == id).cloned()
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        defaults::is_builtin(id) || self.custom.iter().any(|category| &category.id == id)
    }

    /// Like [`Self::get`] but falls back to a placeholder record.
    pub fn lookup(&self, id: &CategoryId) -> Category {
        self.get(id).unwrap_or_else(|| Category::unknown(id))
    }

    pub fn main_categories(&self, kind: EntryKind) -> Vec<Category> {
        self.all()
            .into_iter()
            .filter(|category| category.kind == kind && category.is_main())
            .collect()
    }

    pub fn subcategories(&self, parent: &CategoryId) -> Vec<Category> {
        self.custom
            .iter()
            .filter(|category| category.parent_id.as_ref() == Some(parent))
            .cloned()
            .collect()
    }

    pub fn has_subcategories(&self, parent: &CategoryId) -> bool {
        self.custom
            .iter()
            .any(|category| category.parent_id.as_ref() == Some(parent))
    }

    /// Top-level ancestor of `id`: its parent when it has one, otherwise itself.
    /// Loading keeps subcategories one level deep, so one step is enough.
    pub fn main_category_of(&self, id: &CategoryId) -> CategoryId {
        self.get(id)
            .and_then(|category| category.parent_id)
            .unwrap_or_else(|| id.clone())
    }

    /// Effective monthly cap. An override wins over the built-in value.
    pub fn limit_for(&self, id: &CategoryId) -> Option<f64> {
        if let Some(builtin) = defaults::builtin(id) {
            return self
                .overrides
                .get(id)
                .and_then(|entry| entry.limit)
                .or(builtin.limit);
        }
        self.custom
            .iter()
            .find(|category| &category.id == id && category.is_main())
            .and_then(|category| category.limit)
    }

    pub fn add_main(&mut self, category: Category) -> Result<CategoryId> {
        if category.name.trim().is_empty() {
            return Err(BudgetError::InvalidInput("category name is required".into()));
        }
        if !category.is_main() {
            return Err(BudgetError::InvalidInput(
                "main categories cannot have a parent".into(),
            ));
        }
        if self.contains(&category.id) {
            return Err(BudgetError::InvalidInput(format!(
                "category id `{}` already exists",
                category.id
            )));
        }
        let id = category.id.clone();
        self.custom.push(Category {
            is_default: false,
            ..category
        });
        Ok(id)
    }

    pub fn add_subcategory(&mut self, parent_id: &CategoryId, name: &str) -> Result<CategoryId> {
        if name.trim().is_empty() {
            return Err(BudgetError::InvalidInput("subcategory name is required".into()));
        }
        let parent = self
            .get(parent_id)
            .ok_or_else(|| BudgetError::CategoryNotFound(parent_id.to_string()))?;
        if !parent.is_main() {
            return Err(BudgetError::InvalidInput(format!(
                "`{}` is already a subcategory; only two levels are supported",
                parent.name
            )));
        }
        let child = Category::sub_of(&parent, name.trim());
        let id = child.id.clone();
        self.custom.push(child);
        Ok(id)
    }

    pub fn set_limit(&mut self, id: &CategoryId, limit: f64) -> Result<()> {
        if !limit.is_finite() || limit < 0.0 {
            return Err(BudgetError::InvalidInput(format!(
                "limit must be a non-negative number, got {limit}"
            )));
        }
        self.write_limit(id, Some(limit))
    }

    pub fn clear_limit(&mut self, id: &CategoryId) -> Result<()> {
        self.write_limit(id, None)
    }

    fn write_limit(&mut self, id: &CategoryId, limit: Option<f64>) -> Result<()> {
        if defaults::is_builtin(id) {
            match limit {
                Some(_) => {
                    self.overrides.entry(id.clone()).or_default().limit = limit;
                }
                None => {
                    self.overrides.remove(id);
                }
            }
            return Ok(());
        }
        let category = self
            .custom
            .iter_mut()
            .find(|category| &category.id == id)
            .ok_or_else(|| BudgetError::CategoryNotFound(id.to_string()))?;
        if !category.is_main() {
            return Err(BudgetError::InvalidInput(format!(
                "limits apply to main categories; `{}` is a subcategory",
                category.name
            )));
        }
        category.limit = limit;
        Ok(())
    }

    /// Removes a custom category. Callers check transaction references first.
    pub fn remove(&mut self, id: &CategoryId) -> Result<Category> {
        if defaults::is_builtin(id) {
            return Err(BudgetError::DefaultCategoryLocked(id.to_string()));
        }
        if self.has_subcategories(id) {
            return Err(BudgetError::CategoryInUse {
                id: id.to_string(),
                reason: "has subcategories".into(),
            });
        }
        let position = self
            .custom
            .iter()
            .position(|category| &category.id == id)
            .ok_or_else(|| BudgetError::CategoryNotFound(id.to_string()))?;
        Ok(self.custom.remove(position))
    }

    /// Persistence form: custom categories followed by one record per
    /// overridden built-in.
    pub fn to_records(&self) -> Vec<Category> {
        let mut records = self.custom.clone();
        records.extend(
            self.overrides
                .keys()
                .filter_map(defaults::builtin)
                .map(|builtin| self.apply_override(builtin)),
        );
        records
    }

    /// Rebuilds a registry from persisted records, returning warnings for
    /// anything that had to be repaired or folded.
    ///
    /// Subcategories always end up one level below a main category: nested
    /// records move under their top-level ancestor, and records whose parent
    /// chain never reaches a main category become main categories.
    pub fn from_records(records: Vec<Category>) -> (Self, Vec<String>) {
        let mut registry = Self::new();
        let mut warnings = Vec::new();
        let mut seen = BTreeSet::new();
        let mut pending_subs = Vec::new();

        for record in records {
            if defaults::is_builtin(&record.id) {
                if record.limit.is_some() {
                    registry.overrides.insert(
                        record.id.clone(),
                        CategoryOverride {
                            limit: record.limit,
                        },
                    );
                }
                continue;
            }
            if !seen.insert(record.id.clone()) {
                warnings.push(format!("duplicate category `{}` skipped", record.id));
                continue;
            }
            if record.is_main() {
                registry.custom.push(Category {
                    is_default: false,
                    ..record
                });
            } else {
                pending_subs.push(record);
            }
        }

        let parents: BTreeMap<CategoryId, Option<CategoryId>> = pending_subs
            .iter()
            .map(|record| (record.id.clone(), record.parent_id.clone()))
            .collect();

        for mut record in pending_subs {
            let Some(parent_id) = record.parent_id.clone() else {
                continue;
            };
            match registry.root_of(&parents, &parent_id) {
                Some(root) => {
                    if root.id != parent_id {
                        warnings.push(format!(
                            "subcategory `{}` is nested under subcategory `{}`; moved under `{}`",
                            record.id, parent_id, root.id
                        ));
                        record.parent_id = Some(root.id.clone());
                    }
                    if root.kind != record.kind {
                        warnings.push(format!(
                            "subcategory `{}` type realigned to parent `{}` ({})",
                            record.id, root.id, root.kind
                        ));
                        record.kind = root.kind;
                    }
                    record.limit = None;
                }
                None => {
                    warnings.push(format!(
                        "subcategory `{}` references unknown parent `{}`; kept as a main category",
                        record.id, parent_id
                    ));
                    record.parent_id = None;
                }
            }
            record.is_default = false;
            registry.custom.push(record);
        }

        (registry, warnings)
    }

    /// Follows `parents` from `start` up to a main category already in the
    /// registry. `None` for a missing ancestor or a cycle.
    fn root_of(
        &self,
        parents: &BTreeMap<CategoryId, Option<CategoryId>>,
        start: &CategoryId,
    ) -> Option<Category> {
        let mut current = start.clone();
        for _ in 0..=parents.len() {
            match parents.get(&current) {
                Some(next) => current = next.clone()?,
                None => return self.get(&current).filter(|category| category.is_main()),
            }
        }
        None
    }

    fn apply_override(&self, builtin: &Category) -> Category {
        let mut resolved = builtin.clone();
        if let Some(entry) = self.overrides.get(&builtin.id) {
            resolved.limit = entry.limit.or(builtin.limit);
        }
        resolved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comida() -> CategoryId {
        CategoryId::new("comida")
    }

    #[test]
    fn lists_builtins_before_custom_categories() {
        let mut registry = CategoryRegistry::new();
        let id = registry
            .add_main(Category::main("Mascotas", EntryKind::Expense))
            .unwrap();
        let all = registry.all();
        assert_eq!(all.len(), builtin_categories().len() + 1);
        assert_eq!(all.last().map(|c| c.id.clone()), Some(id));
    }

    #[test]
    fn lookup_falls_back_to_placeholder() {
        let registry = CategoryRegistry::new();
        let missing = CategoryId::new("ghost");
        let placeholder = registry.lookup(&missing);
        assert_eq!(placeholder.name, "Sin categoría");
        assert_eq!(placeholder.icon, "❓");
        assert!(registry.get(&missing).is_none());
    }

    #[test]
    fn main_categories_filter_by_kind() {
        let registry = CategoryRegistry::new();
        let income = registry.main_categories(EntryKind::Income);
        assert_eq!(income.len(), 3);
        assert!(income.iter().all(|c| c.kind == EntryKind::Income));
    }

    #[test]
    fn subcategory_resolves_to_main_ancestor() {
        let mut registry = CategoryRegistry::new();
        let sub = registry.add_subcategory(&comida(), "Supermercado").unwrap();
        assert_eq!(registry.main_category_of(&sub), comida());
        assert_eq!(registry.main_category_of(&comida()), comida());
        assert_eq!(registry.subcategories(&comida()).len(), 1);
        let parent = registry.get(&registry.main_category_of(&sub)).unwrap();
        assert!(parent.parent_id.is_none());
    }

    #[test]
    fn nested_subcategories_are_rejected() {
        let mut registry = CategoryRegistry::new();
        let sub = registry.add_subcategory(&comida(), "Supermercado").unwrap();
        let err = registry.add_subcategory(&sub, "Verdulería").unwrap_err();
        assert!(matches!(err, BudgetError::InvalidInput(_)));
    }

    #[test]
    fn builtin_limit_lives_in_overlay_and_stays_locked() {
        let mut registry = CategoryRegistry::new();
        registry.set_limit(&comida(), 1000.0).unwrap();

        assert_eq!(registry.limit_for(&comida()), Some(1000.0));
        assert!(registry.custom().is_empty());
        let resolved = registry.get(&comida()).unwrap();
        assert!(resolved.is_default);
        assert_eq!(resolved.limit, Some(1000.0));

        let err = registry.remove(&comida()).unwrap_err();
        assert!(matches!(err, BudgetError::DefaultCategoryLocked(_)));
    }

    #[test]
    fn limits_reject_negative_and_subcategories() {
        let mut registry = CategoryRegistry::new();
        assert!(registry.set_limit(&comida(), -1.0).is_err());
        assert!(registry.set_limit(&comida(), f64::NAN).is_err());
        let sub = registry.add_subcategory(&comida(), "Delivery").unwrap();
        assert!(registry.set_limit(&sub, 10.0).is_err());
    }

    #[test]
    fn clear_limit_drops_override() {
        let mut registry = CategoryRegistry::new();
        registry.set_limit(&comida(), 500.0).unwrap();
        registry.clear_limit(&comida()).unwrap();
        assert_eq!(registry.limit_for(&comida()), None);
        assert!(registry.overrides().is_empty());
    }

    #[test]
    fn records_round_trip_through_overlay() {
        let mut registry = CategoryRegistry::new();
        let custom = registry
            .add_main(Category::main("Mascotas", EntryKind::Expense))
            .unwrap();
        registry.set_limit(&custom, 300.0).unwrap();
        registry.set_limit(&comida(), 1000.0).unwrap();
        registry.add_subcategory(&custom, "Alimento").unwrap();

        let (restored, warnings) = CategoryRegistry::from_records(registry.to_records());
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(restored, registry);
    }

    #[test]
    fn legacy_materialized_default_folds_into_overlay() {
        let mut legacy = defaults::builtin(&comida()).unwrap().clone();
        legacy.is_default = false;
        legacy.limit = Some(750.0);

        let (registry, _) = CategoryRegistry::from_records(vec![legacy]);
        assert!(registry.custom().is_empty());
        assert_eq!(registry.limit_for(&comida()), Some(750.0));
        assert_eq!(registry.all().len(), builtin_categories().len());
    }

    #[test]
    fn mismatched_subcategory_type_is_realigned() {
        let mut orphan_kind = Category::sub_of(defaults::builtin(&comida()).unwrap(), "Bonos");
        orphan_kind.kind = EntryKind::Income;

        let (registry, warnings) = CategoryRegistry::from_records(vec![orphan_kind.clone()]);
        assert_eq!(warnings.len(), 1);
        assert_eq!(registry.get(&orphan_kind.id).unwrap().kind, EntryKind::Expense);
    }

    #[test]
    fn nested_subcategory_moves_under_top_level_ancestor() {
        let super_ = Category::sub_of(defaults::builtin(&comida()).unwrap(), "Super");
        let verduras = Category::sub_of(&super_, "Verduras");

        // Child listed before its parent to exercise load order.
        let (registry, warnings) =
            CategoryRegistry::from_records(vec![verduras.clone(), super_.clone()]);
        assert_eq!(warnings.len(), 1, "{warnings:?}");
        assert!(warnings[0].contains(&format!(
            "subcategory `{}` is nested under subcategory `{}`; moved under `comida`",
            verduras.id, super_.id
        )));

        let repaired = registry.get(&verduras.id).unwrap();
        assert_eq!(repaired.parent_id, Some(comida()));
        let main = registry.get(&registry.main_category_of(&verduras.id)).unwrap();
        assert!(main.parent_id.is_none());
        assert_eq!(registry.subcategories(&comida()).len(), 2);
    }

    #[test]
    fn subcategory_with_unknown_parent_becomes_main() {
        let mut orphan = Category::sub_of(defaults::builtin(&comida()).unwrap(), "Huérfana");
        orphan.parent_id = Some(CategoryId::new("custom-gone"));

        let (registry, warnings) = CategoryRegistry::from_records(vec![orphan.clone()]);
        assert_eq!(
            warnings,
            vec![format!(
                "subcategory `{}` references unknown parent `custom-gone`; kept as a main category",
                orphan.id
            )]
        );
        let repaired = registry.get(&orphan.id).unwrap();
        assert!(repaired.is_main());
        assert_eq!(registry.main_category_of(&orphan.id), orphan.id);
        assert!(registry
            .main_categories(EntryKind::Expense)
            .iter()
            .any(|category| category.id == orphan.id));
    }

    #[test]
    fn subcategory_cycle_is_broken_into_main_categories() {
        let mut first = Category::sub_of(defaults::builtin(&comida()).unwrap(), "A");
        let mut second = Category::sub_of(defaults::builtin(&comida()).unwrap(), "B");
        first.parent_id = Some(second.id.clone());
        second.parent_id = Some(first.id.clone());

        let (registry, warnings) = CategoryRegistry::from_records(vec![first.clone(), second.clone()]);
        assert_eq!(warnings.len(), 2);
        assert!(registry.get(&first.id).unwrap().is_main());
        assert!(registry.get(&second.id).unwrap().is_main());
    }

    #[test]
    fn duplicate_subcategory_records_are_skipped() {
        let sub = Category::sub_of(defaults::builtin(&comida()).unwrap(), "Super");
        let mut copy = sub.clone();
        copy.name = "Super (copia)".into();

        let (registry, warnings) = CategoryRegistry::from_records(vec![sub.clone(), copy]);
        assert_eq!(warnings, vec![format!("duplicate category `{}` skipped", sub.id)]);
        assert_eq!(registry.custom().len(), 1);
        assert_eq!(registry.get(&sub.id).unwrap().name, "Super");
    }
}
