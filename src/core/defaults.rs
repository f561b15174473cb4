//! Built-in categories shipped with every book.

use once_cell::sync::Lazy;

use crate::domain::{Category, CategoryId, EntryKind};

static BUILTIN_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    use EntryKind::{Expense, Income};
    vec![
        Category::builtin("comida", "Comida", "🍔", "#FF6B6B", Expense),
        Category::builtin("salud", "Salud", "🏥", "#4ECDC4", Expense),
        Category::builtin("auto", "Auto", "🚗", "#45B7D1", Expense),
        Category::builtin("impuestos", "Impuestos", "📋", "#96CEB4", Expense),
        Category::builtin("luz", "Luz", "💡", "#FFEAA7", Expense),
        Category::builtin("agua", "Agua", "💧", "#74B9FF", Expense),
        Category::builtin("gas", "Gas", "🔥", "#FD79A8", Expense),
        Category::builtin("mejoras", "Mejoras del hogar", "🏠", "#A29BFE", Expense),
        Category::builtin("educacion", "Educación", "📚", "#6C5CE7", Expense),
        Category::builtin("entretenimiento", "Entretenimiento", "🎮", "#FD79A8", Expense),
        Category::builtin("salario", "Salario", "💼", "#00B894", Income),
        Category::builtin("freelance", "Freelance", "💻", "#00CEC9", Income),
        Category::builtin("inversion", "Inversión", "📈", "#0984E3", Income),
    ]
});

pub fn builtin_categories() -> &'static [Category] {
    &BUILTIN_CATEGORIES
}

pub fn builtin(id: &CategoryId) -> Option<&'static Category> {
    BUILTIN_CATEGORIES.iter().find(|category| &category.id == id)
}

pub fn is_builtin(id: &CategoryId) -> bool {
    builtin(id).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn builtins_are_unique_main_categories_without_limits() {
        let ids: HashSet<_> = builtin_categories().iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), builtin_categories().len());
        assert!(builtin_categories()
            .iter()
            .all(|c| c.is_default && c.is_main() && c.limit.is_none()));
    }

    #[test]
    fn ships_ten_expense_and_three_income_categories() {
        let expense = builtin_categories()
            .iter()
            .filter(|c| c.kind == EntryKind::Expense)
            .count();
        assert_eq!(expense, 10);
        assert_eq!(builtin_categories().len() - expense, 3);
    }
}
