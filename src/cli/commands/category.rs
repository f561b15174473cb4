use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandDefinition;
use crate::cli::table::{Table, TableColumn};
use crate::core::registry::CategoryRegistry;
use crate::core::services::NewCategory;
use crate::currency::{format_currency, Currency};
use crate::domain::{Category, CategoryIcon, Displayable, EntryKind, NamedEntity};
use crate::errors::BudgetError;

use super::{category_id, parse_amount, parse_kind, usage_error, ParsedArgs};

const CATEGORY_ADD_USAGE: &str =
    "category-add <income|expense> <name> [--icon glyph] [--image data-url] [--color #hex]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "categories",
            "List main categories with their subcategories",
            "categories [income|expense]",
            cmd_categories,
        ),
        CommandDefinition::new(
            "subcategories",
            "List the subcategories of a main category",
            "subcategories <category-id>",
            cmd_subcategories,
        ),
        CommandDefinition::new(
            "category-add",
            "Create a main category",
            CATEGORY_ADD_USAGE,
            cmd_category_add,
        ),
        CommandDefinition::new(
            "subcategory-add",
            "Create a subcategory under a main category",
            "subcategory-add <category-id> <name>",
            cmd_subcategory_add,
        ),
        CommandDefinition::new(
            "category-remove",
            "Delete a custom category without transactions or subcategories",
            "category-remove <category-id>",
            cmd_category_remove,
        ),
        CommandDefinition::new(
            "limit",
            "Set the monthly spending limit of a main category",
            "limit <category-id> <amount>",
            cmd_limit,
        ),
        CommandDefinition::new(
            "limit-clear",
            "Remove the monthly limit of a main category",
            "limit-clear <category-id>",
            cmd_limit_clear,
        ),
    ]
}

fn display_name(category: &Category) -> String {
    match category.icon() {
        CategoryIcon::Glyph(glyph) => format!("{glyph} {}", category.name()),
        CategoryIcon::Image(_) => category.name().to_string(),
    }
}

fn push_category_rows(table: &mut Table, registry: &CategoryRegistry, kind: EntryKind) {
    for main in registry.main_categories(kind) {
        let limit = registry
            .limit_for(&main.id)
            .map(|limit| format_currency(limit, Currency::ARS))
            .unwrap_or_else(|| "-".into());
        table.push(vec![
            main.id.to_string(),
            display_name(&main),
            kind.as_str().into(),
            limit,
            if main.is_default { "yes" } else { "" }.into(),
        ]);
        for sub in registry.subcategories(&main.id) {
            table.push(vec![
                sub.id.to_string(),
                format!("  └ {}", sub.name),
                kind.as_str().into(),
                String::new(),
                String::new(),
            ]);
        }
    }
}

fn cmd_categories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let kinds = match args.first() {
        Some(raw) => vec![parse_kind(raw)?],
        None => vec![EntryKind::Expense, EntryKind::Income],
    };
    let mut table = Table::new(vec![
        TableColumn::left("Id"),
        TableColumn::left("Name").truncated(32),
        TableColumn::left("Type"),
        TableColumn::right("Limit"),
        TableColumn::left("Built-in"),
    ]);
    for kind in kinds {
        push_category_rows(&mut table, &context.manager.book().registry, kind);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_subcategories(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| usage_error("subcategories <category-id>"))?;
    let registry = &context.manager.book().registry;
    let parent = registry
        .get(&category_id(raw))
        .ok_or_else(|| BudgetError::CategoryNotFound(raw.to_string()))?;
    let subcategories = registry.subcategories(&parent.id);
    if subcategories.is_empty() {
        output::info(format!("{} has no subcategories.", parent.name));
        return Ok(());
    }
    let mut table = Table::new(vec![TableColumn::left("Id"), TableColumn::left("Name")]);
    for sub in subcategories {
        table.push(vec![sub.id.to_string(), sub.name]);
    }
    output::section(parent.display_label());
    output::info(table.render());
    Ok(())
}

fn cmd_category_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &["icon", "image", "color"])?;
    parsed.expect_positional(2, CATEGORY_ADD_USAGE)?;
    let kind = parse_kind(parsed.positional[0])?;
    let name = parsed.positional[1..].join(" ");
    let mut draft = NewCategory::new(name, kind);
    if let Some(icon) = parsed.option("icon") {
        draft = draft.with_icon(icon);
    }
    if let Some(reference) = parsed.option("image") {
        draft = draft.with_image(reference);
    }
    if let Some(color) = parsed.option("color") {
        draft = draft.with_color(color);
    }
    let id = context.manager.add_main_category(draft)?;
    output::success(format!("Created {} category {id}", kind.as_str()));
    context.report_save();
    Ok(())
}

fn cmd_subcategory_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() < 2 {
        return Err(usage_error("subcategory-add <category-id> <name>"));
    }
    let parent = category_id(args[0]);
    let name = args[1..].join(" ");
    let id = context.manager.add_subcategory(&parent, &name)?;
    output::success(format!("Created subcategory {id} under {parent}"));
    context.report_save();
    Ok(())
}

fn cmd_category_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| usage_error("category-remove <category-id>"))?;
    let removed = context.manager.remove_category(&category_id(raw))?;
    output::success(format!("Removed category {}", removed.name));
    context.report_save();
    Ok(())
}

fn cmd_limit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.len() != 2 {
        return Err(usage_error("limit <category-id> <amount>"));
    }
    let id = category_id(args[0]);
    let limit = parse_amount(args[1])?;
    context.manager.set_limit(&id, limit)?;
    output::success(format!(
        "Monthly limit for {id} set to {}",
        format_currency(limit, Currency::ARS)
    ));
    context.report_save();
    Ok(())
}

fn cmd_limit_clear(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| usage_error("limit-clear <category-id>"))?;
    let id = category_id(raw);
    context.manager.clear_limit(&id)?;
    output::success(format!("Monthly limit for {id} cleared"));
    context.report_save();
    Ok(())
}
