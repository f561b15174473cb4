use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandDefinition;
use crate::cli::table::{Table, TableColumn};
use crate::core::services::{NewCategory, TransactionService};
use crate::currency::format_currency;
use crate::domain::{NewTransaction, Transaction, TransactionId};

use super::{
    parse_amount, parse_currency, parse_date, parse_kind, usage_error, ParsedArgs,
};

const ADD_USAGE: &str =
    "add <income|expense> <amount> <category-id> [--currency ARS|USD] [--date YYYY-MM-DD] [--note text]";
const ADD_NEW_USAGE: &str = "add-new <income|expense> <amount> <new-category-name> [--icon glyph] [--color #hex] [--currency ARS|USD] [--date YYYY-MM-DD] [--note text]";
const DRAFT_OPTIONS: [&str; 3] = ["currency", "date", "note"];

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("add", "Record an income or expense", ADD_USAGE, cmd_add),
        CommandDefinition::new(
            "add-new",
            "Record a transaction under a category created on the spot",
            ADD_NEW_USAGE,
            cmd_add_new,
        ),
        CommandDefinition::new("remove", "Delete a transaction", "remove <transaction-id>", cmd_remove),
        CommandDefinition::new("list", "Show transactions, newest first", "list [count]", cmd_list),
    ]
}

fn draft_from(
    context: &ShellContext,
    parsed: &ParsedArgs<'_>,
    category: &str,
) -> Result<NewTransaction, CommandError> {
    let kind = parse_kind(parsed.positional[0])?;
    let amount = parse_amount(parsed.positional[1])?;
    let currency = parse_currency(parsed.option("currency"))?;
    let date = match parsed.option("date") {
        Some(raw) => parse_date(raw)?,
        None => context.manager.clock().today(),
    };
    let mut draft = NewTransaction::new(kind, amount, currency, category, date);
    if let Some(note) = parsed.option("note") {
        draft = draft.with_note(note);
    }
    Ok(draft)
}

fn announce(context: &ShellContext, transaction: &Transaction) {
    let category = context.manager.book().registry.lookup(&transaction.category);
    output::success(format!(
        "Recorded {} of {} in {} (id {})",
        transaction.kind.as_str(),
        format_currency(transaction.amount, transaction.currency),
        category.name,
        transaction.id
    ));
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let parsed = ParsedArgs::parse(args, &DRAFT_OPTIONS)?;
    parsed.expect_positional(3, ADD_USAGE)?;
    let draft = draft_from(context, &parsed, parsed.positional[2])?;
    let transaction = context.manager.add_transaction(draft)?;
    announce(context, &transaction);
    context.report_save();
    Ok(())
}

fn cmd_add_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut known = DRAFT_OPTIONS.to_vec();
    known.extend(["icon", "color"]);
    let parsed = ParsedArgs::parse(args, &known)?;
    parsed.expect_positional(3, ADD_NEW_USAGE)?;
    let name = parsed.positional[2..].join(" ");
    // The category id is assigned by the manager; the draft's is replaced.
    let draft = draft_from(context, &parsed, "")?;
    let mut category = NewCategory::new(name, draft.kind);
    if let Some(icon) = parsed.option("icon") {
        category = category.with_icon(icon);
    }
    if let Some(color) = parsed.option("color") {
        category = category.with_color(color);
    }
    let transaction = context
        .manager
        .add_transaction_with_new_category(draft, category)?;
    announce(context, &transaction);
    context.report_save();
    Ok(())
}

fn cmd_remove(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args.first().ok_or_else(|| usage_error("remove <transaction-id>"))?;
    let id = TransactionId::parse(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{raw}` is not a transaction id"))
    })?;
    let removed = context.manager.remove_transaction(id)?;
    output::success(format!(
        "Removed {} of {}",
        removed.kind.as_str(),
        format_currency(removed.amount, removed.currency)
    ));
    context.report_save();
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let count = match args.first() {
        Some(raw) => raw.parse::<usize>().map_err(|_| usage_error("list [count]"))?,
        None => usize::MAX,
    };
    let book = context.manager.book();
    if book.transactions.is_empty() {
        output::info("No transactions recorded yet. Use `add` to record one.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Date"),
        TableColumn::left("Type"),
        TableColumn::right("Amount"),
        TableColumn::left("Category").truncated(32),
        TableColumn::left("Note").truncated(24),
        TableColumn::left("Id"),
    ]);
    for transaction in TransactionService::list(book).into_iter().take(count) {
        let category = book.registry.lookup(&transaction.category);
        let label = if transaction.category == transaction.main_category {
            category.name
        } else {
            let main = book.registry.lookup(&transaction.main_category);
            format!("{} / {}", main.name, category.name)
        };
        table.push(vec![
            transaction.date.format("%Y-%m-%d").to_string(),
            transaction.kind.to_string(),
            format_currency(transaction.amount, transaction.currency),
            label,
            transaction.note.clone().unwrap_or_default(),
            transaction.id.to_string(),
        ]);
    }
    output::info(table.render());
    Ok(())
}
