use colored::Colorize;

use crate::cli::context::{CommandResult, ShellContext};
use crate::cli::output;
use crate::cli::registry::CommandDefinition;
use crate::cli::table::{Table, TableColumn};
use crate::currency::{format_currency, Currency};

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("summary", "Show income, expense and balance", "summary", cmd_summary),
        CommandDefinition::new(
            "budget",
            "Show this month's spend against each category limit",
            "budget",
            cmd_budget,
        ),
        CommandDefinition::new("monthly", "Show income and expense of the last six months", "monthly", cmd_monthly),
        CommandDefinition::new("breakdown", "Show expenses per main category", "breakdown", cmd_breakdown),
    ]
}

fn ars(amount: f64) -> String {
    format_currency(amount, Currency::ARS)
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.manager.totals();
    let mut table = Table::new(vec![TableColumn::left("Total"), TableColumn::right("Amount")]);
    table.push(vec!["Income".into(), ars(totals.total_income)]);
    table.push(vec!["Expenses".into(), ars(totals.total_expense)]);
    table.push(vec!["Balance".into(), ars(totals.balance)]);
    output::info(table.render());
    output::info(format!(
        "USD amounts converted at {} per dollar.",
        ars(context.manager.converter().usd_to_ars())
    ));
    Ok(())
}

fn cmd_budget(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let statuses = context.manager.budget_control();
    if statuses.is_empty() {
        output::info("No expense category has a monthly limit.");
        output::hint("Set one with `limit <category-id> <amount>`.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category").truncated(32),
        TableColumn::right("Spent"),
        TableColumn::right("Limit"),
        TableColumn::right("Remaining"),
        TableColumn::right("Used"),
        TableColumn::left("Status"),
    ]);
    for status in &statuses {
        let state = if status.over_budget {
            "over".bright_red().to_string()
        } else {
            "ok".green().to_string()
        };
        table.push(vec![
            status.category.name.clone(),
            ars(status.spent),
            ars(status.limit),
            ars(status.remaining),
            format!("{:.0}%", status.percentage),
            state,
        ]);
    }
    output::section(format!("Budget for {}", context.manager.clock().today().format("%Y-%m")));
    output::info(table.render());
    Ok(())
}

fn cmd_monthly(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let series = context.manager.monthly_series();
    if series.is_empty() {
        output::info("No transactions recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Month"),
        TableColumn::right("Income"),
        TableColumn::right("Expense"),
    ]);
    for point in series {
        table.push(vec![point.month.to_string(), ars(point.income), ars(point.expense)]);
    }
    output::info(table.render());
    Ok(())
}

fn cmd_breakdown(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let slices = context.manager.category_breakdown();
    if slices.is_empty() {
        output::info("No expenses recorded yet.");
        return Ok(());
    }
    let mut table = Table::new(vec![
        TableColumn::left("Category").truncated(32),
        TableColumn::right("Amount"),
        TableColumn::right("Share"),
    ]);
    for slice in slices {
        table.push(vec![
            slice.name,
            ars(slice.value),
            format!("{:.1}%", slice.share * 100.0),
        ]);
    }
    output::info(table.render());
    Ok(())
}
