//! Plain-text rendering of a [`TaxResult`].
//!
//! Every section builder is a pure function returning lines; callers decide
//! whether the lines go to the terminal or into a file. Lines are laid out for
//! a 70 column report with a 35 column label.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tax_core::calculations::common::percentage;
use tax_core::{
    BracketBreakdown, BracketRule, PaymentFrequency, PaymentSchedule, TaxResult, TaxYearConfig,
};

use crate::utils::{format_currency, format_currency_whole, format_percent, format_rate};

pub const REPORT_WIDTH: usize = 70;

/// Title printed above results shown in the terminal.
pub const CONSOLE_TITLE: &str = "TAX CALCULATION RESULTS";

/// Title written at the top of saved report files.
pub const FILE_TITLE: &str = "GREEK FREELANCER TAX CALCULATION RESULTS";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn rule(c: char) -> String {
    c.to_string().repeat(REPORT_WIDTH)
}

fn row(
    label: &str,
    value: &str,
) -> String {
    format!("{label:<35} {value:>34}")
}

fn percent_row(
    label: &str,
    rate: Decimal,
) -> String {
    format!("{label:<35} {:>33}%", format!("{:.2}", percentage(rate)))
}

fn section_header(title: &str) -> Vec<String> {
    vec![rule('-'), title.to_string(), rule('-')]
}

pub fn format_input_parameters(result: &TaxResult) -> Vec<String> {
    let mut lines = section_header("INPUT PARAMETERS");
    lines.push(row("Gross Annual Income:", &format_currency(result.gross_income)));
    lines.push(row(
        "Deductible Business Expenses:",
        &format_currency(result.deductible_expenses),
    ));
    lines.push(row("Payment Frequency:", result.frequency().label()));
    lines
}

pub fn format_income_breakdown(result: &TaxResult) -> Vec<String> {
    let mut lines = section_header("INCOME BREAKDOWN");
    lines.push(row("Gross Income:", &format_currency(result.gross_income)));
    lines.push(row(
        "Less: Deductible Expenses:",
        &format_currency(result.deductible_expenses),
    ));
    lines.push(row("Taxable Income:", &format_currency(result.taxable_income)));
    lines
}

fn bracket_range(breakdown: &BracketBreakdown) -> String {
    let min = format_currency(breakdown.min_income);
    match breakdown.max_income {
        Some(max) => format!("{min} - {}", format_currency(max)),
        None => format!("{min}+"),
    }
}

/// Per-bracket income tax, followed by the total and effective rate.
pub fn format_income_tax_breakdown(result: &TaxResult) -> Vec<String> {
    let mut lines = section_header("INCOME TAX BREAKDOWN BY BRACKET");

    if result.bracket_breakdown.is_empty() {
        lines.push("  No income tax (taxable income is zero)".to_string());
    }
    for bracket in &result.bracket_breakdown {
        lines.push(format!(
            "  {:<30} @ {:>4}",
            bracket_range(bracket),
            format_rate(bracket.tax_rate)
        ));
        lines.push(format!(
            "    {:<30} {:>30}",
            "Taxable amount:",
            format_currency(bracket.taxable_amount)
        ));
        lines.push(format!(
            "    {:<30} {:>30}",
            "Tax on this bracket:",
            format_currency(bracket.tax_amount)
        ));
        lines.push(String::new());
    }

    lines.push(row("Total Income Tax:", &format_currency(result.total_income_tax)));
    lines.push(percent_row(
        "Effective Income Tax Rate:",
        result.effective_income_tax_rate,
    ));
    lines
}

/// VAT collected from clients and the EFKA split.
pub fn format_vat_and_social_security(
    result: &TaxResult,
    config: &TaxYearConfig,
) -> Vec<String> {
    let mut lines = section_header("VAT AND SOCIAL SECURITY");

    lines.push(row(
        &format!("VAT ({}):", format_rate(config.vat_rate)),
        &format_currency(result.vat_amount),
    ));
    lines.push("  (To be collected from clients)".to_string());
    lines.push(String::new());
    lines.push(row(
        &format!("Social Security (EFKA - {}):", format_rate(config.efka_total_rate())),
        &format_currency(result.efka_total),
    ));
    lines.push(format!(
        "  {:<35} {:>34}",
        format!("Main Insurance ({}):", format_percent(config.efka_main_rate)),
        format_currency(result.efka_main)
    ));
    lines.push(format!(
        "  {:<35} {:>34}",
        format!(
            "Additional Contributions ({}):",
            format_percent(config.efka_additional_rate)
        ),
        format_currency(result.efka_additional)
    ));
    lines
}

/// Installment summary; individual payments are listed when there is more than one.
pub fn format_payment_schedule(schedule: &PaymentSchedule) -> Vec<String> {
    let mut lines = section_header(&format!(
        "PAYMENT SCHEDULE ({})",
        schedule.frequency.as_str().to_uppercase()
    ));
    lines.push(row(
        "Total Annual Tax (excl. VAT):",
        &format_currency(schedule.annual_total),
    ));
    lines.push(row(
        "Number of Payments:",
        &schedule.installment_count.to_string(),
    ));
    lines.push(row(
        "Amount per Payment:",
        &format_currency(schedule.installment_amount),
    ));

    if schedule.installment_count > 1 {
        lines.push(String::new());
        lines.push("  Payment Schedule:".to_string());
        for installment in &schedule.installments {
            lines.push(format!(
                "    {:<30} {:>34}",
                format!("Payment #{}", installment.period_number),
                format_currency(installment.amount)
            ));
        }
    }
    lines
}

/// Totals, net income and the VAT reminder.
pub fn format_summary(result: &TaxResult) -> Vec<String> {
    vec![
        rule('='),
        "SUMMARY".to_string(),
        rule('='),
        row("Gross Income:", &format_currency(result.gross_income)),
        row(
            "Total Taxes (Income Tax + EFKA):",
            &format_currency(result.total_tax_burden),
        ),
        percent_row("Effective Total Tax Rate:", result.effective_total_rate),
        row("Net Income (After Taxes):", &format_currency(result.net_income)),
        rule('='),
        String::new(),
        format!(
            "Note: VAT of {} should be collected from clients",
            format_currency(result.vat_amount)
        ),
        "      and remitted to tax authorities separately.".to_string(),
        rule('='),
    ]
}

/// Full report: title block followed by every section.
pub fn render_report(
    result: &TaxResult,
    config: &TaxYearConfig,
    title: &str,
    calculated_at: NaiveDateTime,
) -> Vec<String> {
    let mut lines = vec![
        rule('='),
        title.to_string(),
        rule('='),
        format!("Calculation Date: {}", calculated_at.format(TIMESTAMP_FORMAT)),
        rule('='),
    ];

    let sections = [
        format_input_parameters(result),
        format_income_breakdown(result),
        format_income_tax_breakdown(result),
        format_vat_and_social_security(result, config),
        format_payment_schedule(&result.schedule),
        format_summary(result),
    ];
    for section in sections {
        lines.push(String::new());
        lines.extend(section);
    }
    lines
}

fn bracket_description(bracket: &BracketRule) -> String {
    let rate = format_rate(bracket.tax_rate);
    match bracket.max_income {
        Some(max) => format!(
            "{} - {}: {rate}",
            format_currency_whole(bracket.min_income),
            format_currency_whole(max)
        ),
        None => format!("Over {}: {rate}", format_currency_whole(bracket.min_income)),
    }
}

/// Human-readable dump of the tax year configuration.
pub fn format_config_summary(config: &TaxYearConfig) -> Vec<String> {
    let divider = "-".repeat(60);
    let mut lines = vec![
        format!("Greek Tax Configuration Summary ({})", config.tax_year),
        "=".repeat(60),
        format!("Last Updated: {}", config.last_updated.format("%Y-%m-%d")),
        String::new(),
        "Income Tax Brackets:".to_string(),
        divider.clone(),
    ];
    lines.extend(
        config
            .brackets
            .iter()
            .map(|b| format!("  {}", bracket_description(b))),
    );

    let frequencies: Vec<&str> = PaymentFrequency::ALL
        .iter()
        .map(|f| f.as_str())
        .collect();

    lines.extend([
        String::new(),
        "Other Rates:".to_string(),
        divider.clone(),
        format!("  VAT Rate: {}", format_percent(config.vat_rate)),
        format!("  EFKA Main Rate: {}", format_percent(config.efka_main_rate)),
        format!(
            "  EFKA Additional Rate: {}",
            format_percent(config.efka_additional_rate)
        ),
        format!("  EFKA Total Rate: {}", format_percent(config.efka_total_rate())),
        String::new(),
        "Validation Limits:".to_string(),
        divider.clone(),
        format!(
            "  Maximum Annual Income: {}",
            format_currency_whole(config.max_annual_income)
        ),
        String::new(),
        "Payment Frequencies:".to_string(),
        divider,
        format!("  {}", frequencies.join(", ")),
    ]);
    lines
}
