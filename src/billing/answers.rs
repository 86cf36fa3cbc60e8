//! Building the fill context from prompted answers.

use crate::billing::config::{FieldDef, FieldsConfig, TODAY};
use crate::billing::format::{NumberFormat, format_date};
use crate::billing::prompt::Prompter;
use crate::common::Result;
use crate::template::{Context, Value};
use chrono::NaiveDate;

const DESCRIPTION: &str = "description";

/// Ask for every configured value and build the fill context.
///
/// In order:
///
/// 1. each scalar field, stored as text; an empty answer takes the field's
///    default, and `{today}` becomes `today` in the field's date format;
/// 2. line items, when item fields are configured, until an empty
///    description; each item gets `amount = qty * rate`;
/// 3. `subtotal`, `tax`, and `total` as formatted text.
pub fn collect_answers<P: Prompter + ?Sized>(
    config: &FieldsConfig,
    prompter: &mut P,
    today: NaiveDate,
) -> Result<Context> {
    // Fail on a bad number format before any question is asked
    let number_format = NumberFormat::parse(&config.totals.number_format)?;
    let mut answers = Context::new();

    for field in &config.fields {
        let value = ask_field(prompter, field.label(), field)?;
        let value = if value == TODAY {
            format_date(today, field.date_format())?
        } else {
            value
        };
        answers.insert(field.key.clone(), value);
    }

    let items = collect_items(config, prompter)?;
    let subtotal: f64 = items.iter().map(amount_of).sum();
    let tax = subtotal * config.totals.tax_rate;
    let total = subtotal + tax;
    log::debug!(
        "{} items, subtotal {}, tax {}, total {}",
        items.len(),
        subtotal,
        tax,
        total
    );

    answers.insert(
        config.items.context_key.clone(),
        items.into_iter().map(Value::Map).collect::<Vec<_>>(),
    );
    answers.insert("subtotal", number_format.format(subtotal));
    answers.insert("tax", number_format.format(tax));
    answers.insert("total", number_format.format(total));

    Ok(answers)
}

fn collect_items<P: Prompter + ?Sized>(config: &FieldsConfig, prompter: &mut P) -> Result<Vec<Context>> {
    let mut items = Vec::new();
    if config.items.fields.is_empty() {
        return Ok(items);
    }

    prompter.say("\nEnter line items. Leave Item Description empty to finish.")?;
    for index in 1.. {
        let description = prompter
            .ask(&format!("Item {} - Item Description: ", index))?
            .trim()
            .to_string();
        if description.is_empty() {
            break;
        }

        let mut record = Context::new();
        record.insert(DESCRIPTION, description);
        for field in config.items.fields.iter().filter(|f| f.key != DESCRIPTION) {
            let label = format!("Item {} - {}", index, field.label());
            let value = ask_field(prompter, &label, field)?;
            record.insert(field.key.clone(), value);
        }

        let amount = line_amount(&record);
        record.insert("amount", amount);
        items.push(record);
    }
    Ok(items)
}

/// Ask one question, applying the field's default to an empty answer.
fn ask_field<P: Prompter + ?Sized>(prompter: &mut P, label: &str, field: &FieldDef) -> Result<String> {
    let default = field.default_text();
    let prompt = match &default {
        Some(default) => format!("{} [{}]: ", label, default),
        None => format!("{}: ", label),
    };

    let answer = prompter.ask(&prompt)?.trim().to_string();
    Ok(match default {
        Some(default) if answer.is_empty() => default,
        _ => answer,
    })
}

/// `qty * rate` for one record.
///
/// Missing or empty operands count as zero. A non-numeric operand leaves
/// the amount empty.
fn line_amount(record: &Context) -> Value {
    match (operand(record, "qty"), operand(record, "rate")) {
        (Some(qty), Some(rate)) => Value::from(qty * rate),
        _ => Value::Text(String::new()),
    }
}

fn operand(record: &Context, key: &str) -> Option<f64> {
    match record.get(key) {
        None | Some(Value::Null) => Some(0.0),
        Some(Value::Text(text)) if text.trim().is_empty() => Some(0.0),
        Some(Value::Text(text)) => text.trim().parse().ok(),
        Some(Value::Number(n)) => n.as_f64(),
        Some(_) => None,
    }
}

fn amount_of(record: &Context) -> f64 {
    match record.get("amount") {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::Text(text)) => text.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::billing::prompt::ScriptedPrompter;
    use crate::template::resolve;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 24).unwrap()
    }

    fn items(ctx: &Context) -> Vec<&Context> {
        ctx.get("items")
            .and_then(Value::as_list)
            .map(|list| list.iter().filter_map(Value::as_map).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_sample_invoice() {
        // Scalar fields, then one line per item, then the empty description
        #[rustfmt::skip]
        let mut prompter = ScriptedPrompter::new([
            "1001", "", "Ada Ltd", "1 Main St", "",
            "Widget A", "2", "50",
            "Widget B", "", "80",
            "",
        ]);
        let ctx = collect_answers(&FieldsConfig::sample(), &mut prompter, today()).unwrap();

        assert_eq!(resolve("invoice_no", &ctx), "1001");
        assert_eq!(resolve("invoice_date", &ctx), "24-08-2025");
        assert_eq!(resolve("gstin", &ctx), "");

        let items = items(&ctx);
        assert_eq!(items.len(), 2);
        assert_eq!(resolve("description", items[0]), "Widget A");
        assert_eq!(resolve("amount", items[0]), "100.0");
        assert_eq!(resolve("qty", items[1]), "1");
        assert_eq!(resolve("amount", items[1]), "80.0");

        assert_eq!(resolve("subtotal", &ctx), "180.00");
        assert_eq!(resolve("tax", &ctx), "32.40");
        assert_eq!(resolve("total", &ctx), "212.40");
    }

    #[test]
    fn test_prompt_texts() {
        let mut prompter = ScriptedPrompter::new(["1", "", "", "", "", "Pen", "3", "2"]);
        collect_answers(&FieldsConfig::sample(), &mut prompter, today()).unwrap();

        let prompts = prompter.prompts();
        assert_eq!(prompts[0], "Invoice Number: ");
        assert_eq!(prompts[1], "Invoice Date [{today}]: ");
        assert_eq!(prompts[4], "GSTIN (optional) []: ");
        assert_eq!(prompts[5], "Item 1 - Item Description: ");
        assert_eq!(prompts[6], "Item 1 - Qty [1]: ");
        assert_eq!(prompts[7], "Item 1 - Rate: ");
        assert_eq!(prompts[8], "Item 2 - Item Description: ");
        assert_eq!(prompts.len(), 9);
    }

    #[test]
    fn test_non_numeric_rate_leaves_amount_empty() {
        let mut prompter = ScriptedPrompter::new(["1", "", "", "", "", "Pen", "2", "cheap", ""]);
        let ctx = collect_answers(&FieldsConfig::sample(), &mut prompter, today()).unwrap();

        assert_eq!(resolve("amount", items(&ctx)[0]), "");
        assert_eq!(resolve("total", &ctx), "0.00");
    }

    #[test]
    fn test_empty_rate_counts_as_zero() {
        let mut prompter = ScriptedPrompter::new(["1", "", "", "", "", "Gift", "5", ""]);
        let ctx = collect_answers(&FieldsConfig::sample(), &mut prompter, today()).unwrap();

        assert_eq!(resolve("amount", items(&ctx)[0]), "0.0");
    }

    #[test]
    fn test_today_default_format() {
        let config = FieldsConfig::from_json(r#"{"fields": [{"key": "d", "default": "{today}"}]}"#).unwrap();
        let ctx = collect_answers(&config, &mut ScriptedPrompter::default(), today()).unwrap();

        assert_eq!(resolve("d", &ctx), "2025-08-24");
        // No item fields configured: empty list, zero totals
        assert!(items(&ctx).is_empty());
        assert_eq!(resolve("total", &ctx), "0.00");
    }

    #[test]
    fn test_custom_items_key_and_format() {
        let config = FieldsConfig::from_json(
            r#"{
                "items": {"context_key": "lines", "fields": [{"key": "qty"}, {"key": "rate"}]},
                "totals": {"tax_rate": 0.1, "number_format": "{:,.1f}"}
            }"#,
        )
        .unwrap();
        let mut prompter = ScriptedPrompter::new(["Server", "1", "12000", ""]);
        let ctx = collect_answers(&config, &mut prompter, today()).unwrap();

        assert!(ctx.get("lines").and_then(Value::as_list).is_some());
        assert_eq!(resolve("subtotal", &ctx), "12,000.0");
        assert_eq!(resolve("total", &ctx), "13,200.0");
    }

    #[test]
    fn test_bad_number_format_fails_first() {
        let mut config = FieldsConfig::sample();
        config.totals.number_format = "{:.2d}".to_string();
        let mut prompter = ScriptedPrompter::default();

        assert!(collect_answers(&config, &mut prompter, today()).is_err());
        assert!(prompter.prompts().is_empty());
    }
}
