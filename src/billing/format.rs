//! Number, date, and file name formatting.

use crate::common::{Error, Result};
use crate::template::{Context, Value};
use chrono::NaiveDate;
use chrono::format::{Item, StrftimeItems};

/// A number format pattern such as `{:.2f}`, `{:,.2f}`, or `Rs. {:.0f}`.
///
/// Supported slot specs: empty (`{}`), `f` (six decimals), `.Nf`, and the
/// same with a leading `,` for thousands grouping. Text around the slot is
/// copied; `{{` and `}}` outside it are literal braces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberFormat {
    prefix: String,
    suffix: String,
    /// `None` is the shortest round-trip form (`{}`)
    precision: Option<usize>,
    grouping: bool,
}

impl NumberFormat {
    /// Parse a format pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use docfill::billing::NumberFormat;
    ///
    /// let fmt = NumberFormat::parse("{:,.2f} EUR")?;
    /// assert_eq!(fmt.format(1234.5), "1,234.50 EUR");
    /// # Ok::<(), docfill::Error>(())
    /// ```
    pub fn parse(pattern: &str) -> Result<Self> {
        let invalid = |why: &str| Error::Config(format!("number format '{}': {}", pattern, why));

        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut spec: Option<String> = None;
        let mut chars = pattern.chars().peekable();

        while let Some(ch) = chars.next() {
            let out = if spec.is_some() { &mut suffix } else { &mut prefix };
            match ch {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    out.push('{');
                },
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    out.push('}');
                },
                '{' => {
                    if spec.is_some() {
                        return Err(invalid("more than one value slot"));
                    }
                    let mut body = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => body.push(c),
                            None => return Err(invalid("unclosed '{'")),
                        }
                    }
                    spec = Some(body);
                },
                '}' => return Err(invalid("single '}'")),
                other => out.push(other),
            }
        }

        let spec = spec.ok_or_else(|| invalid("no value slot"))?;
        let spec = match spec.strip_prefix(':') {
            Some(rest) => rest,
            None if spec.is_empty() => "",
            None => return Err(invalid("positional or named slots are not supported")),
        };

        let (grouping, spec) = match spec.strip_prefix(',') {
            Some(rest) => (true, rest),
            None => (false, spec),
        };

        let precision = if spec.is_empty() {
            None
        } else {
            let body = spec
                .strip_suffix('f')
                .ok_or_else(|| invalid("only fixed-point ('f') is supported"))?;
            match body.strip_prefix('.') {
                Some(digits) => Some(
                    digits
                        .parse::<usize>()
                        .map_err(|_| invalid("bad precision"))?,
                ),
                None if body.is_empty() => Some(6),
                None => return Err(invalid("unsupported spec")),
            }
        };

        Ok(Self {
            prefix,
            suffix,
            precision,
            grouping,
        })
    }

    /// Format a value.
    pub fn format(&self, value: f64) -> String {
        let number = match self.precision {
            Some(precision) => format!("{:.*}", precision, value),
            None => Value::from(value).render().into_owned(),
        };
        let number = if self.grouping {
            group_thousands(&number)
        } else {
            number
        };
        format!("{}{}{}", self.prefix, number, self.suffix)
    }
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            prefix: String::new(),
            suffix: String::new(),
            precision: Some(2),
            grouping: false,
        }
    }
}

fn group_thousands(number: &str) -> String {
    let (sign, unsigned) = match number.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", number),
    };
    let split = unsigned.find('.').unwrap_or(unsigned.len());
    let (int_part, frac_part) = unsigned.split_at(split);

    if !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return number.to_string();
    }

    let mut grouped = String::with_capacity(number.len() + int_part.len() / 3);
    grouped.push_str(sign);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped.push_str(frac_part);
    grouped
}

/// Format a date with a strftime-style pattern.
///
/// Rejects patterns with unknown specifiers instead of producing garbage.
pub fn format_date(date: NaiveDate, pattern: &str) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(Error::Config(format!("invalid date format '{}'", pattern)));
    }
    Ok(date.format_with_items(items.into_iter()).to_string())
}

/// Build an output file name from a template with `{key}` slots.
///
/// Slots name top-level context keys. `{{` and `}}` are literal braces.
///
/// # Examples
///
/// ```
/// use docfill::billing::output_file_name;
/// use docfill::template::Context;
///
/// let ctx: Context = [("invoice_no", "1001")].into_iter().collect();
/// assert_eq!(output_file_name("invoice_{invoice_no}.docx", &ctx)?, "invoice_1001.docx");
/// # Ok::<(), docfill::Error>(())
/// ```
pub fn output_file_name(template: &str, context: &Context) -> Result<String> {
    let mut name = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                name.push('{');
            },
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                name.push('}');
            },
            '{' => {
                let mut key = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => key.push(c),
                        None => {
                            return Err(Error::Config(format!(
                                "output name template '{}': unclosed '{{'",
                                template
                            )));
                        },
                    }
                }
                let value = context.get(&key).ok_or_else(|| {
                    Error::Config(format!(
                        "output name template '{}' uses unknown field '{}'",
                        template, key
                    ))
                })?;
                name.push_str(&value.render());
            },
            '}' => {
                return Err(Error::Config(format!(
                    "output name template '{}': single '}}'",
                    template
                )));
            },
            other => name.push(other),
        }
    }
    Ok(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_two_decimals() {
        let fmt = NumberFormat::parse("{:.2f}").unwrap();
        assert_eq!(fmt, NumberFormat::default());
        assert_eq!(fmt.format(180.0), "180.00");
        assert_eq!(fmt.format(32.4), "32.40");
        assert_eq!(fmt.format(0.0), "0.00");
    }

    #[test]
    fn test_other_specs() {
        assert_eq!(NumberFormat::parse("{:.0f}").unwrap().format(2.4), "2");
        assert_eq!(NumberFormat::parse("{:f}").unwrap().format(1.5), "1.500000");
        assert_eq!(NumberFormat::parse("{}").unwrap().format(180.0), "180.0");
        assert_eq!(NumberFormat::parse("Rs. {:.1f}/-").unwrap().format(9.96), "Rs. 10.0/-");
        assert_eq!(NumberFormat::parse("{{{:.1f}}}").unwrap().format(1.0), "{1.0}");
    }

    #[test]
    fn test_grouping() {
        let fmt = NumberFormat::parse("{:,.2f}").unwrap();
        assert_eq!(fmt.format(1234567.891), "1,234,567.89");
        assert_eq!(fmt.format(-1234.0), "-1,234.00");
        assert_eq!(fmt.format(999.0), "999.00");
    }

    #[test]
    fn test_rejected_formats() {
        for pattern in ["", "total", "{:.2d}", "{0:.2f}", "{:.xf}", "{:.2f", "a}b{}", "{}{}"] {
            assert!(
                matches!(NumberFormat::parse(pattern), Err(Error::Config(_))),
                "{pattern} should be rejected"
            );
        }
    }

    #[test]
    fn test_format_date() {
        let date = NaiveDate::from_ymd_opt(2025, 8, 24).unwrap();
        assert_eq!(format_date(date, "%d-%m-%Y").unwrap(), "24-08-2025");
        assert_eq!(format_date(date, "%Y-%m-%d").unwrap(), "2025-08-24");
        assert!(format_date(date, "%Q").is_err());
    }

    #[test]
    fn test_output_file_name() {
        let ctx: Context = [("invoice_no", "7"), ("client", "ACME")].into_iter().collect();
        assert_eq!(output_file_name("{client}-{invoice_no}.docx", &ctx).unwrap(), "ACME-7.docx");
        assert_eq!(output_file_name("{{x}}.docx", &ctx).unwrap(), "{x}.docx");
        assert!(matches!(output_file_name("{missing}.docx", &ctx), Err(Error::Config(_))));
        assert!(output_file_name("{invoice_no", &ctx).is_err());
    }
}
