use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::fields::{FieldId, FieldKind};
use crate::types::Money;

/// Raw state of one presentation-layer input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawField {
    /// Checkbox state
    Checked(bool),
    /// A bare JSON/YAML number, accepted for convenience
    Number(serde_json::Number),
    /// Free-form text exactly as typed
    Text(String),
}

/// Read side of the presentation layer.
pub trait FormSource {
    /// Current raw state of a declared field, `None` if the layer has none.
    fn raw(&self, id: FieldId) -> Option<RawField>;
}

/// In-memory presentation state keyed by field id.
///
/// Unknown keys are carried along untouched and never read by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormState {
    fields: BTreeMap<String, RawField>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: FieldId, raw: RawField) {
        self.fields.insert(id.as_str().to_string(), raw);
    }

    pub fn set_text(&mut self, id: FieldId, text: impl Into<String>) {
        self.set(id, RawField::Text(text.into()));
    }

    pub fn set_checked(&mut self, id: FieldId, checked: bool) {
        self.set(id, RawField::Checked(checked));
    }

    pub fn with_text(mut self, id: FieldId, text: impl Into<String>) -> Self {
        self.set_text(id, text);
        self
    }

    pub fn with_checked(mut self, id: FieldId, checked: bool) -> Self {
        self.set_checked(id, checked);
        self
    }

    pub fn get(&self, id: FieldId) -> Option<&RawField> {
        self.fields.get(id.as_str())
    }

    /// Every key present, declared field or not.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Keys that name no declared field; the engine never reads them.
    pub fn unknown_keys(&self) -> impl Iterator<Item = &str> {
        self.keys().filter(|key| key.parse::<FieldId>().is_err())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Overlay every entry of `other` onto this state.
    pub fn merge(&mut self, other: FormState) {
        self.fields.extend(other.fields);
    }
}

impl FormSource for FormState {
    fn raw(&self, id: FieldId) -> Option<RawField> {
        self.get(id).cloned()
    }
}

/// One parsed ledger value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LedgerValue {
    Flag(bool),
    Amount(Decimal),
}

/// Flat mapping from every declared field to its parsed value.
///
/// Rebuilt from the presentation layer at the start of every pass. Only the
/// reconciliation unit and the industry stage's tax write-back replace
/// values afterwards, and both hand back a new ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    entries: BTreeMap<FieldId, LedgerValue>,
}

impl Ledger {
    /// Read and coerce every declared field from the presentation layer.
    pub fn rebuild(source: &impl FormSource) -> Self {
        let entries = FieldId::ALL
            .into_iter()
            .map(|id| (id, coerce(id, source.raw(id))))
            .collect();
        Ledger { entries }
    }

    /// Numeric value of a field; zero for flags and absent entries.
    pub fn value(&self, id: FieldId) -> Money {
        match self.entries.get(&id) {
            Some(LedgerValue::Amount(v)) => *v,
            _ => Decimal::ZERO,
        }
    }

    /// Checked state of a flag; false for numeric and absent entries.
    pub fn flag(&self, id: FieldId) -> bool {
        matches!(self.entries.get(&id), Some(LedgerValue::Flag(true)))
    }

    pub fn get(&self, id: FieldId) -> Option<LedgerValue> {
        self.entries.get(&id).copied()
    }

    pub fn with_value(mut self, id: FieldId, value: Money) -> Self {
        self.entries.insert(id, LedgerValue::Amount(value));
        self
    }

    pub fn with_flag(mut self, id: FieldId, checked: bool) -> Self {
        self.entries.insert(id, LedgerValue::Flag(checked));
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldId, LedgerValue)> + '_ {
        self.entries.iter().map(|(id, v)| (*id, *v))
    }
}

fn coerce(id: FieldId, raw: Option<RawField>) -> LedgerValue {
    match id.kind() {
        FieldKind::Flag => LedgerValue::Flag(match raw {
            Some(RawField::Checked(b)) => b,
            Some(RawField::Text(t)) => matches!(t.trim(), "true" | "on" | "1" | "checked"),
            Some(RawField::Number(n)) => n.as_f64().is_some_and(|v| v != 0.0),
            None => false,
        }),
        FieldKind::Percentage | FieldKind::Amount => LedgerValue::Amount(match raw {
            Some(RawField::Text(t)) => parse_decimal_text(&t),
            Some(RawField::Number(n)) => decimal_from_literal(&n.to_string()),
            Some(RawField::Checked(_)) | None => Decimal::ZERO,
        }),
    }
}

/// Parse free-form decimal text the way the form does.
///
/// The first comma is taken as the decimal separator, then the longest
/// leading `[+-]digits[.digits][e[+-]digits]` prefix is read; anything
/// unparseable (including values outside Decimal's range) is zero.
pub fn parse_decimal_text(text: &str) -> Decimal {
    let normalized = text.trim_start().replacen(',', ".", 1);
    match numeric_prefix(&normalized) {
        Some(prefix) => decimal_from_literal(&prefix),
        None => Decimal::ZERO,
    }
}

/// Plain or scientific decimal literal, zero when it does not fit.
fn decimal_from_literal(literal: &str) -> Decimal {
    let parsed = if literal.contains(['e', 'E']) {
        Decimal::from_scientific(literal)
    } else {
        Decimal::from_str(literal)
    };
    parsed.unwrap_or(Decimal::ZERO)
}

fn numeric_prefix(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut out = String::new();
    let mut i = 0;

    match bytes.first() {
        Some(b'-') => {
            out.push('-');
            i += 1;
        }
        Some(b'+') => i += 1,
        _ => {}
    }

    let int_start = i;
    while bytes.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let int_digits = &s[int_start..i];

    let mut frac_digits = "";
    if bytes.get(i) == Some(&b'.') {
        let frac_start = i + 1;
        i = frac_start;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        frac_digits = &s[frac_start..i];
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }
    out.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(frac_digits);
    }
    if let Some(exponent) = exponent_suffix(&s[i..]) {
        out.push('e');
        out.push_str(exponent);
    }
    Some(out)
}

/// `[eE][+-]digits` at the start of `s`, returned without the `e` or a `+`.
fn exponent_suffix(s: &str) -> Option<&str> {
    let rest = s.strip_prefix(['e', 'E'])?;
    let rest = rest.strip_prefix('+').unwrap_or(rest);
    let sign_len = usize::from(rest.starts_with('-'));
    let digits = rest[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    (digits > 0).then(|| &rest[..sign_len + digits])
}
