use serde::Serialize;
use serde_json::Value;

use rgm_pricing_core::reconcile::{pair_for, PairBase};
use rgm_pricing_core::{FieldId, FieldKind, View};

#[derive(Serialize)]
struct FieldRow {
    id: FieldId,
    label: &'static str,
    kind: FieldKind,
    view: View,
    pair: Option<FieldId>,
    base: Option<PairBase>,
}

/// The field catalogue: every id the form, the flags and replay scripts accept.
pub fn run_fields() -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<FieldRow> = FieldId::ALL
        .into_iter()
        .map(|id| {
            let rule = pair_for(id);
            FieldRow {
                id,
                label: id.label(),
                kind: id.kind(),
                view: id.view(),
                pair: rule.map(|r| if r.percent == id { r.amount } else { r.percent }),
                base: rule.map(|r| r.base),
            }
        })
        .collect();
    Ok(serde_json::to_value(rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_lists_every_field() {
        let value = run_fields().unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), FieldId::ALL.len());

        let cogs = rows.iter().find(|r| r["id"] == "cogs_amount").unwrap();
        assert_eq!(cogs["pair"], "cogs_pct");
        assert_eq!(cogs["kind"], "amount");

        let target = rows.iter().find(|r| r["id"] == "target_sale_price").unwrap();
        assert_eq!(target["view"], "breakdown");
        assert!(target["pair"].is_null());
    }
}
