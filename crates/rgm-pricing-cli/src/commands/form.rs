use clap::Args;
use serde_json::Value;
use tracing::warn;

use rgm_pricing_core::{FieldId, FormState};

use crate::input;

/// Form fields shared by the buildup and breakdown commands.
///
/// Values are passed through as typed text, so `9,25` and `abc` behave the
/// way they would in the form.
#[derive(Args, Debug, Default)]
pub struct FormArgs {
    /// Path to a JSON or YAML form state file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Net revenue the industry wants to keep (R$)
    #[arg(long)]
    pub net_revenue: Option<String>,

    /// ICMS rate (%)
    #[arg(long)]
    pub icms_pct: Option<String>,

    /// ICMS amount (R$)
    #[arg(long)]
    pub icms_amount: Option<String>,

    /// PIS/COFINS rate (%)
    #[arg(long)]
    pub composite_pct: Option<String>,

    /// PIS/COFINS amount (R$)
    #[arg(long)]
    pub composite_amount: Option<String>,

    /// IPI rate (%)
    #[arg(long)]
    pub excise_pct: Option<String>,

    /// IPI amount (R$)
    #[arg(long)]
    pub excise_amount: Option<String>,

    /// ICMS-ST rate (%)
    #[arg(long)]
    pub substitution_pct: Option<String>,

    /// ICMS-ST amount (R$)
    #[arg(long)]
    pub substitution_amount: Option<String>,

    /// Trade agreements rate (%)
    #[arg(long)]
    pub trade_agreements_pct: Option<String>,

    /// Trade agreements amount (R$)
    #[arg(long)]
    pub trade_agreements_amount: Option<String>,

    /// COGS rate (%)
    #[arg(long)]
    pub cogs_pct: Option<String>,

    /// COGS amount (R$)
    #[arg(long)]
    pub cogs_amount: Option<String>,

    /// Freight rate (%)
    #[arg(long)]
    pub freight_pct: Option<String>,

    /// Freight amount (R$)
    #[arg(long)]
    pub freight_amount: Option<String>,

    /// Retailer recovers PIS/COFINS as an input credit
    #[arg(long)]
    pub recovers_composite: bool,

    /// Retail margin on the sale price (%)
    #[arg(long)]
    pub retail_margin_pct: Option<String>,

    /// ICMS rate on the retail sale (%)
    #[arg(long)]
    pub sale_icms_pct: Option<String>,

    /// PIS/COFINS rate on the retail sale (%)
    #[arg(long)]
    pub sale_composite_pct: Option<String>,

    /// Target retail sale price for the breakdown view (R$)
    #[arg(long)]
    pub target_sale_price: Option<String>,
}

impl FormArgs {
    fn flag_text(&self, field: FieldId) -> Option<&str> {
        let text = match field {
            FieldId::NetRevenue => &self.net_revenue,
            FieldId::IcmsPct => &self.icms_pct,
            FieldId::IcmsAmount => &self.icms_amount,
            FieldId::CompositePct => &self.composite_pct,
            FieldId::CompositeAmount => &self.composite_amount,
            FieldId::ExcisePct => &self.excise_pct,
            FieldId::ExciseAmount => &self.excise_amount,
            FieldId::SubstitutionPct => &self.substitution_pct,
            FieldId::SubstitutionAmount => &self.substitution_amount,
            FieldId::TradeAgreementsPct => &self.trade_agreements_pct,
            FieldId::TradeAgreementsAmount => &self.trade_agreements_amount,
            FieldId::CogsPct => &self.cogs_pct,
            FieldId::CogsAmount => &self.cogs_amount,
            FieldId::FreightPct => &self.freight_pct,
            FieldId::FreightAmount => &self.freight_amount,
            FieldId::RetailMarginPct => &self.retail_margin_pct,
            FieldId::SaleIcmsPct => &self.sale_icms_pct,
            FieldId::SaleCompositePct => &self.sale_composite_pct,
            FieldId::TargetSalePrice => &self.target_sale_price,
            FieldId::RecoversComposite => return None,
        };
        text.as_deref()
    }

    /// Form state from flags only.
    pub fn to_form(&self) -> FormState {
        let mut form = FormState::new();
        for field in FieldId::ALL {
            if let Some(text) = self.flag_text(field) {
                form.set_text(field, text);
            }
        }
        form.set_checked(FieldId::RecoversComposite, self.recovers_composite);
        form
    }

    /// Form state from `--input`, else piped stdin, else the individual flags.
    pub fn load(&self) -> Result<FormState, Box<dyn std::error::Error>> {
        let data = if let Some(ref path) = self.input {
            input::file::read_document(path)?
        } else if let Some(data) = input::stdin::read_stdin()? {
            data
        } else {
            return Ok(self.to_form());
        };
        form_from_value(data)
    }
}

/// Decode a form state document. Keys that name no field are ignored.
pub fn form_from_value(data: Value) -> Result<FormState, Box<dyn std::error::Error>> {
    let form: FormState = serde_json::from_value(data)?;
    warn_unknown_keys(&form);
    Ok(form)
}

/// Log every key of a form state the engine will not read.
pub fn warn_unknown_keys(form: &FormState) {
    for key in form.unknown_keys() {
        warn!(key, "ignoring unknown form field");
    }
}
