pub mod display;
pub mod error;
pub mod fields;
pub mod fiscal;
pub mod ledger;
pub mod pipeline;
pub mod reconcile;
pub mod report;
pub mod reverse;
pub mod session;
pub mod types;

pub use error::RgmError;
pub use fields::{FieldId, FieldKind, View};
pub use ledger::{FormSource, FormState, Ledger, RawField};
pub use session::{FormEvent, Session, SessionOutcome};
pub use types::*;

/// Standard result type for every fallible rgm-pricing operation
pub type RgmResult<T> = Result<T, RgmError>;
