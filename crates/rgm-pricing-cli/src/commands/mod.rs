pub mod breakdown;
pub mod buildup;
pub mod fields;
pub mod form;
pub mod replay;
