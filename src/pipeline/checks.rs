//! Built-in data-quality checks.
//!
//! | Task name                | Check                   | Configuration                |
//! |--------------------------|-------------------------|------------------------------|
//! | `missing_values`         | [`MissingValuesCheck`]  | column → tolerable % map     |
//! | `duplicate_rows`         | [`DuplicateRowsCheck`]  | key column list (may be `[]`)|
//! | `email_validity`         | [`EmailValidityCheck`]  | none                         |
//! | `gender_string_validity` | [`GenderValidityCheck`] | none                         |

pub mod duplicate_rows;
pub mod email_validity;
pub mod gender_validity;
pub mod missing_values;
pub mod validity;

pub use duplicate_rows::DuplicateRowsCheck;
pub use email_validity::EmailValidityCheck;
pub use gender_validity::GenderValidityCheck;
pub use missing_values::{MissingValuesCheck, Tolerance};
pub use validity::{Validity, ValidityCounts};

pub const MISSING_VALUES: &str = "missing_values";
pub const DUPLICATE_ROWS: &str = "duplicate_rows";
pub const EMAIL_VALIDITY: &str = "email_validity";
pub const GENDER_VALIDITY: &str = "gender_string_validity";
