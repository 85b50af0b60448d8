mod payment_frequency;
mod payment_schedule;
mod tax_bracket;
mod tax_result;
mod tax_year_config;

pub use payment_frequency::{ParseFrequencyError, PaymentFrequency};
pub use payment_schedule::{Installment, PaymentSchedule};
pub use tax_bracket::{BracketBreakdown, BracketRule};
pub use tax_result::TaxResult;
pub use tax_year_config::{TaxYearConfig, TaxYearConfigError};
