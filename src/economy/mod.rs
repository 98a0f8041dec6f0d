//! Economy: token ledger, deed ledger and the spend check.

pub mod deeds;
pub mod ledger;
pub mod spend;

pub use deeds::{Deed, DeedLedger, EscrowError};
pub use ledger::{TokenLedger, Unaffordable};
pub use spend::{check_spend, SpendError, SpendStatus};
