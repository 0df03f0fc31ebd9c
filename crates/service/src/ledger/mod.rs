//! Balance/ban/warning records keyed by SteamID64, and the operations the
//! HTTP routes are built on.

pub mod input;
pub mod record;
pub mod service;

pub use input::{AddUserInput, BalanceInput, IdInput, LookupInput, UserInput};
pub use record::{Ledger, ProfileView, Record};
pub use service::LedgerService;
