//! Service layer for the Steam ledger.
//! - `storage`: the injected `{load, save}` record store and its backings.
//! - `steam`: profile URL grammar, Steam Web API client, resolver and fetcher.
//! - `ledger`: record model, request inputs and the per-route operations.

pub mod errors;
pub mod ledger;
pub mod steam;
pub mod storage;
#[cfg(test)]
pub mod test_support;
