use service::ledger::LedgerService;

/// Shared handler state. Holds no records: every request goes through the store.
#[derive(Clone)]
pub struct AppState {
    pub ledger: LedgerService,
}

impl AppState {
    pub fn new(ledger: LedgerService) -> Self {
        Self { ledger }
    }
}
