//! Running ledger balances carried from month to month

/// Cumulative position of a project at the end of a month
#[derive(Debug, Clone)]
pub struct LedgerState {
    /// Month most recently recorded
    pub month: u32,

    /// Running sum of cash outflows (sale proceeds count as negative outflow)
    pub cumulative_cash: f64,

    /// Running sum of loan drawdowns
    pub cumulative_loan: f64,

    /// Highest cumulative cash seen so far
    pub peak_cash: f64,

    /// Whether any month has been recorded yet
    started: bool,
}

impl LedgerState {
    pub fn new() -> Self {
        Self {
            month: 0,
            cumulative_cash: 0.0,
            cumulative_loan: 0.0,
            peak_cash: 0.0,
            started: false,
        }
    }

    /// Fold one month's flows into the running balances
    pub fn record(&mut self, month: u32, cash_outflow: f64, loan_drawdown: f64) {
        self.month = month;
        self.cumulative_cash += cash_outflow;
        self.cumulative_loan += loan_drawdown;

        // Running max is monotonic, so later sale months never lower it
        if !self.started || self.cumulative_cash > self.peak_cash {
            self.peak_cash = self.cumulative_cash;
        }
        self.started = true;
    }

    /// Cash invested minus loan outstanding
    pub fn net_position(&self) -> f64 {
        self.cumulative_cash - self.cumulative_loan
    }

    /// Cash plus loan: everything the project has consumed so far
    pub fn total_funding(&self) -> f64 {
        self.cumulative_cash + self.cumulative_loan
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new()
    }
}
