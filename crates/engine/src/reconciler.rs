// In crates/engine/src/reconciler.rs

use core_types::{PositionState, Symbol};
use rust_decimal::Decimal;

/// What `reconcile` had to change to bring the strategy's position in line with the
/// holdings reported by portfolio accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciliation {
    InSync,
    /// Accounting reports flat while the strategy believed it was long.
    ClosedExternally { previous_holdings: i64 },
    /// Accounting reports a long position the strategy did not open.
    OpenedExternally { holdings: i64 },
    /// Long on both sides, with a different share count.
    QuantityChanged { previous_holdings: i64, holdings: i64 },
}

/// Reconciles `position` with `reported_holdings`, keeping the entry-price invariant.
///
/// A long position the strategy knows nothing about is adopted at `close`, so the
/// stop-loss and take-profit rules apply to it from this bar on.
pub fn reconcile(
    position: &mut PositionState,
    reported_holdings: i64,
    close: Decimal,
    symbol: &Symbol,
) -> Reconciliation {
    let previous_holdings = position.holdings;
    let outcome = match (position.is_long(), reported_holdings > 0) {
        (false, false) => {
            position.holdings = reported_holdings;
            Reconciliation::InSync
        }
        (true, false) => {
            *position = PositionState {
                holdings: reported_holdings,
                entry_price: None,
            };
            Reconciliation::ClosedExternally { previous_holdings }
        }
        (false, true) => {
            *position = PositionState {
                holdings: reported_holdings,
                entry_price: Some(close),
            };
            Reconciliation::OpenedExternally {
                holdings: reported_holdings,
            }
        }
        (true, true) if previous_holdings == reported_holdings => Reconciliation::InSync,
        (true, true) => {
            position.holdings = reported_holdings;
            Reconciliation::QuantityChanged {
                previous_holdings,
                holdings: reported_holdings,
            }
        }
    };

    if outcome != Reconciliation::InSync {
        tracing::warn!(
            %symbol,
            ?outcome,
            reported_holdings,
            "Strategy position was out of sync with portfolio accounting; reconciled."
        );
    }
    outcome
}
