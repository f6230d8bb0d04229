//! Currency reconciliation for transfers whose requested currency is not
//! held by both sides.

use crate::model::Account;

/// Picks a substitute currency for a transfer, or none.
///
/// Returns `None` when the requested currency is already present in both
/// account lists (no substitution needed) or when the two sides share no
/// currency at all. Otherwise returns the first payer currency that the
/// payee also holds.
pub fn common_currency(
    payer_accounts: &[Account],
    payee_accounts: &[Account],
    requested: &str,
) -> Option<String> {
    let payer_has = payer_accounts
        .iter()
        .any(|a| a.currency.as_deref() == Some(requested));
    let payee_has = payee_accounts
        .iter()
        .any(|a| a.currency.as_deref() == Some(requested));
    if payer_has && payee_has {
        return None;
    }

    payer_accounts
        .iter()
        .filter_map(|a| a.currency.as_deref())
        .find(|candidate| {
            payee_accounts
                .iter()
                .any(|b| b.currency.as_deref() == Some(*candidate))
        })
        .map(str::to_string)
}
