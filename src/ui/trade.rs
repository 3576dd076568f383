//! Trade form panel.

use std::fmt::Write;

use crate::trade::{Currency, TradeAction, TradeForm};

use super::escape_html;

/// Browser side of the stub: log and alert, nothing else.
const SCRIPT: &str = r"
(() => {
  const root = document.getElementById('trade-form');
  const amount = root.querySelector('input[name=amount]');
  const currency = root.querySelector('select[name=currency]');
  root.querySelectorAll('button[data-action]').forEach((button) => {
    button.addEventListener('click', () => {
      const action = button.dataset.action;
      console.log(`${action} ${amount.value} ${currency.value}`);
      alert(`${action.toUpperCase()} order placed for ${amount.value} ${currency.value}`);
    });
  });
})();
";

/// Render the trade form panel from the form's current state.
#[must_use]
pub fn panel(form: &TradeForm) -> String {
    let mut options = String::new();
    for currency in Currency::ALL {
        let selected = if currency == form.currency() {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            options,
            r#"<option value="{code}"{selected}>{label}</option>"#,
            code = currency.code(),
            label = currency.label(),
        );
    }

    format!(
        r#"<section id="trade-form" class="panel">
        <h2>Trading Interface</h2>
        <div class="field">
            <label for="trade-amount">Amount:</label>
            <input id="trade-amount" name="amount" type="number" value="{amount}">
        </div>
        <div class="field">
            <label for="trade-currency">Currency:</label>
            <select id="trade-currency" name="currency">{options}</select>
        </div>
        <div class="actions">
            <button class="btn btn-buy" type="button" data-action="{buy}">Buy</button>
            <button class="btn btn-sell" type="button" data-action="{sell}">Sell</button>
        </div>
        <script>{SCRIPT}</script>
    </section>"#,
        amount = escape_html(form.amount()),
        buy = TradeAction::Buy,
        sell = TradeAction::Sell,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_form_selects_btc() {
        let html = panel(&TradeForm::new());
        assert!(html.contains(r#"<option value="BTC" selected>Bitcoin (BTC)</option>"#));
        assert!(html.contains(r#"<option value="ETH">Ethereum (ETH)</option>"#));
        assert!(html.contains(r#"<option value="USDT">Tether (USDT)</option>"#));
    }

    #[test]
    fn renders_current_state() {
        let mut form = TradeForm::new();
        form.set_amount("2.5");
        form.select_currency(Currency::Eth);

        let html = panel(&form);

        assert!(html.contains(r#"type="number" value="2.5""#));
        assert!(html.contains(r#"<option value="ETH" selected>"#));
    }

    #[test]
    fn buttons_carry_actions_and_no_form_submission() {
        let html = panel(&TradeForm::new());
        assert!(html.contains(r#"data-action="buy""#));
        assert!(html.contains(r#"data-action="sell""#));
        assert!(!html.contains("<form"));
        assert!(!html.contains("fetch("));
    }
}
