//! Notification message formatting.

use chrono::Local;

use crate::constants::RATE_TOLERANCE;
use crate::rates::RateSnapshot;

/// Render the notification text for a created or changed rate.
///
/// Rates are printed with two decimals; when `previous` is supplied and a
/// component actually moved, its signed delta is appended in parentheses.
/// The text uses Telegram HTML markup (`parse_mode=HTML`).
pub fn change_message(
    display_name: &str,
    previous: Option<&RateSnapshot>,
    latest: &RateSnapshot,
) -> String {
    let observed_at = latest
        .observed_at
        .with_timezone(&Local)
        .format("%d.%m.%Y %H:%M:%S");

    let (buy_delta, sale_delta) = match previous {
        Some(previous) => (
            latest.buy_rate - previous.buy_rate,
            latest.sale_rate - previous.sale_rate,
        ),
        None => (0.0, 0.0),
    };

    format!(
        "{display_name}\n\
         \n\
         Обмін на:\n\
         <b>{observed_at}</b>\n\
         Купівля:\n\
         <b>1 {dest} -&gt; {buy:.2}{buy_suffix} {base}</b>\n\
         Продаж:\n\
         <b>1 {dest} -&gt; {sale:.2}{sale_suffix} {base}</b>",
        dest = latest.destination_currency,
        base = latest.base_currency,
        buy = latest.buy_rate,
        sale = latest.sale_rate,
        buy_suffix = delta_suffix(buy_delta),
        sale_suffix = delta_suffix(sale_delta),
    )
}

fn delta_suffix(delta: f64) -> String {
    if delta.abs() > RATE_TOLERANCE {
        format!(" ({delta:+.2})")
    } else {
        String::new()
    }
}
