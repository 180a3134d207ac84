//! Pair name normalization.
//!
//! Kraken uses its own tickers for a few assets (`XBT` for BTC, `XDG` for
//! DOGE) and prefixes legacy asset codes with `X` (crypto) or `Z` (fiat).

/// Exchange ticker -> universal ticker.
const BASE_ALIASES: [(&str, &str); 2] = [("XBT", "BTC"), ("XDG", "DOGE")];

/// Separator used by `wsname` and normalized names.
pub const SEPARATOR: char = '/';

/// Map an exchange ticker to its universal form ("XBT" -> "BTC").
pub fn universal_ticker(ticker: &str) -> &str {
    BASE_ALIASES
        .iter()
        .find(|(exchange, _)| *exchange == ticker)
        .map(|(_, universal)| *universal)
        .unwrap_or(ticker)
}

/// Map a universal ticker to the exchange form ("BTC" -> "XBT").
pub fn exchange_ticker(ticker: &str) -> &str {
    BASE_ALIASES
        .iter()
        .find(|(_, universal)| *universal == ticker)
        .map(|(exchange, _)| *exchange)
        .unwrap_or(ticker)
}

/// Normalize a pair name: trim, uppercase, and alias the base ticker when the
/// name contains a separator. Flat names are only uppercased.
pub fn normalize_pair(raw: &str) -> String {
    let upper = raw.trim().to_ascii_uppercase();
    match upper.split_once(SEPARATOR) {
        Some((base, quote)) => {
            format!("{}{}{}", universal_ticker(base.trim()), SEPARATOR, quote.trim())
        }
        None => upper,
    }
}

/// Drop the separator ("BTC/EUR" -> "BTCEUR").
pub fn flatten(name: &str) -> String {
    name.chars().filter(|c| *c != SEPARATOR).collect()
}

/// Whether a raw quote code denotes `currency`.
///
/// Matches the code verbatim ("EUR"), in the legacy prefixed form ("ZEUR",
/// "XXBT"), and through the ticker alias ("BTC" matches "XXBT").
pub fn quote_matches(raw_quote: &str, currency: &str) -> bool {
    let raw = raw_quote.trim().to_ascii_uppercase();
    let wanted = currency.trim().to_ascii_uppercase();
    if wanted.is_empty() {
        return false;
    }

    [wanted.as_str(), exchange_ticker(&wanted)]
        .iter()
        .any(|code| raw == *code || is_prefixed_form(&raw, code))
}

fn is_prefixed_form(raw: &str, code: &str) -> bool {
    raw.len() == code.len() + 1
        && (raw.starts_with('X') || raw.starts_with('Z'))
        && &raw[1..] == code
}
