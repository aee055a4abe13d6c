//! Suggested identifiers for new listings and contracts.

const LISTING_PREFIX: &str = "PRP-";
const CONTRACT_PREFIX: &str = "CTR-";

/// One past the highest numeric suffix, or `None` once the counter is exhausted.
fn next_suffix<'a>(codes: impl IntoIterator<Item = &'a str>, prefix: &str) -> Option<u64> {
    codes
        .into_iter()
        .filter_map(|code| code.trim().strip_prefix(prefix))
        .filter_map(|suffix| suffix.parse::<u64>().ok())
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

/// `PRP-0001`, or one past the highest listing code already in use.
///
/// Blank when no larger suffix exists; the user then types a code.
pub fn next_listing_code<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    next_suffix(existing, LISTING_PREFIX)
        .map(|next| format!("{LISTING_PREFIX}{next:04}"))
        .unwrap_or_default()
}

/// `CTR-<year>-0001`, numbered per sign year.
pub fn next_contract_number<'a>(existing: impl IntoIterator<Item = &'a str>, year: i32) -> String {
    let prefix = format!("{CONTRACT_PREFIX}{year}-");
    next_suffix(existing, &prefix)
        .map(|next| format!("{prefix}{next:04}"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_listing_code() {
        assert_eq!(next_listing_code(Vec::<&str>::new()), "PRP-0001");
    }

    #[test]
    fn listing_code_follows_the_highest_numeric_suffix() {
        let codes = ["PRP-0007", "PRP-0012", "OLD-9999", "PRP-draft"];
        assert_eq!(next_listing_code(codes), "PRP-0013");
    }

    #[test]
    fn contract_numbers_restart_each_year() {
        let numbers = ["CTR-2023-0041", "CTR-2024-0002", "CTR-2024-0001"];
        assert_eq!(next_contract_number(numbers, 2024), "CTR-2024-0003");
        assert_eq!(next_contract_number(numbers, 2025), "CTR-2025-0001");
    }

    #[test]
    fn wide_suffixes_keep_growing() {
        assert_eq!(next_listing_code(["PRP-9999"]), "PRP-10000");
        assert_eq!(next_listing_code(["PRP-4294967295"]), "PRP-4294967296");
    }

    #[test]
    fn exhausted_counter_leaves_the_suggestion_blank() {
        assert_eq!(next_listing_code(["PRP-18446744073709551615"]), "");
        assert_eq!(next_contract_number(["CTR-2024-18446744073709551615"], 2024), "");
    }
}
