use async_trait::async_trait;
use thiserror::Error;

/// One trimmed token from the search input, awaiting lookup.
///
/// `index` is the token's position in the comma-separated input and the
/// join key back onto the service's ordered response array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    #[allow(dead_code)]
    pub index: usize,
}

/// One row of the result list: a submitted address joined with the
/// service's answer for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub address: String,
    pub status: String,
    pub tables: Vec<String>,
}

/// Everything that can end a submission cycle. The `Display` form of each
/// variant is the message shown to the user; `Transport` keeps its
/// underlying cause out of the message and exposes it via [`LookupError::cause`]
/// for the log file.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Please enter at least one MAC address.")]
    EmptyInput,

    #[error("Please, remove extra comma(s) from your search bar!")]
    MalformedList,

    /// The service rejected the batch outright; the message is the
    /// server's own and is shown verbatim.
    #[error("{0}")]
    Rejected(String),

    /// The response array length does not match the submitted batch.
    /// Rows are joined by position, so there is no safe way to recover.
    #[error("Lookup service answered with {got} result(s) for {sent} address(es).")]
    ShapeMismatch { sent: usize, got: usize },

    #[error("Error occurred while checking MAC address.")]
    Transport(String),
}

impl LookupError {
    /// Underlying cause, where the user-facing message deliberately
    /// omits it.
    pub fn cause(&self) -> Option<&str> {
        match self {
            LookupError::Transport(cause) => Some(cause),
            _ => None,
        }
    }
}

/// Remote lookup service seam. The real implementation posts to
/// `/api/check-mac`; tests drive the submission path with a stub.
#[async_trait]
pub trait MacLookup: Send + Sync {
    async fn check(&self, candidates: &[Candidate]) -> Result<Vec<DisplayRow>, LookupError>;
}

/// Split the search input on commas into ordered candidates.
///
/// Each token is trimmed of surrounding whitespace. Blank input and stray
/// commas (any token that is empty after trimming) are rejected up front;
/// an empty token is never silently dropped.
pub fn parse_search_input(input: &str) -> Result<Vec<Candidate>, LookupError> {
    if input.trim().is_empty() {
        return Err(LookupError::EmptyInput);
    }

    let tokens: Vec<&str> = input.split(',').map(str::trim).collect();
    if tokens.iter().any(|token| token.is_empty()) {
        return Err(LookupError::MalformedList);
    }

    Ok(tokens
        .into_iter()
        .enumerate()
        .map(|(index, text)| Candidate {
            text: text.to_string(),
            index,
        })
        .collect())
}

/// Format check for one trimmed token. Accepted shapes, hex digits in
/// either case:
///
/// - six byte pairs separated by `:` (`AA:BB:CC:DD:EE:FF`)
/// - six byte pairs separated by `-` (`aa-bb-cc-dd-ee-ff`)
/// - a bare 12-digit string (`AABBCCDDEEFF`)
///
/// The delimiter must be uniform within one address; `AA:BB-CC:DD:EE:FF`
/// is invalid.
pub fn is_valid_mac(token: &str) -> bool {
    let bytes = token.as_bytes();
    match bytes.len() {
        12 => bytes.iter().all(u8::is_ascii_hexdigit),
        17 => {
            let delim = bytes[2];
            if delim != b':' && delim != b'-' {
                return false;
            }
            bytes.chunks(3).all(|group| {
                group[0].is_ascii_hexdigit()
                    && group[1].is_ascii_hexdigit()
                    && (group.len() == 2 || group[2] == delim)
            })
        }
        _ => false,
    }
}

/// Collect one advisory line per candidate that fails the format check.
///
/// Advisory only: a badly formatted candidate is still submitted. The
/// caller decides whether to run this at all (the validation toggle).
pub fn format_advisories(candidates: &[Candidate]) -> Vec<String> {
    candidates
        .iter()
        .filter(|candidate| !is_valid_mac(&candidate.text))
        .map(|candidate| format!("Invalid MAC address format: {}", candidate.text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_token() {
        let candidates = parse_search_input("AA:BB:CC:DD:EE:FF").unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "AA:BB:CC:DD:EE:FF");
        assert_eq!(candidates[0].index, 0);
    }

    #[test]
    fn test_parse_trims_whitespace_and_keeps_order() {
        let candidates = parse_search_input("  AA:BB:CC:DD:EE:FF , 11:22:33:44:55:66  ").unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text, "AA:BB:CC:DD:EE:FF");
        assert_eq!(candidates[0].index, 0);
        assert_eq!(candidates[1].text, "11:22:33:44:55:66");
        assert_eq!(candidates[1].index, 1);
    }

    #[test]
    fn test_parse_candidate_count_is_commas_plus_one() {
        for input in ["a", "a,b", "a,b,c", "one, two, three, four"] {
            let commas = input.matches(',').count();
            let candidates = parse_search_input(input).unwrap();
            assert_eq!(candidates.len(), commas + 1, "input: {input:?}");
        }
    }

    #[test]
    fn test_parse_empty_input_rejected() {
        assert!(matches!(
            parse_search_input(""),
            Err(LookupError::EmptyInput)
        ));
        assert!(matches!(
            parse_search_input("   "),
            Err(LookupError::EmptyInput)
        ));
    }

    #[test]
    fn test_parse_interior_empty_token_rejected() {
        assert!(matches!(
            parse_search_input("AA:BB,,CC:DD"),
            Err(LookupError::MalformedList)
        ));
    }

    #[test]
    fn test_parse_trailing_comma_rejected() {
        assert!(matches!(
            parse_search_input("AA:BB,"),
            Err(LookupError::MalformedList)
        ));
    }

    #[test]
    fn test_parse_whitespace_only_token_rejected() {
        // "a, ,b" trims the middle token to nothing; that is a stray
        // comma, not a submittable candidate.
        assert!(matches!(
            parse_search_input("AA:BB, ,CC:DD"),
            Err(LookupError::MalformedList)
        ));
    }

    #[test]
    fn test_parse_leading_comma_rejected() {
        assert!(matches!(
            parse_search_input(",AA:BB"),
            Err(LookupError::MalformedList)
        ));
    }

    #[test]
    fn test_valid_colon_separated() {
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("00:11:22:33:44:55"));
    }

    #[test]
    fn test_valid_hyphen_separated_lowercase() {
        assert!(is_valid_mac("aa-bb-cc-dd-ee-ff"));
    }

    #[test]
    fn test_valid_bare_twelve_digits() {
        assert!(is_valid_mac("AABBCCDDEEFF"));
        assert!(is_valid_mac("aabbccddeeff"));
        assert!(is_valid_mac("0123456789ab"));
    }

    #[test]
    fn test_mixed_delimiters_invalid() {
        assert!(!is_valid_mac("AA:BB-CC:DD:EE:FF"));
        assert!(!is_valid_mac("AA-BB:CC-DD:EE-FF"));
    }

    #[test]
    fn test_wrong_length_invalid() {
        assert!(!is_valid_mac("AA:BB:CC:DD:EE"));
        assert!(!is_valid_mac("AA:BB:CC:DD:EE:FF:00"));
        assert!(!is_valid_mac("AABBCCDDEEF"));
        assert!(!is_valid_mac("AABBCCDDEEFF0"));
        assert!(!is_valid_mac(""));
    }

    #[test]
    fn test_non_hex_invalid() {
        assert!(!is_valid_mac("GG:BB:CC:DD:EE:FF"));
        assert!(!is_valid_mac("AABBCCDDEEFG"));
    }

    #[test]
    fn test_wrong_grouping_invalid() {
        assert!(!is_valid_mac("AAB:BCC:DDE:EFF00"));
        assert!(!is_valid_mac("A:AB:BC:CD:DE:EFF"));
        assert!(!is_valid_mac("AA::BB:CC:DD:EEF"));
    }

    #[test]
    fn test_unexpected_delimiter_invalid() {
        assert!(!is_valid_mac("AA.BB.CC.DD.EE.FF"));
        assert!(!is_valid_mac("AA BB CC DD EE FF"));
    }

    #[test]
    fn test_validator_is_idempotent() {
        for token in ["AA:BB:CC:DD:EE:FF", "ZZ:ZZ:ZZ:ZZ:ZZ:ZZ", "AABBCCDDEEFF"] {
            assert_eq!(is_valid_mac(token), is_valid_mac(token));
        }
    }

    #[test]
    fn test_advisories_list_only_invalid_tokens() {
        let candidates = parse_search_input("AA:BB:CC:DD:EE:FF,nonsense,11:22:33:44:55:66").unwrap();
        let advisories = format_advisories(&candidates);
        assert_eq!(
            advisories,
            vec!["Invalid MAC address format: nonsense".to_string()]
        );
    }

    #[test]
    fn test_advisories_empty_for_well_formed_batch() {
        let candidates = parse_search_input("AA:BB:CC:DD:EE:FF,11:22:33:44:55:66").unwrap();
        assert!(format_advisories(&candidates).is_empty());
    }

    #[test]
    fn test_advisories_do_not_mutate_candidates() {
        let candidates = parse_search_input("ZZ:ZZ:ZZ:ZZ:ZZ:ZZ").unwrap();
        let before = candidates.clone();
        let _ = format_advisories(&candidates);
        assert_eq!(candidates, before);
    }

    #[test]
    fn test_error_messages_are_user_facing() {
        assert_eq!(
            LookupError::EmptyInput.to_string(),
            "Please enter at least one MAC address."
        );
        assert_eq!(
            LookupError::Rejected("Batch too large".to_string()).to_string(),
            "Batch too large"
        );
        assert_eq!(
            LookupError::ShapeMismatch { sent: 2, got: 1 }.to_string(),
            "Lookup service answered with 1 result(s) for 2 address(es)."
        );
        // Transport detail stays out of the message and in `cause`.
        let transport = LookupError::Transport("connection refused".to_string());
        assert_eq!(
            transport.to_string(),
            "Error occurred while checking MAC address."
        );
        assert_eq!(transport.cause(), Some("connection refused"));
        assert_eq!(LookupError::EmptyInput.cause(), None);
    }
}
