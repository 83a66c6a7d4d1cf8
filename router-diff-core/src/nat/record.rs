use serde::Serialize;
use thiserror::Error;

/// Token count of the shortest usable line:
/// `ip nat inside source static <inside> <public>`.
const MIN_TOKENS: usize = 7;

const INSIDE_TOKEN: usize = 5;
const PUBLIC_TOKEN: usize = 6;

/// Errors raised while turning a NAT config line into a [`NatRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Line carried the NAT prefix but too few tokens to name both addresses.
    #[error("malformed NAT line ({tokens} tokens, need at least 7): {line}")]
    MalformedNatLine { line: String, tokens: usize },
}

/// One static NAT mapping as configured on a device.
///
/// Addresses are taken verbatim; no IPv4 syntax check is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NatRecord {
    pub inside_address: String,
    pub public_address: String,
    pub raw_line: String,
}

impl NatRecord {
    /// Trailing tokens after the public address (`extendable`, `route-map X`, ...).
    pub fn options(&self) -> Vec<&str> {
        self.raw_line.split_whitespace().skip(MIN_TOKENS).collect()
    }
}

/// Parse `ip nat inside source static <inside> <public> [options...]`.
pub fn parse(line: &str) -> Result<NatRecord, ParseError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < MIN_TOKENS {
        return Err(ParseError::MalformedNatLine {
            line: line.to_string(),
            tokens: tokens.len(),
        });
    }

    Ok(NatRecord {
        inside_address: tokens[INSIDE_TOKEN].to_string(),
        public_address: tokens[PUBLIC_TOKEN].to_string(),
        raw_line: line.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{parse, ParseError};

    #[test]
    fn extracts_inside_and_public_addresses() {
        let line = "ip nat inside source static 10.0.0.1 203.0.113.10 extendable";
        let record = parse(line).expect("parse");
        assert_eq!(record.inside_address, "10.0.0.1");
        assert_eq!(record.public_address, "203.0.113.10");
        assert_eq!(record.raw_line, line);
        assert_eq!(record.options(), vec!["extendable"]);
    }

    #[test]
    fn tolerates_irregular_whitespace() {
        let record = parse("ip  nat inside\tsource static 10.0.0.1   1.1.1.1").expect("parse");
        assert_eq!(record.public_address, "1.1.1.1");
        assert!(record.options().is_empty());
    }

    #[test]
    fn rejects_short_line_with_offending_text() {
        let err = parse("ip nat inside source static 10.0.0.1").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedNatLine {
                line: "ip nat inside source static 10.0.0.1".to_string(),
                tokens: 6,
            }
        );
        assert!(err.to_string().contains("10.0.0.1"));
    }

    #[test]
    fn does_not_validate_address_syntax() {
        let record = parse("ip nat inside source static not-an-ip 999.1.1.1").expect("parse");
        assert_eq!(record.inside_address, "not-an-ip");
        assert_eq!(record.public_address, "999.1.1.1");
    }
}
