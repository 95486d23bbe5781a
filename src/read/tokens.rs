use nom::character::complete::digit1;
use nom::combinator::{all_consuming, map_res};
use nom::number::complete::double;
use nom::IResult;

use crate::error::{Error, Result};

/// Splits a raw line into its non-empty words.
///
/// Carriage returns and tabs count as spaces.
pub fn tokenize(line: &str) -> Vec<&str> {
    line.trim()
        .split(|c: char| c == ' ' || c == '\t' || c == '\r')
        .filter(|w| !w.is_empty())
        .collect()
}

fn float_token(i: &str) -> IResult<&str, f64> {
    all_consuming(double)(i)
}

fn count_token(i: &str) -> IResult<&str, usize> {
    all_consuming(map_res(digit1, str::parse::<usize>))(i)
}

pub(crate) fn float(token: &str, line: usize, field: &'static str) -> Result<f64> {
    float_token(token)
        .map(|(_, v)| v)
        .map_err(|_| invalid(token, line, field))
}

pub(crate) fn count(token: &str, line: usize, field: &'static str) -> Result<usize> {
    count_token(token)
        .map(|(_, v)| v)
        .map_err(|_| invalid(token, line, field))
}

/// Fetches `tokens[index]`, reporting `field` as missing when the line is too short.
pub(crate) fn field<'a>(
    tokens: &[&'a str],
    index: usize,
    line: usize,
    field: &'static str,
) -> Result<&'a str> {
    tokens
        .get(index)
        .copied()
        .ok_or(Error::MissingField { line, field })
}

fn invalid(token: &str, line: usize, field: &'static str) -> Error {
    Error::InvalidNumber {
        line,
        field,
        token: token.to_owned(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn split_noise() {
        assert_eq!(tokenize("  OFFSET\t1.0  2.0\t\t3.0\r"), ["OFFSET", "1.0", "2.0", "3.0"]);
        assert_eq!(tokenize("End Site"), ["End", "Site"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \t\r\n").is_empty());
    }

    #[test]
    fn floats() {
        assert_eq!(float("1.5", 1, "x").unwrap(), 1.5);
        assert_eq!(float("-0.25", 1, "x").unwrap(), -0.25);
        assert_eq!(float("3", 1, "x").unwrap(), 3.0);
        assert_eq!(float("1e-3", 1, "x").unwrap(), 0.001);
        match float("1.0abc", 7, "offset") {
            Err(Error::InvalidNumber { line, field, token }) => {
                assert_eq!(line, 7);
                assert_eq!(field, "offset");
                assert_eq!(token, "1.0abc");
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(float("abc", 1, "x").is_err());
    }

    #[test]
    fn counts() {
        assert_eq!(count("12", 1, "n").unwrap(), 12);
        assert_eq!(count("0", 1, "n").unwrap(), 0);
        assert!(count("-1", 1, "n").is_err());
        assert!(count("3.5", 1, "n").is_err());
        assert!(count("x", 1, "n").is_err());
    }

    #[test]
    fn missing_field() {
        let tokens = tokenize("OFFSET 1 2");
        assert_eq!(field(&tokens, 2, 1, "y").unwrap(), "2");
        assert!(matches!(
            field(&tokens, 3, 4, "z"),
            Err(Error::MissingField { line: 4, field: "z" })
        ));
    }
}
