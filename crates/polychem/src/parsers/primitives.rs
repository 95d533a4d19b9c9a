use nom::{
    branch::alt,
    character::complete::{char, satisfy, u32},
    combinator::{cut, map_opt, not},
    sequence::preceded,
};

use crate::MassNumber;

use super::errors::{CompositionErrorKind, ParseResult, expect};

/// uppercase
///   = "A" | "B" | "C" | "D" | "E" | "F" | "G"
///   | "H" | "I" | "J" | "K" | "L" | "M" | "N"
///   | "O" | "P" | "Q" | "R" | "S" | "T" | "U"
///   | "V" | "W" | "X" | "Y" | "Z"
///   ;
pub fn uppercase(i: &str) -> ParseResult<char> {
    let parser = satisfy(|c| c.is_ascii_uppercase());
    expect(parser, CompositionErrorKind::ExpectedUppercase)(i)
}

/// lowercase
///   = "a" | "b" | "c" | "d" | "e" | "f" | "g"
///   | "h" | "i" | "j" | "k" | "l" | "m" | "n"
///   | "o" | "p" | "q" | "r" | "s" | "t" | "u"
///   | "v" | "w" | "x" | "y" | "z"
///   ;
pub fn lowercase(i: &str) -> ParseResult<char> {
    let parser = satisfy(|c| c.is_ascii_lowercase());
    expect(parser, CompositionErrorKind::ExpectedLowercase)(i)
}

/// Magnitude = digit - "0" , { digit } ;
pub fn magnitude(i: &str) -> ParseResult<u32> {
    let not_zero = cut(expect(
        not(char('0')),
        CompositionErrorKind::ExpectedNoLeadingZero,
    ));
    let digits = expect(u32, CompositionErrorKind::ExpectedDigit);
    preceded(not_zero, digits)(i)
}

/// Count = [ "-" ] , Magnitude ;
pub fn count(i: &str) -> ParseResult<i32> {
    let signed = |negative: bool| {
        map_opt(magnitude, move |m| {
            let m = i32::try_from(m).ok()?;
            Some(if negative { -m } else { m })
        })
    };
    let negative = preceded(char('-'), cut(signed(true)));
    expect(
        alt((negative, signed(false))),
        CompositionErrorKind::ExpectedDigit,
    )(i)
}

/// Mass Number = Magnitude ;
pub fn mass_number(i: &str) -> ParseResult<MassNumber> {
    let parser = map_opt(magnitude, MassNumber::new);
    expect(parser, CompositionErrorKind::ExpectedMassNumber)(i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uppercase() {
        // Ensure the complete uppercase ASCII alphabet is present
        for c in 'A'..='Z' {
            assert_eq!(uppercase(&c.to_string()), Ok(("", c)));
        }
        // Ensure the complete lowercase ASCII alphabet is absent
        for c in 'a'..='z' {
            assert!(uppercase(&c.to_string()).is_err());
        }
        // Ensure only one character is parsed
        assert_eq!(uppercase("Hg"), Ok(("g", 'H')));
        assert_eq!(uppercase("HG"), Ok(("G", 'H')));
    }

    #[test]
    fn test_lowercase() {
        // Ensure the complete lowercase ASCII alphabet is present
        for c in 'a'..='z' {
            assert_eq!(lowercase(&c.to_string()), Ok(("", c)));
        }
        // Ensure the complete uppercase ASCII alphabet is absent
        for c in 'A'..='Z' {
            assert!(lowercase(&c.to_string()).is_err());
        }
        // Ensure only one character is parsed
        assert_eq!(lowercase("hg"), Ok(("g", 'h')));
        assert_eq!(lowercase("hG"), Ok(("G", 'h')));
    }

    #[test]
    fn test_count() {
        // Valid Counts
        assert_eq!(count("1"), Ok(("", 1)));
        assert_eq!(count("10"), Ok(("", 10)));
        assert_eq!(count("422"), Ok(("", 422)));
        assert_eq!(count("-9999"), Ok(("", -9999)));
        // Invalid Counts
        assert!(count("0").is_err());
        assert!(count("-0").is_err());
        assert!(count("01").is_err());
        assert!(count("00145").is_err());
        assert!(count("-").is_err());
        assert!(count("--1").is_err());
        assert!(count("+1").is_err());
        assert!(count("H").is_err());
        assert!(count("[H]").is_err());
        assert!(count("3000000000").is_err());
        // Multiple Counts
        assert_eq!(count("1OH"), Ok(("OH", 1)));
        assert_eq!(count("42HeH"), Ok(("HeH", 42)));
        assert_eq!(count("-2N"), Ok(("N", -2)));
    }

    #[test]
    fn count_error_kinds() {
        let kind = |input: &str| match count(input) {
            Err(nom::Err::Error(e) | nom::Err::Failure(e)) => e.kind().clone(),
            _ => panic!("expected {input:?} to fail"),
        };
        assert_eq!(kind("0"), CompositionErrorKind::ExpectedNoLeadingZero);
        assert_eq!(kind("-01"), CompositionErrorKind::ExpectedNoLeadingZero);
        assert_eq!(kind("-"), CompositionErrorKind::ExpectedDigit);
        assert_eq!(kind("H"), CompositionErrorKind::ExpectedDigit);
        // Only a bad count after a '-' is unrecoverable
        assert!(matches!(count("H"), Err(nom::Err::Error(_))));
        assert!(matches!(count("-H"), Err(nom::Err::Failure(_))));
    }

    #[test]
    fn test_mass_number() {
        assert_eq!(
            mass_number("13C"),
            Ok(("C", MassNumber::new(13).unwrap()))
        );
        assert!(mass_number("0C").is_err());
        assert!(mass_number("-13C").is_err());
        assert!(mass_number("C").is_err());
    }
}
