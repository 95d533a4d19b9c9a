// Standard Library Imports
use std::fmt::{self, Display};

// External Crate Imports
use miette::{Diagnostic, LabeledSpan, SourceSpan};
use nom::{
    Err, Finish, IResult, Parser,
    combinator::{all_consuming, consumed},
    error::ErrorKind,
};
use thiserror::Error;

// Local Crate Imports
use crate::atoms::errors::AtomicLookupError;

pub type ParseResult<'s, O> = IResult<&'s str, O, ParseError<'s>>;

// Public API ==========================================================================================================

/// A fully-reported chemical formula error, carrying the formula it was raised for
#[derive(Clone, Eq, PartialEq, Debug, Error)]
#[error("{kind}")]
pub struct CompositionError {
    formula: String,
    span: SourceSpan,
    kind: CompositionErrorKind,
}

impl CompositionError {
    pub const fn kind(&self) -> &CompositionErrorKind {
        &self.kind
    }

    pub const fn span(&self) -> SourceSpan {
        self.span
    }
}

impl Diagnostic for CompositionError {
    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.formula)
    }

    fn help<'a>(&'a self) -> Option<Box<dyn Display + 'a>> {
        self.kind.help()
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = self.kind.label()?;
        Some(Box::new(std::iter::once(LabeledSpan::new_with_span(
            Some(label.to_owned()),
            self.span,
        ))))
    }
}

#[derive(Clone, Eq, PartialEq, Debug, Diagnostic, Error)]
pub enum CompositionErrorKind {
    #[error("expected an element (like Au) or an isotope (like [15N]) optionally followed by a number")]
    ExpectedAtomicOffset,

    #[diagnostic(help(
        "a 0 value doesn't make sense here, if you've mistakenly included a leading zero, like \
        NH02, try just NH2 instead"
    ))]
    #[error("counts cannot start with 0")]
    ExpectedNoLeadingZero,

    #[error("expected an ASCII digit 1-9")]
    ExpectedDigit,

    #[error("expected an element symbol")]
    ExpectedElementSymbol,

    #[error("expected '[' to open isotope brackets")]
    ExpectedIsotopeStart,

    #[error("expected an isotopic mass number")]
    ExpectedMassNumber,

    #[diagnostic(help("you've probably forgotten to close an earlier '[' bracket"))]
    #[error("expected ']' to close isotope brackets")]
    ExpectedIsotopeEnd,

    #[error("expected an uppercase ASCII letter")]
    ExpectedUppercase,

    #[error("expected a lowercase ASCII letter")]
    ExpectedLowercase,

    #[diagnostic(transparent)]
    #[error(transparent)]
    Lookup(Box<AtomicLookupError>),

    #[diagnostic(help(
        "this is an internal error that you shouldn't ever see! If you have gotten this error, \
        then please report it as a bug!"
    ))]
    #[error("internal `nom` error: {0:?}")]
    NomError(ErrorKind),

    #[diagnostic(help(
        "check the unparsed region for errors, or remove it from the rest of the composition"
    ))]
    #[error("could not interpret the full input as a valid chemical composition")]
    Incomplete,
}

impl CompositionErrorKind {
    fn label(&self) -> Option<&'static str> {
        Some(match self {
            Self::Lookup(e) => match **e {
                AtomicLookupError::Element(..) => "element not found",
                AtomicLookupError::Isotope(..) => "isotope not found",
                AtomicLookupError::Abundance(..) => "no natural abundance",
            },
            Self::ExpectedAtomicOffset => "expected element or isotope",
            Self::ExpectedUppercase => "expected uppercase",
            Self::ExpectedLowercase => "expected lowercase",
            Self::ExpectedDigit => "expected digit",
            Self::ExpectedElementSymbol => "expected element symbol",
            Self::ExpectedIsotopeStart => "expected '['",
            Self::ExpectedIsotopeEnd => "expected ']'",
            Self::ExpectedMassNumber => "expected a mass number",
            Self::ExpectedNoLeadingZero => "expected non-zero",
            Self::Incomplete => "input was valid up until this point",
            Self::NomError(_) => "the region that triggered this bug!",
        })
    }
}

impl From<ErrorKind> for CompositionErrorKind {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::Eof => Self::Incomplete,
            kind => Self::NomError(kind),
        }
    }
}

// Intermediate Parser Errors ==========================================================================================

/// The in-flight error threaded through `nom` parsers, holding the unparsed input at the point of failure
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ParseError<'s> {
    input: &'s str,
    length: usize,
    kind: CompositionErrorKind,
}

impl<'s> ParseError<'s> {
    pub(crate) const fn new(input: &'s str, kind: CompositionErrorKind) -> Self {
        Self {
            input,
            length: 0,
            kind,
        }
    }

    pub const fn kind(&self) -> &CompositionErrorKind {
        &self.kind
    }

    fn finalize(self, full_input: &str) -> CompositionError {
        let start = full_input.len() - self.input.len();
        let span = SourceSpan::from(start..start + self.length);
        // NOTE: The trailing space lets labels point past the last character of the formula
        let formula = format!("{full_input} ");
        CompositionError {
            formula,
            span,
            kind: self.kind,
        }
    }
}

impl<'s> nom::error::ParseError<&'s str> for ParseError<'s> {
    fn from_error_kind(input: &'s str, kind: ErrorKind) -> Self {
        Self::new(input, kind.into())
    }

    fn append(_input: &'s str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

// Error Combinators ===================================================================================================

/// Runs `parser` over the whole input, turning any leftover input or parse failure into a `CompositionError`
pub(crate) fn final_parser<'s, O, P>(parser: P) -> impl FnMut(&'s str) -> Result<O, CompositionError>
where
    P: Parser<&'s str, O, ParseError<'s>>,
{
    let mut parser = all_consuming(parser);
    move |input| {
        parser
            .parse(input)
            .finish()
            .map(|(_, output)| output)
            .map_err(|e| e.finalize(input))
    }
}

/// Replaces recoverable errors from `parser` with `kind`, leaving failures untouched
pub(crate) fn expect<'s, O, P>(
    mut parser: P,
    kind: CompositionErrorKind,
) -> impl FnMut(&'s str) -> ParseResult<'s, O>
where
    P: Parser<&'s str, O, ParseError<'s>>,
{
    move |i| {
        parser.parse(i).map_err(|e| match e {
            Err::Error(_) => Err::Error(ParseError::new(i, kind.clone())),
            e => e,
        })
    }
}

/// Maps the output of `parser` through a database lookup, reporting a missing entry as a failure spanning everything
/// `parser` consumed
pub(crate) fn lookup<'s, O1, O2, P, F>(
    mut parser: P,
    mut f: F,
) -> impl FnMut(&'s str) -> ParseResult<'s, O2>
where
    P: Parser<&'s str, O1, ParseError<'s>>,
    F: FnMut(O1) -> Result<O2, AtomicLookupError>,
{
    move |i| {
        let (rest, (matched, o1)) = consumed(|i: &'s str| parser.parse(i))(i)?;
        match f(o1) {
            Ok(o2) => Ok((rest, o2)),
            Err(e) => Err(Err::Failure(ParseError {
                input: i,
                length: matched.len(),
                kind: CompositionErrorKind::Lookup(Box::new(e)),
            })),
        }
    }
}

impl Display for ParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {:?}", self.kind, self.input)
    }
}
