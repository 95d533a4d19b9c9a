// External Crate Imports
use nom::{
    Parser,
    branch::alt,
    character::complete::char,
    combinator::{cut, map, opt, recognize},
    multi::many1,
    sequence::{delimited, pair},
};

// Local Crate Imports
use super::{
    errors::{CompositionErrorKind, ParseResult, expect, lookup},
    primitives::{count, lowercase, mass_number, uppercase},
};
use crate::{AtomicDatabase, ChemicalComposition, Element, MassNumber};

// Public API ==========================================================================================================

/// Chemical Composition = { Atomic Offset }- ;
pub fn chemical_composition<'a, 's>(
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, ChemicalComposition<'a>> {
    map(many1(atomic_offset(db)), ChemicalComposition::from_counts)
}

// Private Sub-Parsers =================================================================================================

/// Atomic Offset = ( Element | Isotope ) , [ Count ] ;
fn atomic_offset<'a, 's>(
    db: &'a AtomicDatabase,
) -> impl FnMut(&'s str) -> ParseResult<'s, (Element<'a>, i32)> {
    let element_or_isotope = expect(
        alt((element(db), isotope(db))),
        CompositionErrorKind::ExpectedAtomicOffset,
    );
    let optional_count = opt(count).map(|c| c.unwrap_or(1));
    pair(element_or_isotope, optional_count)
}

// ---------------------------------------------------------------------------------------------------------------------

/// Element = uppercase , [ lowercase ] ;
fn element<'a, 's>(db: &'a AtomicDatabase) -> impl FnMut(&'s str) -> ParseResult<'s, Element<'a>> {
    lookup(element_symbol, |symbol| Element::new(db, symbol))
}

// NOTE: These are not meant to be links, it's just EBNF
#[allow(clippy::doc_link_with_quotes)]
/// Isotope = "[" , Mass Number , Element , "]" ;
fn isotope<'a, 's>(db: &'a AtomicDatabase) -> impl FnMut(&'s str) -> ParseResult<'s, Element<'a>> {
    lookup(isotope_expr, |(mass_number, symbol)| {
        Element::new_isotope(db, symbol, mass_number)
    })
}

// ---------------------------------------------------------------------------------------------------------------------

/// Element = uppercase , [ lowercase ] ;
fn element_symbol(i: &str) -> ParseResult<&str> {
    let parser = recognize(pair(uppercase, opt(lowercase)));
    expect(parser, CompositionErrorKind::ExpectedElementSymbol)(i)
}

// NOTE: These are not meant to be links, it's just EBNF
#[allow(clippy::doc_link_with_quotes)]
/// Isotope = "[" , Mass Number , Element , "]" ;
fn isotope_expr(i: &str) -> ParseResult<(MassNumber, &str)> {
    let opening_bracket = expect(char('['), CompositionErrorKind::ExpectedIsotopeStart);
    let closing_bracket = cut(expect(char(']'), CompositionErrorKind::ExpectedIsotopeEnd));
    delimited(
        opening_bracket,
        cut(pair(mass_number, element_symbol)),
        closing_bracket,
    )(i)
}

// Module Tests ========================================================================================================
