//! Answer codes and answer rows
//!
//! A code is the identifier of one selectable option. Only its first three
//! characters are canonical; anything after them is free text attached to an
//! open-ended option.

/// Identifier of one selectable answer option
pub type Code = String;

/// One respondent's selected codes
pub type AnswerRow = Vec<Code>;

/// All respondents
pub type AnswerSet = Vec<AnswerRow>;

/// Number of leading characters that identify a code
pub const CANONICAL_LEN: usize = 3;

/// Canonical part of a code, used for every domain membership test
#[must_use]
pub fn canonical(code: &str) -> &str {
    match code.char_indices().nth(CANONICAL_LEN) {
        Some((idx, _)) => &code[..idx],
        None => code,
    }
}

/// Sort a row in place so repaired and generated rows compare deterministically
pub fn sort_row(row: &mut AnswerRow) {
    row.sort_unstable();
}
