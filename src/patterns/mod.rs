//! Bit-pattern compiler.
//!
//! Turns the textual encoding table into [`ParsedPattern`] descriptors.
//! A pattern is nineteen characters: four nibble groups separated by single
//! spaces at indices 4, 9 and 14, most significant nibble first.

pub mod table;

use tracing::debug;

use crate::error::{DisasmError, Result};
use crate::fields::FieldTable;
use crate::types::{FieldSpec, InstructionPattern, ParsedPattern, TraceFaultResolution};

pub use table::{instruction_patterns, mnemonic};

/// Length of a pattern string including separators.
pub const PATTERN_LEN: usize = 19;

/// Separator positions in a pattern string.
pub const SEPARATORS: [usize; 3] = [4, 9, 14];

/// Compile one pattern string.
///
/// `index` is the row number in the configuration table and is only used
/// to label errors.
pub fn parse_pattern(index: usize, text: &str) -> Result<ParsedPattern> {
    let fail = |message: String| DisasmError::PatternSpec {
        index,
        pattern: text.to_string(),
        message,
    };

    if !text.is_ascii() || text.len() != PATTERN_LEN {
        return Err(fail(format!(
            "expected {} ASCII characters, got {}",
            PATTERN_LEN,
            text.chars().count()
        )));
    }

    let raw = text.as_bytes();
    for &pos in &SEPARATORS {
        if raw[pos] != b' ' {
            return Err(fail(format!("expected a space at index {pos}")));
        }
    }

    // Canonical 16-character form, bit 15 first.
    let bits: Vec<u8> = raw
        .iter()
        .enumerate()
        .filter(|(i, _)| !SEPARATORS.contains(i))
        .map(|(_, &c)| c)
        .collect();

    let mut const_mask = 0u16;
    let mut const_bits = 0u16;
    let mut dont_care_mask = 0u16;
    let mut fields: Vec<FieldSpec> = Vec::new();

    for bit in 0..16u8 {
        let c = bits[15 - usize::from(bit)];
        match c {
            b'0' | b'1' => {
                const_mask |= 1 << bit;
                if c == b'1' {
                    const_bits |= 1 << bit;
                }
            }
            b'X' => dont_care_mask |= 1 << bit,
            b'A'..=b'Z' => {
                let letter = char::from(c);
                match fields.iter_mut().find(|f| f.letter == letter) {
                    Some(field) if field.offset + field.width == bit => field.width += 1,
                    Some(field) => {
                        return Err(fail(format!(
                            "field '{letter}' reappears at bit {bit} after ending at bit {}",
                            field.offset + field.width - 1
                        )));
                    }
                    None => fields.push(FieldSpec {
                        letter,
                        offset: bit,
                        width: 1,
                    }),
                }
            }
            other => {
                return Err(fail(format!(
                    "invalid character '{}' for bit {bit}",
                    char::from(other)
                )));
            }
        }
    }

    Ok(ParsedPattern {
        const_mask,
        const_bits,
        dont_care_mask,
        fields,
    })
}

fn check_named_fields(index: usize, row: &InstructionPattern, parsed: &ParsedPattern) -> Result<()> {
    for field in &parsed.fields {
        let Some(table) = FieldTable::select(row.mnemonic, field.letter) else {
            continue;
        };
        let values = 1usize << field.width;
        if table.names().len() < values {
            return Err(DisasmError::PatternSpec {
                index,
                pattern: row.pattern_text.to_string(),
                message: format!(
                    "field '{}' is {} bits wide but its name table has {} entries",
                    field.letter,
                    field.width,
                    table.names().len()
                ),
            });
        }
    }
    Ok(())
}

/// A configuration row together with its compiled form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    /// The row as written in the encoding table.
    pub source: InstructionPattern,
    /// The compiled descriptor.
    pub parsed: ParsedPattern,
}

/// An ordered, fully compiled encoding table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternSet {
    patterns: Vec<CompiledPattern>,
}

impl PatternSet {
    /// Compile every row, failing on the first malformed one.
    ///
    /// A named field must be narrow enough that every raw value has an
    /// entry in its name table.
    pub fn compile(rows: &[InstructionPattern]) -> Result<Self> {
        let patterns = rows
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let parsed = parse_pattern(index, row.pattern_text)?;
                check_named_fields(index, row, &parsed)?;
                Ok(CompiledPattern {
                    source: *row,
                    parsed,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(count = patterns.len(), "compiled microinstruction patterns");
        Ok(Self { patterns })
    }

    /// Compile the patent table under the given trace-fault resolution.
    pub fn standard(resolution: TraceFaultResolution) -> Result<Self> {
        Self::compile(&instruction_patterns(resolution))
    }

    /// Pattern at `index`.
    pub fn get(&self, index: usize) -> Option<&CompiledPattern> {
        self.patterns.get(index)
    }

    /// Iterate in table order.
    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    /// Number of patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(letter: char, offset: u8, width: u8) -> FieldSpec {
        FieldSpec {
            letter,
            offset,
            width,
        }
    }

    #[test]
    fn test_parse_branch() {
        let parsed = parse_pattern(0, "1100 AAAA AAAA AAAA").unwrap();
        assert_eq!(parsed.const_mask, 0xF000);
        assert_eq!(parsed.const_bits, 0xC000);
        assert_eq!(parsed.dont_care_mask, 0);
        assert_eq!(parsed.fields, vec![field('A', 0, 12)]);
    }

    #[test]
    fn test_parse_no_operation() {
        let parsed = parse_pattern(0, "1010 0SS0 1100 XXXX").unwrap();
        assert_eq!(parsed.const_mask, 0xF9F0);
        assert_eq!(parsed.const_bits, 0xA0C0);
        assert_eq!(parsed.dont_care_mask, 0x000F);
        assert_eq!(parsed.fields, vec![field('S', 9, 2)]);
    }

    #[test]
    fn test_fields_ordered_by_lowest_bit() {
        let parsed = parse_pattern(0, "000M PJJQ WVVV BBBB").unwrap();
        let letters: Vec<char> = parsed.fields.iter().map(|f| f.letter).collect();
        assert_eq!(letters, vec!['B', 'V', 'W', 'Q', 'J', 'P', 'M']);
        assert_eq!(parsed.field('J'), Some(&field('J', 9, 2)));
        assert_eq!(parsed.field('V'), Some(&field('V', 4, 3)));
    }

    #[test]
    fn test_extract_single_bit_fields() {
        let parsed = parse_pattern(0, "0110 0SSD DRJT AABB").unwrap();
        let letters: Vec<char> = parsed.fields.iter().map(|f| f.letter).collect();
        assert_eq!(letters, vec!['B', 'A', 'T', 'J', 'R', 'D', 'S']);
        assert_eq!(parsed.field('D'), Some(&field('D', 7, 2)));
    }

    #[test]
    fn test_rejects_bad_length() {
        let err = parse_pattern(3, "1100 AAAA AAAA").unwrap_err();
        match err {
            DisasmError::PatternSpec { index, .. } => assert_eq!(index, 3),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_rejects_misplaced_separator() {
        assert!(parse_pattern(0, "11000AAAA AAAA AAAA").is_err());
        assert!(parse_pattern(0, "1100 AAAA AAAA_AAAA").is_err());
    }

    #[test]
    fn test_rejects_non_contiguous_field() {
        let err = parse_pattern(7, "1100 AAAA 0000 AAAA").unwrap_err();
        assert!(err.to_string().contains("'A'"));
        assert!(err.to_string().contains("entry 7"));
    }

    #[test]
    fn test_rejects_invalid_character() {
        assert!(parse_pattern(0, "1100 aaaa AAAA AAAA").is_err());
        assert!(parse_pattern(0, "1100 2AAA AAAA AAAA").is_err());
    }

    #[test]
    fn test_every_row_partitions_sixteen_bits() {
        for resolution in [
            TraceFaultResolution::SetTraceFault,
            TraceFaultResolution::AccessDestination,
        ] {
            let set = PatternSet::standard(resolution).unwrap();
            for compiled in set.iter() {
                let p = &compiled.parsed;
                let fields = p.field_mask();
                let name = compiled.source.mnemonic;
                assert_eq!(p.const_mask & p.dont_care_mask, 0, "{name}");
                assert_eq!(p.const_mask & fields, 0, "{name}");
                assert_eq!(p.dont_care_mask & fields, 0, "{name}");
                assert_eq!(p.const_mask | p.dont_care_mask | fields, 0xFFFF, "{name}");
                assert_eq!(p.const_bits & !p.const_mask, 0, "{name}");
                for pair in p.fields.windows(2) {
                    assert!(pair[0].offset < pair[1].offset, "{name}");
                }
            }
        }
    }

    #[test]
    fn test_compile_reports_offending_row() {
        let rows = [
            InstructionPattern::new("1100 AAAA AAAA AAAA", "1", "Branch"),
            InstructionPattern::new("1101 AAAA", "1", "Broken"),
        ];
        match PatternSet::compile(&rows).unwrap_err() {
            DisasmError::PatternSpec { index, pattern, .. } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "1101 AAAA");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_compile_rejects_named_field_wider_than_table() {
        let rows = [
            InstructionPattern::new("1100 AAAA AAAA AAAA", "1", "Branch"),
            InstructionPattern::new("0000 0000 0000 00WW", "1", "Wide Direction"),
        ];
        match PatternSet::compile(&rows).unwrap_err() {
            DisasmError::PatternSpec {
                index,
                pattern,
                message,
            } => {
                assert_eq!(index, 1);
                assert_eq!(pattern, "0000 0000 0000 00WW");
                assert!(message.contains("'W'"), "{message}");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_compile_accepts_named_field_narrower_than_table() {
        // three bits of a sixteen-entry register table
        let rows = [InstructionPattern::new("0000 0000 0000 0RRR", "1", "Narrow Register")];
        let set = PatternSet::compile(&rows).unwrap();
        assert_eq!(set.len(), 1);
    }
}
