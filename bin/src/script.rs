//! Edit scripts: a textual form of piece table operations
//!
//! Each edit is `<kind>:<index>:<argument>`. Only the first two colons separate
//! fields, so inserted text may contain colons. Inserted text understands the
//! escapes `\n`, `\t` and `\\`.

use std::{fmt, num::ParseIntError, str::FromStr};

use piecework_text::PieceTable;
use snafu::{OptionExt, ResultExt, Snafu};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ScriptError {
    #[snafu(display(
        "Invalid edit {edit:?}: expected insert:<index>:<text>, delete:<index>:<length> or read:<index>:<length>"
    ))]
    InvalidEdit { edit: String },

    #[snafu(display("Invalid number {value:?} in edit: {source}"))]
    InvalidNumber {
        value: String,
        source: ParseIntError,
    },

    #[snafu(display("Edit #{position} ({edit}) failed: {source}"))]
    Apply {
        position: usize,
        edit: Edit,
        source: piecework_text::Error,
    },
}

/// One scripted operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    Insert { index: usize, text: String },
    Delete { index: isize, length: isize },
    Read { index: isize, length: isize },
}

impl FromStr for Edit {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = InvalidEditSnafu { edit: s };
        let (kind, rest) = s.split_once(':').context(invalid)?;
        let (index, argument) = rest.split_once(':').context(invalid)?;

        match kind {
            "insert" => Ok(Edit::Insert {
                index: parse_number(index)?,
                text: unescape(argument),
            }),
            "delete" => Ok(Edit::Delete {
                index: parse_number(index)?,
                length: parse_number(argument)?,
            }),
            "read" => Ok(Edit::Read {
                index: parse_number(index)?,
                length: parse_number(argument)?,
            }),
            _ => invalid.fail(),
        }
    }
}

impl fmt::Display for Edit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edit::Insert { index, text } => write!(f, "insert:{index}:{}", escape(text)),
            Edit::Delete { index, length } => write!(f, "delete:{index}:{length}"),
            Edit::Read { index, length } => write!(f, "read:{index}:{length}"),
        }
    }
}

fn parse_number<T: FromStr<Err = ParseIntError>>(value: &str) -> Result<T, ScriptError> {
    value.trim().parse().context(InvalidNumberSnafu { value })
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// The table after a script ran, plus the text of every `read` edit in order.
#[derive(Debug)]
pub struct Outcome {
    pub table: PieceTable,
    pub reads: Vec<String>,
}

/// Apply `edits` to a fresh table over `document`.
///
/// Stops at the first failing edit; edits before it have already been applied.
pub fn run(document: &str, edits: &[Edit]) -> Result<Outcome, ScriptError> {
    let mut table = PieceTable::new(document);
    let mut reads = Vec::new();

    for (position, edit) in edits.iter().enumerate() {
        tracing::debug!("applying edit #{}: {}", position + 1, edit);
        let context = ApplySnafu {
            position: position + 1,
            edit: edit.clone(),
        };
        match edit {
            Edit::Insert { index, text } => table.insert(text, *index).context(context)?,
            Edit::Delete { index, length } => table.delete(*index, *length).context(context)?,
            Edit::Read { index, length } => {
                reads.push(table.string_at(*index, *length).context(context)?);
            }
        }
    }

    tracing::debug!(
        "script finished: {} chars in {} pieces",
        table.len(),
        table.piece_count()
    );
    Ok(Outcome { table, reads })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edits(script: &[&str]) -> Vec<Edit> {
        script
            .iter()
            .map(|edit| edit.parse().expect("valid edit"))
            .collect()
    }

    #[test]
    fn parse_each_kind() {
        assert_eq!(
            "insert:3:a:b".parse::<Edit>().expect("valid"),
            Edit::Insert {
                index: 3,
                text: "a:b".into()
            }
        );
        assert_eq!(
            "delete:10:-4".parse::<Edit>().expect("valid"),
            Edit::Delete {
                index: 10,
                length: -4
            }
        );
        assert_eq!(
            "read:0:5".parse::<Edit>().expect("valid"),
            Edit::Read {
                index: 0,
                length: 5
            }
        );
    }

    #[test]
    fn parse_unescapes_inserted_text() {
        assert_eq!(
            r"insert:0:a\nb\tc\\d\q".parse::<Edit>().expect("valid"),
            Edit::Insert {
                index: 0,
                text: "a\nb\tc\\d\\q".into()
            }
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            "replace:0:x".parse::<Edit>(),
            Err(ScriptError::InvalidEdit { .. })
        ));
        assert!(matches!(
            "delete:5".parse::<Edit>(),
            Err(ScriptError::InvalidEdit { .. })
        ));
        assert!(matches!(
            "insert:-1:x".parse::<Edit>(),
            Err(ScriptError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn display_round_trips_through_parse() {
        let edit = Edit::Insert {
            index: 2,
            text: "tab\tline\n\\ é".into(),
        };
        assert_eq!(edit.to_string(), r"insert:2:tab\tline\n\\ é");
        assert_eq!(edit.to_string().parse::<Edit>().expect("valid"), edit);
    }

    #[test]
    fn run_applies_edits_in_order() {
        piecework_log::test();

        let outcome = run(
            "Hello world",
            &edits(&["insert:5:,", "read:0:6", "delete:12:-6", "insert:6: there"]),
        )
        .expect("script succeeds");

        assert_eq!(outcome.table.get_text(), "Hello, there");
        assert_eq!(outcome.reads, ["Hello,"]);
    }

    #[test]
    fn run_reports_failing_edit() {
        let err = run("abc", &edits(&["insert:3:d", "delete:2:10"])).expect_err("out of range");

        match err {
            ScriptError::Apply { position, edit, .. } => {
                assert_eq!(position, 2);
                assert_eq!(
                    edit,
                    Edit::Delete {
                        index: 2,
                        length: 10
                    }
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
