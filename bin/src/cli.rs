use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use clap::Parser;

use crate::script::Edit;

/// Replay an edit script against a document held in a piece table.
#[derive(Debug, Parser)]
#[command(name = "piecework", version)]
pub struct Cli {
    /// Initial document. Read from stdin when absent or `-`.
    pub input: Option<PathBuf>,

    /// Edit to apply, in order: `insert:<index>:<text>`, `delete:<index>:<length>`
    /// or `read:<index>:<length>`. Lengths may be negative.
    #[arg(short, long = "edit", value_name = "EDIT")]
    pub edits: Vec<Edit>,

    /// Print the final piece list to stderr.
    #[arg(long)]
    pub pieces: bool,

    /// Also write logs to this file (or directory).
    #[arg(long, env = "PIECEWORK_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

/// Read the initial document from `path`, or stdin for `None` and `-`.
pub fn read_document(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut document = String::new();
            io::stdin().lock().read_to_string(&mut document)?;
            Ok(document)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edits_in_order() {
        let cli = Cli::try_parse_from([
            "piecework",
            "doc.txt",
            "-e",
            "insert:0:hi",
            "--edit",
            "delete:5:-2",
            "--pieces",
        ])
        .expect("valid arguments");

        assert_eq!(cli.input, Some(PathBuf::from("doc.txt")));
        assert_eq!(
            cli.edits,
            [
                Edit::Insert {
                    index: 0,
                    text: "hi".into()
                },
                Edit::Delete {
                    index: 5,
                    length: -2
                },
            ]
        );
        assert!(cli.pieces);
    }

    #[test]
    fn rejects_malformed_edit() {
        assert!(Cli::try_parse_from(["piecework", "-e", "insert"]).is_err());
        assert!(Cli::try_parse_from(["piecework", "-e", "delete:x:1"]).is_err());
    }

    #[test]
    fn reads_document_from_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("doc.txt");
        fs::write(&path, "on disk").expect("write");

        assert_eq!(read_document(Some(&path)).expect("readable"), "on disk");
        assert!(read_document(Some(&dir.path().join("missing.txt"))).is_err());
    }
}
