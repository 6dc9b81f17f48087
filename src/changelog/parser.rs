use snafu::{ResultExt, Snafu, ensure};

use crate::changelog::ChangeRecord;

// A change line has a fixed positional layout:
// `inode N file offset N len N disk start N offset N gen N flags FLAGS path`
const OFFSET_FIELD: usize = 4;
const LEN_FIELD: usize = 6;
const PATH_FIELD: usize = 16;
const MIN_FIELDS: usize = PATH_FIELD + 1;

pub fn parse_change_line(line: &str) -> Result<ChangeRecord, ParseError> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    ensure!(
        fields.len() >= MIN_FIELDS,
        TruncatedLineSnafu {
            line,
            found: fields.len(),
            expected: MIN_FIELDS,
        }
    );

    let length = fields[LEN_FIELD].parse().context(InvalidNumberSnafu {
        line,
        field: fields[LEN_FIELD],
    })?;
    let offset = fields[OFFSET_FIELD].parse().context(InvalidNumberSnafu {
        line,
        field: fields[OFFSET_FIELD],
    })?;

    Ok(ChangeRecord {
        path: fields[PATH_FIELD].to_string(),
        length,
        offset,
    })
}

#[derive(Debug, Snafu)]
pub enum ParseError {
    #[snafu(display(
        "Change line has {} fields, expected at least {}: '{}'",
        found,
        expected,
        line
    ))]
    TruncatedLineError {
        line: String,
        found: usize,
        expected: usize,
    },
    #[snafu(display("Change line field '{}' is not a number: '{}'", field, line))]
    InvalidNumberError {
        line: String,
        field: String,
        source: std::num::ParseIntError,
    },
}
