mod parser;
mod record;

pub use parser::{ParseError, parse_change_line};
pub use record::ChangeRecord;
