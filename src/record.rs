//! Record definitions
//!
//! A record is one line of the data file:
//!
//! ```text
//! key,name,roll_no,email,marks\n
//! ```
//!
//! Fields are joined by `,` with no escaping. A field containing `,` or a
//! line break cannot be stored, so writes reject them up front.

use serde::{Deserialize, Serialize};

use crate::error::{IsamError, Result};

/// Field delimiter within a line
pub const DELIMITER: char = ',';

/// Number of fields in a well-formed line (key included)
pub const FIELD_COUNT: usize = 5;

/// The value part of a stored record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub name: String,
    pub roll_no: String,
    pub email: String,
    pub marks: f64,
}

/// Positions of the fields within a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Key = 0,
    Name = 1,
    RollNo = 2,
    Email = 3,
    Marks = 4,
}

impl Field {
    fn label(self) -> &'static str {
        match self {
            Field::Key => "key",
            Field::Name => "name",
            Field::RollNo => "roll_no",
            Field::Email => "email",
            Field::Marks => "marks",
        }
    }
}

impl Record {
    pub fn new(
        name: impl Into<String>,
        roll_no: impl Into<String>,
        email: impl Into<String>,
        marks: f64,
    ) -> Self {
        Self {
            name: name.into(),
            roll_no: roll_no.into(),
            email: email.into(),
            marks,
        }
    }

    /// Check that every field can be written without corrupting the line
    pub fn validate(&self) -> Result<()> {
        check_text(Field::Name, &self.name)?;
        check_text(Field::RollNo, &self.roll_no)?;
        check_text(Field::Email, &self.email)?;
        if !self.marks.is_finite() {
            return Err(IsamError::InvalidRecord(format!(
                "marks must be a finite number, got {}",
                self.marks
            )));
        }
        Ok(())
    }

    /// Serialize as a line (without the trailing newline)
    pub fn to_line(&self, key: &str) -> String {
        format!(
            "{key}{d}{}{d}{}{d}{}{d}{}",
            self.name,
            self.roll_no,
            self.email,
            format_marks(self.marks),
            d = DELIMITER,
        )
    }

    /// Parse a stored line back into its key and record
    pub fn from_line(line: &str) -> Result<(String, Record)> {
        let line = trim_line(line);
        let fields: Vec<&str> = line.split(DELIMITER).collect();
        if fields.len() != FIELD_COUNT {
            return Err(IsamError::Parse(format!(
                "expected {} fields, found {} in line {:?}",
                FIELD_COUNT,
                fields.len(),
                line
            )));
        }

        let record = Record {
            name: fields[1].to_string(),
            roll_no: fields[2].to_string(),
            email: fields[3].to_string(),
            marks: parse_marks(fields[4])?,
        };
        Ok((fields[0].to_string(), record))
    }
}

/// Validate a primary key
pub fn validate_key(key: &str) -> Result<()> {
    check_text(Field::Key, key)
}

fn check_text(field: Field, value: &str) -> Result<()> {
    if value.contains(DELIMITER) || value.contains(['\n', '\r']) {
        return Err(IsamError::InvalidRecord(format!(
            "{} must not contain ',' or line breaks: {:?}",
            field.label(),
            value
        )));
    }
    Ok(())
}

/// Format marks the way they are stored: shortest round-trip decimal,
/// with a trailing `.0` for integral values (`91.0`, not `91`).
pub fn format_marks(marks: f64) -> String {
    let text = marks.to_string();
    if marks.is_finite() && !text.contains(['.', 'e', 'E']) {
        format!("{}.0", text)
    } else {
        text
    }
}

/// Parse a marks field
pub fn parse_marks(text: &str) -> Result<f64> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| IsamError::Parse(format!("marks field is not numeric: {:?}", text)))
}

/// Strip the line terminator
pub fn trim_line(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// The key of a raw line: everything before the first delimiter
pub fn key_of(line: &str) -> &str {
    let line = trim_line(line);
    match line.find(DELIMITER) {
        Some(pos) => &line[..pos],
        None => line,
    }
}

/// Extract one field from a raw line
pub fn field_of(line: &str, field: Field) -> Result<&str> {
    trim_line(line)
        .split(DELIMITER)
        .nth(field as usize)
        .ok_or_else(|| {
            IsamError::Parse(format!(
                "line has no {} field: {:?}",
                field.label(),
                trim_line(line)
            ))
        })
}
