use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    #[error("table is empty")]
    Empty,
    #[error("header row has no columns")]
    EmptyHeader,
    #[error("unterminated quoted field on line {line}")]
    UnterminatedQuote { line: usize },
    #[error("missing required column '{column}' (accepted names: {aliases})")]
    MissingColumn { column: String, aliases: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    /// 1-based line number in the source text.
    pub line: usize,
    pub fields: Vec<String>,
}

impl TableRow {
    pub fn field(&self, index: usize) -> Option<&str> {
        self.fields.get(index).map(String::as_str)
    }
}

/// A header plus data rows read from comma or semicolon separated text.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedTable {
    pub delimiter: char,
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl DelimitedTable {
    /// The delimiter is `;` if the first line contains one, `,` otherwise.
    pub fn detect_delimiter(first_line: &str) -> char {
        if first_line.contains(';') {
            ';'
        } else {
            ','
        }
    }

    pub fn parse(text: &str) -> Result<Self, TableError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, l)| (i + 1, l))
            .filter(|(_, l)| !l.trim().is_empty());

        let (header_line, header) = lines.next().ok_or(TableError::Empty)?;
        let delimiter = Self::detect_delimiter(header);
        let headers = split_fields(header, delimiter, header_line)?;
        if headers.iter().all(|h| h.is_empty()) {
            return Err(TableError::EmptyHeader);
        }

        let rows = lines
            .map(|(line, l)| {
                Ok(TableRow {
                    line,
                    fields: split_fields(l, delimiter, line)?,
                })
            })
            .collect::<Result<Vec<_>, TableError>>()?;

        Ok(Self {
            delimiter,
            headers,
            rows,
        })
    }

    /// Index of the first header matching any alias, compared case-insensitively.
    pub fn column_index(&self, aliases: &[&str]) -> Option<usize> {
        aliases.iter().find_map(|alias| {
            self.headers
                .iter()
                .position(|h| h.trim().to_lowercase() == alias.to_lowercase())
        })
    }

    pub fn require_column(&self, column: &str, aliases: &[&str]) -> Result<usize, TableError> {
        self.column_index(aliases)
            .ok_or_else(|| TableError::MissingColumn {
                column: column.to_string(),
                aliases: aliases.join(", "),
            })
    }
}

fn split_fields(line: &str, delimiter: char, line_no: usize) -> Result<Vec<String>, TableError> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            c => current.push(c),
        }
    }
    if in_quotes {
        return Err(TableError::UnterminatedQuote { line: line_no });
    }
    fields.push(current.trim().to_string());
    Ok(fields)
}

/// Renders rows as delimited text, quoting fields that contain the delimiter or a quote.
pub fn write_table(delimiter: char, headers: &[&str], rows: &[Vec<String>]) -> String {
    let quote = |field: &str| -> String {
        if field.contains(delimiter) || field.contains('"') {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    };
    let sep = delimiter.to_string();
    let mut out = headers
        .iter()
        .map(|h| quote(h))
        .collect::<Vec<_>>()
        .join(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&row.iter().map(|f| quote(f)).collect::<Vec<_>>().join(&sep));
        out.push('\n');
    }
    out
}
