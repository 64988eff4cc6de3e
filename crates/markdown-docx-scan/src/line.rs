use std::io::{self, BufRead};

/// One row of input text. `start`/`end` are byte offsets into the source,
/// `end` including the line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub text: String,
    pub index: usize,
    pub start: usize,
    pub end: usize,
}

pub fn read_lines<R: BufRead>(reader: &mut R) -> io::Result<Vec<LineRecord>> {
    let mut lines = Vec::new();
    let mut buffer = String::new();
    let mut offset = 0usize;

    loop {
        buffer.clear();
        let bytes_read = reader.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }

        lines.push(LineRecord {
            text: strip_terminator(&buffer).to_string(),
            index: lines.len(),
            start: offset,
            end: offset + bytes_read,
        });

        offset += bytes_read;
    }

    Ok(lines)
}

/// Splits `input` on `\n`. Unlike [`read_lines`], a trailing newline yields a
/// final empty record, the same as splitting the file contents directly.
pub fn lines_from_str(input: &str) -> Vec<LineRecord> {
    let mut lines = Vec::new();
    let mut offset = 0usize;

    for (index, raw) in input.split('\n').enumerate() {
        let consumed = raw.len() + usize::from(offset + raw.len() < input.len());
        lines.push(LineRecord {
            text: strip_terminator(raw).to_string(),
            index,
            start: offset,
            end: offset + consumed,
        });
        offset += consumed;
    }

    lines
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
