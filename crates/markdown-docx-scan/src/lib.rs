mod block;
mod emphasis;
mod line;
mod scanner;

pub use block::{Block, BlockKind, ScannedBlock};
pub use emphasis::strip_emphasis;
pub use line::{lines_from_str, read_lines, LineRecord};
pub use scanner::scan;

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::Path,
};

pub fn scan_blocks(lines: &[LineRecord]) -> Vec<Block> {
    scan(lines).into_iter().map(|scanned| scanned.block).collect()
}

pub fn scan_str(input: &str) -> Vec<Block> {
    scan_blocks(&lines_from_str(input))
}

pub fn scan_from_reader<R: Read>(reader: &mut BufReader<R>) -> io::Result<Vec<Block>> {
    let lines = read_lines(reader)?;
    Ok(scan_blocks(&lines))
}

pub fn scan_from_path(path: &Path) -> io::Result<Vec<Block>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    scan_from_reader(&mut reader)
}
