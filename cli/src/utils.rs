use std::fmt::Write;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use kensa_codec::{LoadedInput, load_input};
use tracing::debug;

use crate::error::Result;

/// Reads `file`, or stdin when no path is given.
pub(crate) fn read_input(file: Option<&str>) -> Result<Vec<u8>> {
    let bytes = match file {
        Some(path) => fs::read(path)?,
        None => {
            let mut buffer = Vec::new();
            io::stdin().read_to_end(&mut buffer)?;
            buffer
        }
    };
    debug!(source = file.unwrap_or("stdin"), len = bytes.len(), "read input");
    Ok(bytes)
}

/// Reads and classifies the input the way the converter does.
pub(crate) fn load(file: Option<&str>) -> Result<LoadedInput> {
    Ok(load_input(&read_input(file)?)?)
}

/// Final path component of `file`, used to derive output file names.
pub(crate) fn file_name(file: Option<&str>) -> Option<&str> {
    file.and_then(|f| Path::new(f).file_name())
        .and_then(|name| name.to_str())
}

/// `xxd`-style dump: offset, 16 hex bytes split in two groups, then ASCII.
pub(crate) fn format_hex_dump(data: &[u8]) -> Result<String> {
    const BYTES_PER_LINE: usize = 16;
    let mut output = String::new();

    for (line, chunk) in data.chunks(BYTES_PER_LINE).enumerate() {
        write!(output, "{:08x}  ", line * BYTES_PER_LINE)?;
        for i in 0..BYTES_PER_LINE {
            match chunk.get(i) {
                Some(byte) => write!(output, "{:02x} ", byte)?,
                None => output.push_str("   "),
            }
            if i == 7 {
                output.push(' ');
            }
        }
        let ascii = chunk
            .iter()
            .map(|&b| {
                if b.is_ascii_graphic() || b == b' ' {
                    b as char
                } else {
                    '.'
                }
            })
            .collect::<String>();
        writeln!(output, " |{}|", ascii)?;
    }

    Ok(output)
}
