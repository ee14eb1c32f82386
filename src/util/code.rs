use super::{Code, Position};
use once_cell::unsync::OnceCell;

impl<'c> From<&'c [u8]> for Code<'c> {
    fn from(value: &'c [u8]) -> Self {
        Code::new(value)
    }
}
impl<'c> From<&'c str> for Code<'c> {
    fn from(value: &'c str) -> Self {
        Code::new(value.as_bytes())
    }
}

impl<'c> Code<'c> {
    pub fn new(value: &'c [u8]) -> Self {
        Self {
            value,
            line_starts: OnceCell::new(),
        }
    }

    // Byte offsets where each line begins: line 1 starts at offset zero, and every line
    // break opens the next entry.
    fn obtain_line_starts(&self) -> &[usize] {
        self.line_starts.get_or_init(|| {
            let mut starts = vec![0];
            for (offset, byte) in self.value.iter().enumerate() {
                if *byte == b'\n' {
                    starts.push(offset + 1);
                }
            }
            starts
        })
    }

    pub fn obtain_position(&self, pointer: usize) -> Position {
        let starts = self.obtain_line_starts();
        // The number of line starts at or before the pointer is its 1-based line number.
        let line = starts.partition_point(|start| *start <= pointer);
        let line_start = starts[line - 1];
        let upto = pointer.min(self.value.len());
        let column = String::from_utf8_lossy(&self.value[line_start..upto])
            .chars()
            .count();
        Position::new(line, column + 1)
    }
}
