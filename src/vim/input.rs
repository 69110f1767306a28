/// Single-line text buffer with a character cursor
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(value: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set(value);
        buffer
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.byte_position(self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    /// Ctrl+W: drop the word before the cursor along with trailing spaces
    pub fn delete_word_back(&mut self) {
        let chars: Vec<char> = self.content.chars().collect();
        let mut start = self.cursor;
        while start > 0 && chars[start - 1] == ' ' {
            start -= 1;
        }
        while start > 0 && chars[start - 1] != ' ' {
            start -= 1;
        }
        let from = self.byte_position(start);
        let to = self.byte_position(self.cursor);
        self.content.drain(from..to);
        self.cursor = start;
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    pub fn move_start(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.len();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, value: &str) {
        self.content = value.to_string();
        self.cursor = self.len();
    }

    fn remove_at_cursor(&mut self) {
        let from = self.byte_position(self.cursor);
        let to = self.byte_position(self.cursor + 1);
        self.content.drain(from..to);
    }

    fn byte_position(&self, char_idx: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_idx)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_delete_around_cursor() {
        let mut buffer = InputBuffer::with_content("flat");
        buffer.move_start();
        buffer.insert('A');
        buffer.insert(' ');
        assert_eq!(buffer.content(), "A flat");
        assert_eq!(buffer.cursor(), 2);

        assert!(buffer.delete_back());
        assert!(buffer.delete_forward());
        assert_eq!(buffer.content(), "Alat");

        buffer.move_start();
        assert!(!buffer.delete_back());
        buffer.move_end();
        assert!(!buffer.delete_forward());
    }

    #[test]
    fn multibyte_characters_count_once() {
        let mut buffer = InputBuffer::new();
        for c in "Café→".chars() {
            buffer.insert(c);
        }
        assert_eq!(buffer.len(), 5);
        buffer.move_left();
        buffer.delete_back();
        assert_eq!(buffer.content(), "Caf→");
    }

    #[test]
    fn delete_word_back_stops_at_space() {
        let mut buffer = InputBuffer::with_content("grinding noise  ");
        buffer.delete_word_back();
        assert_eq!(buffer.content(), "grinding ");
        buffer.delete_word_back();
        assert!(buffer.is_empty());
        assert_eq!(buffer.cursor(), 0);
    }
}
