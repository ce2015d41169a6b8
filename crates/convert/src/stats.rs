/// Character and word counts shown under the output panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextStats {
    pub chars: usize,
    pub words: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            chars: text.chars().count(),
            words: text.split_whitespace().count(),
        }
    }

    pub fn chars_label(&self) -> String {
        pluralize(self.chars, "character")
    }

    pub fn words_label(&self) -> String {
        pluralize(self.words, "word")
    }
}

fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_words() {
        let stats = TextStats::of("   ");
        assert_eq!(stats.words, 0);
        assert_eq!(stats.chars, 3);
        assert_eq!(stats.words_label(), "0 words");
    }

    #[test]
    fn labels_are_pluralized() {
        let stats = TextStats::of("a");
        assert_eq!(stats.chars_label(), "1 character");
        assert_eq!(stats.words_label(), "1 word");

        let stats = TextStats::of("hello  brave\nnew world");
        assert_eq!(stats.words, 4);
        assert_eq!(stats.words_label(), "4 words");
    }
}
