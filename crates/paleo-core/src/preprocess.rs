use unicode_normalization::UnicodeNormalization;

pub trait Preprocessor {
    // Default transcript preprocessor
    fn process(&self, text: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Canonical composition keeps diacritics as single code points
        let text: String = text.nfc().collect();

        // Model output mixes line endings
        text.replace("\r\n", "\n").replace('\r', "\n")
    }
}

pub struct TranscriptPreprocessor;
impl Preprocessor for TranscriptPreprocessor {}

/// Escaped transcript inside a `<span>`, line breaks kept as `<br/>`
pub fn html_span(text: &str) -> String {
    let lines: Vec<_> = text.lines().map(html_escape::encode_text).collect();
    format!("<span>{}</span>", lines.join("<br/>"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_process_normalizes_and_trims() {
        // "e" + combining acute
        let text = "  Caf\u{0065}\u{0301}\r\nAustin\r  ";
        assert_eq!(TranscriptPreprocessor.process(text), "Caf\u{00e9}\nAustin");
    }

    #[test]
    fn test_process_empty() {
        assert_eq!(TranscriptPreprocessor.process(" \n "), "");
    }

    #[test]
    fn test_html_span_escapes_markup() {
        assert_eq!(
            html_span("Amt <b>$55</b> & \"more\"\nTruly"),
            "<span>Amt &lt;b&gt;$55&lt;/b&gt; &amp; \"more\"<br/>Truly</span>"
        );
    }
}
