// xkb2ifcfg XML Output
// Fixed-capacity XML generator and the buffer that grows until a document fits

use std::fmt::{self, Write as _};

/// Default growth step (and initial capacity) of [`ExpandingXmlBuffer`]
pub const DEFAULT_BUFFER_INCREMENT: usize = 1024 * 1024;

/// A write would have exceeded the generator's capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("XML buffer of {capacity} bytes exceeded")]
pub struct BufferExceeded {
    pub capacity: usize,
}

pub type XmlResult = Result<(), BufferExceeded>;

#[derive(Debug)]
struct Frame {
    name: String,
    has_content: bool,
}

/// Streaming XML writer into a buffer of fixed capacity.
///
/// Elements are indented with tabs, one child per line. Attributes must be
/// written before any child or appended content of the same element. An
/// element without content is self-closed.
#[derive(Debug)]
pub struct XmlGenerator {
    out: String,
    capacity: usize,
    stack: Vec<Frame>,
}

impl XmlGenerator {
    /// Generate a complete document rooted at `root` into at most `capacity` bytes
    pub fn generate<F>(capacity: usize, root: &str, f: F) -> Result<String, BufferExceeded>
    where
        F: FnOnce(&mut XmlGenerator) -> XmlResult,
    {
        let mut xml = XmlGenerator {
            out: String::new(),
            capacity,
            stack: Vec::new(),
        };
        xml.node(root, f)?;
        Ok(xml.out)
    }

    fn write(&mut self, text: &str) -> XmlResult {
        if self.out.len() + text.len() > self.capacity {
            return Err(BufferExceeded {
                capacity: self.capacity,
            });
        }
        self.out.push_str(text);
        Ok(())
    }

    fn write_indent(&mut self, depth: usize) -> XmlResult {
        self.write("\n")?;
        for _ in 0..depth {
            self.write("\t")?;
        }
        Ok(())
    }

    /// Close the start tag of the current element before its first content
    fn enter_content(&mut self) -> XmlResult {
        let opening = match self.stack.last_mut() {
            Some(frame) if !frame.has_content => {
                frame.has_content = true;
                true
            }
            _ => false,
        };
        if opening {
            self.write(">")?;
        }
        Ok(())
    }

    /// Write element `name` whose attributes and children are produced by `f`
    pub fn node<F>(&mut self, name: &str, f: F) -> XmlResult
    where
        F: FnOnce(&mut XmlGenerator) -> XmlResult,
    {
        if !self.stack.is_empty() {
            self.enter_content()?;
            self.write_indent(self.stack.len())?;
        }
        self.write("<")?;
        self.write(name)?;
        self.stack.push(Frame {
            name: name.to_string(),
            has_content: false,
        });

        f(self)?;

        let Some(frame) = self.stack.pop() else {
            return Ok(());
        };
        if frame.has_content {
            self.write_indent(self.stack.len())?;
            self.write("</")?;
            self.write(&frame.name)?;
            self.write(">")
        } else {
            self.write("/>")
        }
    }

    /// Write attribute `name="value"` on the current element, escaping the value
    pub fn attribute(&mut self, name: &str, value: impl fmt::Display) -> XmlResult {
        debug_assert!(
            self.stack.last().is_some_and(|f| !f.has_content),
            "attribute {} after element content",
            name
        );
        let mut raw = String::new();
        // formatting into a String cannot fail
        let _ = write!(raw, "{}", value);

        self.write(" ")?;
        self.write(name)?;
        self.write("=\"")?;
        self.write(&escape(&raw))?;
        self.write("\"")
    }

    /// Append raw text to the content of the current element
    pub fn append(&mut self, text: &str) -> XmlResult {
        self.enter_content()?;
        self.write(text)
    }

    /// Append `prefix` followed by `<!-- text -->` to the current element
    pub fn comment(&mut self, prefix: &str, text: &str) -> XmlResult {
        self.append(prefix)?;
        self.write("<!-- ")?;
        self.write(&text.replace("--", "- -"))?;
        self.write(" -->")
    }
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// XML output that expands to fit the document.
///
/// Generation starts with a capacity of one increment. Whenever the document
/// does not fit, all partial output is discarded, the capacity grows by the
/// increment and the generator function runs again from scratch.
#[derive(Debug)]
pub struct ExpandingXmlBuffer {
    increment: usize,
    capacity: usize,
    attempts: usize,
}

impl Default for ExpandingXmlBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_BUFFER_INCREMENT)
    }
}

impl ExpandingXmlBuffer {
    /// Create a buffer growing by `increment` bytes (at least one)
    pub fn new(increment: usize) -> Self {
        let increment = increment.max(1);
        Self {
            increment,
            capacity: increment,
            attempts: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of generation attempts made so far
    pub fn attempts(&self) -> usize {
        self.attempts
    }

    /// Generate the document rooted at `root`, retrying with a larger buffer
    /// until it fits. `f` must produce the same output on every run.
    pub fn generate<F>(&mut self, root: &str, mut f: F) -> String
    where
        F: FnMut(&mut XmlGenerator) -> XmlResult,
    {
        loop {
            self.attempts += 1;
            match XmlGenerator::generate(self.capacity, root, &mut f) {
                Ok(text) => return text,
                Err(exceeded) => {
                    self.capacity += self.increment;
                    log::debug!("{}, growing to {} bytes", exceeded, self.capacity);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(xml: &mut XmlGenerator) -> XmlResult {
        xml.node("map", |xml| {
            xml.attribute("mod1", true)?;
            xml.node("key", |xml| {
                xml.attribute("name", "KEY_A")?;
                xml.attribute("b0", 97u8)
            })?;
            xml.comment("\t", "a")
        })
    }

    #[test]
    fn test_generate_layout() {
        let text = XmlGenerator::generate(1024, "chargen", sample).unwrap();
        assert_eq!(
            text,
            "<chargen>\n\t<map mod1=\"true\">\n\t\t<key name=\"KEY_A\" b0=\"97\"/>\t<!-- a -->\n\t</map>\n</chargen>"
        );
    }

    #[test]
    fn test_empty_nodes_self_close() {
        let text = XmlGenerator::generate(64, "chargen", |xml| xml.node("map", |_| Ok(()))).unwrap();
        assert_eq!(text, "<chargen>\n\t<map/>\n</chargen>");

        let text = XmlGenerator::generate(64, "chargen", |_| Ok(())).unwrap();
        assert_eq!(text, "<chargen/>");
    }

    #[test]
    fn test_comment_as_first_content() {
        let text = XmlGenerator::generate(256, "chargen", |xml| {
            xml.node("map", |xml| xml.comment("\n\t\t", "printable"))
        })
        .unwrap();
        assert_eq!(
            text,
            "<chargen>\n\t<map>\n\t\t<!-- printable -->\n\t</map>\n</chargen>"
        );
    }

    #[test]
    fn test_attribute_escaping() {
        let text = XmlGenerator::generate(128, "key", |xml| xml.attribute("name", "<\"&'>")).unwrap();
        assert_eq!(text, "<key name=\"&lt;&quot;&amp;&apos;&gt;\"/>");
    }

    #[test]
    fn test_comment_never_contains_double_dash() {
        let text = XmlGenerator::generate(128, "map", |xml| xml.comment("", "--")).unwrap();
        assert_eq!(text, "<map><!-- - - -->\n</map>");
    }

    #[test]
    fn test_capacity_exceeded() {
        let err = XmlGenerator::generate(10, "chargen", sample).unwrap_err();
        assert_eq!(err, BufferExceeded { capacity: 10 });
    }

    #[test]
    fn test_exact_capacity_fits() {
        let text = XmlGenerator::generate(1024, "chargen", sample).unwrap();
        assert!(XmlGenerator::generate(text.len(), "chargen", sample).is_ok());
        assert!(XmlGenerator::generate(text.len() - 1, "chargen", sample).is_err());
    }

    #[test]
    fn test_expanding_buffer_grows_and_restarts() {
        let mut buffer = ExpandingXmlBuffer::new(16);
        let mut runs = 0;
        let text = buffer.generate("chargen", |xml| {
            runs += 1;
            sample(xml)
        });
        let expected = XmlGenerator::generate(1024, "chargen", sample).unwrap();
        assert_eq!(text, expected);
        assert_eq!(runs, buffer.attempts());
        assert!(buffer.attempts() > 1);
        assert!(buffer.capacity() >= expected.len());
        assert!(buffer.capacity() < expected.len() + 16);
    }

    #[test]
    fn test_expanding_buffer_is_idempotent() {
        let small = ExpandingXmlBuffer::new(8).generate("chargen", sample);
        let large = ExpandingXmlBuffer::default().generate("chargen", sample);
        assert_eq!(small, large);
    }

    #[test]
    fn test_zero_increment_is_clamped() {
        let mut buffer = ExpandingXmlBuffer::new(0);
        assert_eq!(buffer.capacity(), 1);
        let text = buffer.generate("a", |_| Ok(()));
        assert_eq!(text, "<a/>");
    }
}
