//! Small indented XML document builder over `quick-xml`.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

/// An XML document under construction.
///
/// Attribute values and text are escaped by the writer.
pub struct XmlDocument {
    writer: Writer<Vec<u8>>,
}

impl XmlDocument {
    /// Starts a document with an XML declaration.
    ///
    /// # Errors
    ///
    /// Returns an error string if the declaration cannot be written.
    pub fn new() -> Result<Self, String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| e.to_string())?;
        Ok(Self { writer })
    }

    /// Opens `<name attrs...>`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element cannot be written.
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), String> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Start(start)).map_err(|e| e.to_string())
    }

    /// Closes `</name>`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element cannot be written.
    pub fn close(&mut self, name: &str) -> Result<(), String> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(|e| e.to_string())
    }

    /// Writes a self-closing `<name attrs.../>`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element cannot be written.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), String> {
        let start = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.writer.write_event(Event::Empty(start)).map_err(|e| e.to_string())
    }

    /// Writes `<name attrs...>text</name>`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the element cannot be written.
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), String> {
        self.open(name, attrs)?;
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| e.to_string())?;
        self.close(name)
    }

    /// Finishes the document, returning it with a trailing newline.
    ///
    /// # Errors
    ///
    /// Returns an error string if the output is not valid UTF-8.
    pub fn finish(self) -> Result<String, String> {
        let mut text = String::from_utf8(self.writer.into_inner()).map_err(|e| e.to_string())?;
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_an_indented_escaped_document() {
        let mut doc = XmlDocument::new().unwrap();
        doc.open("Root", &[("Name", "a & b")]).unwrap();
        doc.empty("Leaf", &[("Path", "<x>")]).unwrap();
        doc.text_element("Command", &[], "run \"it\"").unwrap();
        doc.close("Root").unwrap();
        let text = doc.finish().unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>"));
        assert!(text.contains("<Root Name=\"a &amp; b\">"));
        assert!(text.contains("\n  <Leaf Path=\"&lt;x&gt;\"/>"));
        assert!(text.contains("<Command>run ") && text.contains("</Command>"));
        assert!(text.ends_with("</Root>\n"));
    }
}
