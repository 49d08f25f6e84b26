//! Serializable HTML element description.
//!
//! Every [`BlockRenderer`](crate::BlockRenderer) produces an [`HtmlElement`]
//! instead of writing into the output buffer directly. Keeping the element
//! structured until the last moment lets decorators adjust attributes of an
//! already-rendered block without re-parsing HTML.

/// A single rendered block: tag name, ordered attributes and inner HTML.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtmlElement {
    tag: String,
    attributes: Vec<(String, String)>,
    content: String,
    void: bool,
}

impl HtmlElement {
    /// Create an element with the given tag and trusted inner HTML.
    #[must_use]
    pub fn new(tag: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            content: content.into(),
            void: false,
        }
    }

    /// Create a void element (`<hr>`, `<br>`) that has no content or closing tag.
    #[must_use]
    pub fn void(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            content: String::new(),
            void: true,
        }
    }

    /// Create a tagless fragment that serializes to its content verbatim.
    ///
    /// Used for raw HTML blocks and inline runs that have no wrapping element.
    #[must_use]
    pub fn fragment(html: impl Into<String>) -> Self {
        Self::new(String::new(), html)
    }

    /// Builder-style variant of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Set an attribute, overwriting an existing value in place.
    ///
    /// Attribute order is insertion order; overwriting keeps the original position
    /// so the serialized output stays stable.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(slot) = self.attributes.iter_mut().find(|(n, _)| *n == name) {
            slot.1 = value;
        } else {
            self.attributes.push((name, value));
        }
    }

    /// Get an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    #[must_use]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Whether this element is a tagless fragment.
    #[must_use]
    pub fn is_fragment(&self) -> bool {
        self.tag.is_empty()
    }

    /// Append the serialized element to `out`.
    ///
    /// Attribute values are escaped. Content is written as-is: renderers are
    /// responsible for handing over safe HTML.
    pub fn write_to(&self, out: &mut String) {
        if self.is_fragment() {
            out.push_str(&self.content);
            return;
        }

        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');

        if self.void {
            return;
        }

        out.push_str(&self.content);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    /// Serialize the element into a new string.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::with_capacity(self.content.len() + 32);
        self.write_to(&mut out);
        out
    }
}

/// Escape special HTML characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}
