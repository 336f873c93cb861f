//! Parsed page HTML: metadata lookup and container element access.
//!
//! Wraps a `tl` parse of the page. The widget reads document metadata from
//! here (title, meta tags, canonical link) and finds its container element
//! and share buttons. Lookup never fails hard: a page missing any tag
//! simply yields `None`, and the corresponding share parameter is omitted.

use thiserror::Error;

/// Page parsing errors
#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to parse page html")]
    Malformed,
}

/// A parsed page document.
pub struct Document<'a> {
    dom: tl::VDom<'a>,
}

impl<'a> Document<'a> {
    /// Parse page HTML. The input must outlive the document.
    pub fn parse(html: &'a str) -> Result<Self, PageError> {
        let dom = tl::parse(html, tl::ParserOptions::default()).map_err(|_| PageError::Malformed)?;
        Ok(Self { dom })
    }

    /// The `<title>` text, if present.
    pub fn title(&self) -> Option<String> {
        let parser = self.dom.parser();
        self.tags()
            .find(|tag| tag_is(tag, "title"))
            .map(|tag| tag.inner_text(parser).into_owned())
    }

    /// Content of `<meta name="..." content="...">`.
    pub fn meta_named(&self, name: &str) -> Option<String> {
        self.meta_content("name", name)
    }

    /// Content of `<meta property="..." content="...">`.
    pub fn meta_property(&self, property: &str) -> Option<String> {
        self.meta_content("property", property)
    }

    /// Href of `<link rel="canonical">`.
    pub fn canonical(&self) -> Option<String> {
        self.tags()
            .find(|tag| tag_is(tag, "link") && attr_of(tag, "rel").as_deref() == Some("canonical"))
            .and_then(|tag| attr_of(tag, "href"))
    }

    /// The element with the given id.
    pub fn element(&self, id: &str) -> Option<ElementRef<'_, 'a>> {
        let tag = self
            .tags()
            .find(|tag| attr_of(tag, "id").as_deref() == Some(id))?;
        Some(ElementRef {
            tag,
            parser: self.dom.parser(),
        })
    }

    fn meta_content(&self, key: &str, value: &str) -> Option<String> {
        self.tags()
            .find(|tag| tag_is(tag, "meta") && attr_of(tag, key).as_deref() == Some(value))
            .and_then(|tag| attr_of(tag, "content"))
    }

    /// All element tags in the document, in source order.
    fn tags(&self) -> impl Iterator<Item = &tl::HTMLTag<'a>> {
        self.dom.nodes().iter().filter_map(|node| match node {
            tl::Node::Tag(tag) => Some(tag),
            _ => None,
        })
    }
}

/// A borrowed element within a [`Document`].
pub struct ElementRef<'d, 'a> {
    tag: &'d tl::HTMLTag<'a>,
    parser: &'d tl::Parser<'a>,
}

impl ElementRef<'_, '_> {
    /// Attribute value by name. Valueless attributes yield an empty string.
    pub fn attr(&self, name: &str) -> Option<String> {
        attr_of(self.tag, name)
    }

    /// All `data-*` attributes, with the `data-` prefix stripped.
    pub fn data_attrs(&self) -> Vec<(String, String)> {
        self.tag
            .attributes()
            .iter()
            .filter_map(|(key, value)| {
                let key: &str = key.as_ref();
                let stripped = key.strip_prefix("data-")?;
                Some((
                    stripped.to_string(),
                    value.map(|v| v.to_string()).unwrap_or_default(),
                ))
            })
            .collect()
    }

    /// Network identifiers of descendant share buttons, in document order.
    ///
    /// A share button is any descendant carrying a `data-social-network`
    /// attribute.
    pub fn share_buttons(&self) -> Vec<String> {
        let mut networks = Vec::new();
        for handle in self.tag.children().top().iter() {
            collect_networks(*handle, self.parser, &mut networks);
        }
        networks
    }
}

fn collect_networks(handle: tl::NodeHandle, parser: &tl::Parser, out: &mut Vec<String>) {
    let Some(node) = handle.get(parser) else {
        return;
    };
    if let tl::Node::Tag(tag) = node {
        if let Some(network) = attr_of(tag, "data-social-network")
            && !network.is_empty()
        {
            out.push(network);
        }
        for child in tag.children().top().iter() {
            collect_networks(*child, parser, out);
        }
    }
}

fn tag_is(tag: &tl::HTMLTag, name: &str) -> bool {
    tag.name().as_utf8_str().eq_ignore_ascii_case(name)
}

fn attr_of(tag: &tl::HTMLTag, name: &str) -> Option<String> {
    for (key, value) in tag.attributes().iter() {
        let key: &str = key.as_ref();
        if key.eq_ignore_ascii_case(name) {
            return Some(value.map(|v| v.to_string()).unwrap_or_default());
        }
    }
    None
}

// ============================================================================
// tests
// ============================================================================
