// Capability view of the document, injectable for testing without a real
// page. The retargeting engine only needs these five operations.

/// Which attribute carries the asset reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetAttr {
    Src,
    Href,
}

impl AssetAttr {
    pub fn as_str(self) -> &'static str {
        match self {
            AssetAttr::Src => "src",
            AssetAttr::Href => "href",
        }
    }
}

/// A located asset reference: element handle plus the attribute and its
/// current value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub element: usize,
    pub attr: AssetAttr,
    pub value: String,
}

pub trait Dom {
    /// Every element whose `src` or `href` attribute begins with `prefix`.
    fn find_by_attr_prefix(&self, prefix: &str) -> Vec<AssetRef>;

    /// Replace the element with a clone whose attribute holds `new_value`.
    /// A full element swap, not in-place mutation: browsers only reload the
    /// resource when the node itself changes.
    fn swap_element(&mut self, asset: &AssetRef, new_value: &str);

    /// Whether this element is a `<source>` child of a `<video>`.
    fn parent_is_video(&self, asset: &AssetRef) -> bool;

    /// Tell the parent video to reload. Swapping a source element alone does
    /// not refresh playback in most browsers.
    fn reload_parent_video(&mut self, asset: &AssetRef);

    /// Append markup to the end of the body.
    fn append_to_body(&mut self, html: &str);
}
