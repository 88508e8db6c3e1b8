//! Mutation notifications delivered by the host environment.

/// A node addition reported in a mutation batch.
#[derive(Debug, Clone)]
pub enum AddedNode {
    /// An element insertion.
    Element {
        /// Lowercased tag name.
        tag: String,
        /// Whether the inserted subtree contains at least one anchor.
        contains_anchor: bool,
    },
    /// A text node insertion.
    Text,
    /// Comments, processing instructions, and anything else.
    Other,
}

impl AddedNode {
    /// Convenience constructor for an element insertion.
    pub fn element(tag: &str, contains_anchor: bool) -> Self {
        Self::Element {
            tag: tag.to_ascii_lowercase(),
            contains_anchor,
        }
    }

    /// Whether this insertion might have introduced an augmentable anchor.
    pub fn introduces_anchor(&self) -> bool {
        match self {
            Self::Element {
                tag,
                contains_anchor,
            } => tag == "a" || *contains_anchor,
            Self::Text | Self::Other => false,
        }
    }
}

/// One batch of subtree mutations. Removals are irrelevant to augmentation and
/// are not reported.
#[derive(Debug, Clone, Default)]
pub struct MutationBatch {
    pub added: Vec<AddedNode>,
}

impl MutationBatch {
    pub fn new(added: Vec<AddedNode>) -> Self {
        Self { added }
    }

    /// Whether any addition in the batch might carry an anchor.
    pub fn introduces_anchor(&self) -> bool {
        self.added.iter().any(AddedNode::introduces_anchor)
    }
}
