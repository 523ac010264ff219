//! Submission and response shapes of the transaction handlers.

/// What the caller submitted.
#[derive(Debug)]
pub enum Submission<E> {
    Collection(Vec<E>),
    Single(E),
    /// Anything else; carries the offending type's name for diagnostics.
    Unsupported { type_name: String },
}

/// A collection-shaped response.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionResponse<E> {
    items: Vec<E>,
    show_associations: bool,
}

impl<E> CollectionResponse<E> {
    pub fn new(items: Vec<E>) -> Self {
        Self {
            items,
            show_associations: false,
        }
    }

    /// An empty collection response.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn with_show_associations(mut self, show: bool) -> Self {
        self.show_associations = show;
        self
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn show_associations(&self) -> bool {
        self.show_associations
    }

    /// Drop every item while keeping the wrapper and its flags.
    pub fn clear_items(&mut self) {
        self.items.clear();
    }
}

/// Payload returned by a transaction handler.
#[derive(Debug, Clone, PartialEq)]
pub enum HandlerResponse<E> {
    Entity(E),
    Collection(CollectionResponse<E>),
}
