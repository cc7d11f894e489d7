//! GraphQL connection wrapper.

/// A paginated GraphQL connection, reduced to its `nodes` list.
///
/// The homepage queries only ever read the first page, so edges and page
/// info are not modelled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Connection<T> {
    #[cfg_attr(feature = "serde", serde(default = "Vec::new"))]
    pub nodes: Vec<T>,
}

impl<T> Connection<T> {
    pub fn new(nodes: Vec<T>) -> Self {
        Self { nodes }
    }

    /// An empty connection.
    pub fn empty() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn first(&self) -> Option<&T> {
        self.nodes.first()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn into_nodes(self) -> Vec<T> {
        self.nodes
    }

    /// Take the first node, dropping the rest.
    pub fn into_first(self) -> Option<T> {
        self.nodes.into_iter().next()
    }
}

impl<T> Default for Connection<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_first_on_empty() {
        let connection: Connection<u32> = Connection::empty();
        assert!(connection.is_empty());
        assert_eq!(connection.into_first(), None);
    }

    #[test]
    fn test_into_first_takes_head() {
        let connection = Connection::new(vec![3, 2, 1]);
        assert_eq!(connection.len(), 3);
        assert_eq!(connection.into_first(), Some(3));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_missing_nodes_decodes_as_empty() {
        let connection: Connection<u32> = serde_json::from_str("{}").unwrap();
        assert!(connection.is_empty());
    }
}
