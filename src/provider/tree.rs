//! Library tree of folders and playlists
//!
//! The provider returns its rootlist in its own shape ([`RawItem`]); it is
//! converted once at the boundary into [`Node`], which is what traversal code
//! walks.

use crate::db::EntityId;
use serde::Deserialize;

/// One node of the library tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Folder(Folder),
    Leaf(Leaf),
}

/// A folder with ordered, mixed children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Folder {
    pub uri: String,
    pub name: String,
    pub children: Vec<Node>,
}

/// A taggable playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub id: EntityId,
    pub name: String,
}

impl Node {
    /// A leaf for `id` with an empty name
    #[must_use]
    pub fn leaf(id: impl Into<EntityId>) -> Self {
        Self::Leaf(Leaf {
            id: id.into(),
            name: String::new(),
        })
    }

    /// A folder holding `children`
    #[must_use]
    pub fn folder(uri: impl Into<String>, children: Vec<Self>) -> Self {
        Self::Folder(Folder {
            uri: uri.into(),
            name: String::new(),
            children,
        })
    }

    /// Every leaf below this node, depth-first in tree order
    #[must_use]
    pub fn leaves(&self) -> Vec<&Leaf> {
        let mut leaves = Vec::new();
        collect_leaves(self, &mut leaves);
        leaves
    }

    /// Find a folder by URI or by the id after its last `:`
    #[must_use]
    pub fn find_folder(&self, query: &str) -> Option<&Folder> {
        let Self::Folder(folder) = self else {
            return None;
        };
        if folder.matches(query) {
            return Some(folder);
        }
        folder.children.iter().find_map(|child| child.find_folder(query))
    }
}

impl Folder {
    /// Ids of every playlist below this folder, nested folders included
    #[must_use]
    pub fn entity_ids(&self) -> Vec<EntityId> {
        let mut leaves = Vec::new();
        for child in &self.children {
            collect_leaves(child, &mut leaves);
        }
        leaves.into_iter().map(|leaf| leaf.id.clone()).collect()
    }

    fn matches(&self, query: &str) -> bool {
        !query.is_empty()
            && (self.uri == query
                || self
                    .uri
                    .rsplit_once(':')
                    .is_some_and(|(_, id)| id == query))
    }
}

fn collect_leaves<'a>(node: &'a Node, leaves: &mut Vec<&'a Leaf>) {
    match node {
        Node::Leaf(leaf) => leaves.push(leaf),
        Node::Folder(folder) => {
            for child in &folder.children {
                collect_leaves(child, leaves);
            }
        }
    }
}

/// Rootlist item as the provider serializes it
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawItem {
    Folder {
        #[serde(default)]
        uri: String,
        #[serde(default)]
        name: String,
        #[serde(default)]
        items: Vec<RawItem>,
    },
    Playlist {
        uri: String,
        #[serde(default)]
        name: String,
    },
    #[serde(other)]
    Other,
}

impl RawItem {
    /// Convert to a tree node, dropping item types that cannot be tagged
    #[must_use]
    pub fn into_node(self) -> Option<Node> {
        match self {
            Self::Folder { uri, name, items } => Some(Node::Folder(Folder {
                uri,
                name,
                children: items.into_iter().filter_map(Self::into_node).collect(),
            })),
            Self::Playlist { uri, name } => Some(Node::Leaf(Leaf {
                id: EntityId::from_uri(&uri),
                name,
            })),
            Self::Other => None,
        }
    }
}

/// Top-level rootlist as the provider serializes it
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRootlist {
    #[serde(default)]
    pub items: Vec<RawItem>,
}

impl RawRootlist {
    /// Convert into the root folder of the library tree
    #[must_use]
    pub fn into_root(self) -> Node {
        Node::folder(
            "",
            self.items.into_iter().filter_map(RawItem::into_node).collect(),
        )
    }
}
