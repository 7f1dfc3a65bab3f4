//! Content flow: the laid-out CV tree handed over by the template system
//!
//! A `ContentFlow` is an immutable snapshot. The template layer rebuilds it
//! whenever CV data, theme or column layout changes; pagination only reads
//! geometry from it and never reorders or mutates nodes.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A pre-rendered block of markup with its intrinsic height at the target width
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(default)]
    pub markup: String,
    #[serde(default)]
    pub height: f32,
}

impl Block {
    pub fn new(markup: impl Into<String>, height: f32) -> Self {
        Self {
            markup: markup.into(),
            height,
        }
    }

    /// Block with no markup, used by tests and synthetic flows
    pub fn sized(height: f32) -> Self {
        Self {
            markup: String::new(),
            height,
        }
    }
}

/// The CV header (name, contact line, photo). Always atomic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Header {
    /// Display name, used for export file naming
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub markup: String,
    #[serde(default)]
    pub height: f32,
}

/// A titled section (experience, education, ...) in the main column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: Block,
    #[serde(default)]
    pub entries: Vec<Block>,
}

impl Section {
    pub fn new(title: Block, entries: Vec<Block>) -> Self {
        Self { title, entries }
    }

    /// Whether entries are offered to the break calculator individually
    pub fn is_decomposable(&self) -> bool {
        self.entries.len() > 1
    }
}

/// Optional side column
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sidebar {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// Address of a structural node inside a `ContentFlow`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NodeId {
    Header,
    /// Whole section: title plus all entries
    Section { section: usize },
    SectionTitle { section: usize },
    Entry { section: usize, entry: usize },
    SidebarBlock { block: usize },
}

impl NodeId {
    /// Leaf nodes carry markup; a whole section is only a grouping
    pub fn is_leaf(&self) -> bool {
        !matches!(self, NodeId::Section { .. })
    }
}

/// Stable label used as `data-node` in exported markup
impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Header => f.write_str("header"),
            NodeId::Section { section } => write!(f, "section-{}", section),
            NodeId::SectionTitle { section } => write!(f, "title-{}", section),
            NodeId::Entry { section, entry } => write!(f, "entry-{}-{}", section, entry),
            NodeId::SidebarBlock { block } => write!(f, "sidebar-{}", block),
        }
    }
}

/// Complete content flow snapshot
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentFlow {
    pub header: Header,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub sidebar: Option<Sidebar>,
}

impl ContentFlow {
    /// Create an empty flow
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a flow produced by the template layer
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_header(mut self, name: impl Into<String>, height: f32) -> Self {
        self.header.name = name.into();
        self.header.height = height;
        self
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn with_sidebar(mut self, blocks: Vec<Block>) -> Self {
        self.sidebar = Some(Sidebar { blocks });
        self
    }

    /// Display name from the header
    pub fn display_name(&self) -> &str {
        &self.header.name
    }

    /// Sidebar blocks, empty when there is no side column
    pub fn sidebar_blocks(&self) -> &[Block] {
        self.sidebar.as_ref().map(|s| s.blocks.as_slice()).unwrap_or(&[])
    }

    /// True when nothing but an empty header is present
    pub fn is_empty(&self) -> bool {
        self.header.height <= 0.0
            && self.header.markup.is_empty()
            && self.sections.is_empty()
            && self.sidebar_blocks().is_empty()
    }

    /// Markup of a leaf node; `None` for sections and unknown indices
    pub fn markup(&self, node: NodeId) -> Option<&str> {
        let markup = match node {
            NodeId::Header => &self.header.markup,
            NodeId::Section { .. } => return None,
            NodeId::SectionTitle { section } => &self.sections.get(section)?.title.markup,
            NodeId::Entry { section, entry } => {
                &self.sections.get(section)?.entries.get(entry)?.markup
            }
            NodeId::SidebarBlock { block } => &self.sidebar_blocks().get(block)?.markup,
        };
        Some(markup)
    }

    /// All addressable nodes in rendering order
    pub fn node_ids(&self) -> Vec<NodeId> {
        let mut ids = vec![NodeId::Header];
        for (section, s) in self.sections.iter().enumerate() {
            ids.push(NodeId::Section { section });
            ids.push(NodeId::SectionTitle { section });
            for entry in 0..s.entries.len() {
                ids.push(NodeId::Entry { section, entry });
            }
        }
        for block in 0..self.sidebar_blocks().len() {
            ids.push(NodeId::SidebarBlock { block });
        }
        ids
    }
}
