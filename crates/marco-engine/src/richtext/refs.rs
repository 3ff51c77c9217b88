//! Lookups the walker needs, gathered up front.
//!
//! Walking is synchronous, but display names and room privileges come from
//! async collaborators. The walker therefore runs in two steps: collect every
//! user id and content URI the tree references, resolve them all, then walk
//! against the resolved table.

use std::collections::{BTreeSet, HashMap};

use super::links::{parse_content_uri, user_link_target};
use crate::markup::{MarkupTree, Node, Tag};
use crate::resolve::Resolver;

/// Ids and URIs referenced by a tree, in sorted order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct References {
    pub users: BTreeSet<String>,
    pub media: BTreeSet<String>,
}

impl References {
    /// Collect references from elements no deeper than `max_depth`, the
    /// same bound the walker applies.
    pub fn collect(tree: &MarkupTree, max_depth: usize) -> Self {
        let mut references = Self::default();
        let mut stack = vec![(tree.root(), 0usize)];

        while let Some((id, depth)) = stack.pop() {
            let Node::Element(element) = tree.node(id) else {
                continue;
            };
            if depth > max_depth {
                continue;
            }
            match element.tag {
                Tag::A => {
                    if let Some(user_id) = element.attribute("href").and_then(user_link_target) {
                        references.users.insert(user_id);
                    }
                }
                Tag::Img => {
                    if let Some(src) = element.attribute("src")
                        && parse_content_uri(src).is_some()
                    {
                        references.media.insert(src.to_string());
                    }
                }
                _ => {}
            }
            stack.extend(element.children.iter().map(|&child| (child, depth + 1)));
        }

        references
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty() && self.media.is_empty()
    }
}

/// Answers to the lookups a walk needs. Missing entries mean "not found".
#[derive(Debug, Clone, Default)]
pub struct ResolvedRefs {
    display_names: HashMap<String, String>,
    player_ids: HashMap<String, String>,
    media_urls: HashMap<String, String>,
}

impl ResolvedRefs {
    pub async fn resolve<R: Resolver>(
        references: &References,
        room_id: &str,
        resolver: &R,
    ) -> Self {
        let mut resolved = Self::default();

        for user_id in &references.users {
            match resolver.display_name(room_id, user_id).await {
                Some(name) => {
                    resolved.display_names.insert(user_id.clone(), name);
                }
                None => log::debug!("No display name for {user_id} in {room_id}"),
            }
            if let Some(player_id) = resolver.player_id(user_id) {
                resolved.player_ids.insert(user_id.clone(), player_id);
            }
        }

        for uri in &references.media {
            if let Some(url) = resolver.media_url(uri) {
                resolved.media_urls.insert(uri.clone(), url);
            }
        }

        resolved
    }

    pub fn with_display_name(mut self, user_id: &str, name: &str) -> Self {
        self.display_names
            .insert(user_id.to_string(), name.to_string());
        self
    }

    pub fn with_player(mut self, user_id: &str, player_id: &str) -> Self {
        self.player_ids
            .insert(user_id.to_string(), player_id.to_string());
        self
    }

    pub fn with_media_url(mut self, uri: &str, url: &str) -> Self {
        self.media_urls.insert(uri.to_string(), url.to_string());
        self
    }

    pub fn display_name(&self, user_id: &str) -> Option<&str> {
        self.display_names.get(user_id).map(String::as_str)
    }

    pub fn player_id(&self, user_id: &str) -> Option<&str> {
        self.player_ids.get(user_id).map(String::as_str)
    }

    pub fn media_url(&self, uri: &str) -> Option<&str> {
        self.media_urls.get(uri).map(String::as_str)
    }
}
